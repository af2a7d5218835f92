use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use rand::{thread_rng, Rng as _};

/// Characters that survive being read aloud or typed from a projector.
const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const TOKEN_LENGTH: usize = 10;

#[must_use]
pub fn generate_token() -> String {
    let mut rng = thread_rng();
    (0..TOKEN_LENGTH)
        .map(|_| char::from(TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())]))
        .collect()
}

/// Argon2id with a fresh salt, encoded as a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut thread_rng());
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Unparsable hashes never verify.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored).is_ok_and(|hash| {
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_use_the_readable_alphabet() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.bytes().all(|byte| TOKEN_ALPHABET.contains(&byte)));
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn passwords_are_stored_as_argon2id() {
        let stored = hash_password("hunter22").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("hunter22"));
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
    }

    #[test]
    fn salts_differ() {
        assert_ne!(
            hash_password("same").unwrap(),
            hash_password("same").unwrap()
        );
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!verify_password("", ""));
        assert!(!verify_password("x", "md5$salt$abc"));
        assert!(!verify_password("x", "sha256$mX2M0DNaYlEqoy8n$b6ec82a0"));
    }
}
