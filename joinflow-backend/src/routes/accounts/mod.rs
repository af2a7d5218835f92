pub mod login;
pub mod profile;
pub mod signup;

use serde::Deserialize;
use validator::ValidateEmail as _;

use crate::error::AppError;
use crate::routes::required;

const MINIMUM_PASSWORD_LENGTH: usize = 6;

#[derive(Deserialize)]
pub struct CredentialsPayload {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl CredentialsPayload {
    /// Normalized email and the untouched password.
    pub fn validate(self) -> Result<(String, String), AppError> {
        let email = validate_email(self.email.as_deref())?;
        let password = self
            .password
            .filter(|password| !password.is_empty())
            .ok_or_else(|| AppError::validation("password is required"))?;
        Ok((email, password))
    }
}

/// Lowercased so lookups by email ignore case.
pub fn validate_email(email: Option<&str>) -> Result<String, AppError> {
    let email = required(email, "email")?.to_lowercase();
    if email.validate_email() {
        Ok(email)
    } else {
        Err(AppError::validation("email address is invalid"))
    }
}

pub fn validate_new_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MINIMUM_PASSWORD_LENGTH {
        return Err(AppError::validation(format!(
            "password must be at least {MINIMUM_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}
