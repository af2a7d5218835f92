pub mod accounts;
pub mod events;
pub mod register;

use serde::Serialize;

use crate::error::AppError;

/// `{"data": ...}` envelope used by the listing endpoints.
#[derive(Serialize)]
pub struct Data<T> {
    pub data: T,
}

/// Trims `value` and rejects it when nothing is left.
pub fn required(value: Option<&str>, field: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_owned()),
        _ => Err(AppError::validation(format!("{field} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank_values() {
        assert_eq!(required(Some("  A123 "), "matric_no").unwrap(), "A123");
        for blank in [None, Some(""), Some("   ")] {
            let error = required(blank, "matric_no").unwrap_err();
            assert_eq!(error.to_string(), "matric_no is required");
        }
    }
}
