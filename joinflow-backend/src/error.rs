use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use joinflow_config::ConfigError;
use joinflow_database::{AccountError, DatabaseError, EventError, RegistrationError};
use serde::Serialize;
use tracing::{debug, error};

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("the selected committee is not part of this event")]
    InvalidSelection,
    #[error("this committee is already full")]
    CapacityExceeded,
    #[error("you have already registered for this event")]
    DuplicateRegistrant,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("invalid request body: {0}")]
    Json(#[from] JsonRejection),
    #[error("invalid query: {0}")]
    Query(#[from] QueryRejection),
    #[error("invalid path: {0}")]
    Path(#[from] PathRejection),
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
    #[error("{0:?}")]
    Config(#[from] ConfigError),
    #[error("password hashing failed: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::InvalidSelection
            | Self::CapacityExceeded
            | Self::DuplicateRegistrant
            | Self::Json(_)
            | Self::Query(_)
            | Self::Path(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(database_error) if database_error.is_timeout() => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Database(_) | Self::File(_) | Self::Config(_) | Self::PasswordHash(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<RegistrationError> for AppError {
    fn from(value: RegistrationError) -> Self {
        match value {
            RegistrationError::NotFound => Self::NotFound("event is invalid or does not exist"),
            RegistrationError::InvalidSelection => Self::InvalidSelection,
            RegistrationError::CapacityExceeded => Self::CapacityExceeded,
            RegistrationError::DuplicateRegistrant => Self::DuplicateRegistrant,
            RegistrationError::Database(database_error) => Self::Database(database_error),
        }
    }
}

impl From<EventError> for AppError {
    fn from(value: EventError) -> Self {
        match value {
            EventError::OwnerNotFound => Self::NotFound("event owner does not exist"),
            EventError::TokenTaken => Self::Conflict("event token is already in use"),
            EventError::Database(database_error) => Self::Database(database_error),
        }
    }
}

impl From<AccountError> for AppError {
    fn from(value: AccountError) -> Self {
        match value {
            AccountError::EmailTaken => Self::Conflict("email already registered"),
            AccountError::Database(database_error) => Self::Database(database_error),
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{self}");
        } else {
            debug!("{self}");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use super::*;

    #[test]
    fn rejections_map_to_client_errors() {
        assert_eq!(
            AppError::from(RegistrationError::NotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        for rejection in [
            RegistrationError::InvalidSelection,
            RegistrationError::CapacityExceeded,
            RegistrationError::DuplicateRegistrant,
        ] {
            assert_eq!(
                AppError::from(rejection).status_code(),
                StatusCode::BAD_REQUEST
            );
        }
        assert_eq!(
            AppError::from(AccountError::EmailTaken).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(EventError::TokenTaken).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn storage_timeouts_are_retryable() {
        let timeout = AppError::from(RegistrationError::Database(DatabaseError::Timeout(
            Duration::from_secs(5),
        )));
        assert_eq!(timeout.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let failure = AppError::from(DatabaseError::Database(diesel_not_found()));
        assert_eq!(failure.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn diesel_not_found() -> joinflow_database::error::DieselError {
        joinflow_database::error::DieselError::NotFound
    }
}
