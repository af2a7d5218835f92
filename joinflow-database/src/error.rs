use core::time::Duration;

pub use diesel::result::Error as DieselError;
use diesel::result::DatabaseErrorKind;
use diesel_async::pooled_connection::deadpool;
use thiserror::Error;

const REGISTRANT_UNIQUE_CONSTRAINT: &str = "registrations_event_matric_no_unique";

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to create database pool {0}")]
    PoolBuild(#[from] deadpool::BuildError),
    #[error("Database pool failed {0}")]
    Pool(#[from] deadpool::PoolError),
    #[error("Database query failed {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Database did not answer within {0:?}")]
    Timeout(Duration),
}

impl DatabaseError {
    /// Whether retrying the whole request later may succeed.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Timeout(_) | Self::Pool(deadpool::PoolError::Timeout(_))
        )
    }
}

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("event not found")]
    NotFound,
    #[error("committee does not belong to this event")]
    InvalidSelection,
    #[error("committee is full")]
    CapacityExceeded,
    #[error("matriculation number already registered for this event")]
    DuplicateRegistrant,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<diesel::result::Error> for RegistrationError {
    fn from(value: diesel::result::Error) -> Self {
        if let diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) =
            &value
        {
            if info.constraint_name() == Some(REGISTRANT_UNIQUE_CONSTRAINT) {
                return Self::DuplicateRegistrant;
            }
        }
        Self::Database(value.into())
    }
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("event owner does not exist")]
    OwnerNotFound,
    #[error("event token is already in use")]
    TokenTaken,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<diesel::result::Error> for EventError {
    fn from(value: diesel::result::Error) -> Self {
        match value {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                Self::OwnerNotFound
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                Self::TokenTaken
            }
            value => Self::Database(value.into()),
        }
    }
}

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<diesel::result::Error> for AccountError {
    fn from(value: diesel::result::Error) -> Self {
        if matches!(
            value,
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
        ) {
            Self::EmailTaken
        } else {
            Self::Database(value.into())
        }
    }
}
