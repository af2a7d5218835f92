use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use joinflow_database::Store;
use serde::Serialize;
use uuid::Uuid;

use super::CredentialsPayload;
use crate::error::AppError;
use crate::secrets::verify_password;

#[derive(Serialize)]
pub struct LoggedIn {
    /// The user id, sent back as bearer token.
    session_token: Uuid,
}

pub async fn login(
    State(store): State<Arc<dyn Store>>,
    payload: Result<Json<CredentialsPayload>, JsonRejection>,
) -> Result<Json<LoggedIn>, AppError> {
    let Json(payload) = payload?;
    let (email, password) = payload.validate()?;

    match store.user_by_email(&email).await? {
        Some(user) if verify_password(&password, &user.password_hash) => Ok(Json(LoggedIn {
            session_token: user.id,
        })),
        _ => Err(AppError::Unauthorized("invalid email or password")),
    }
}
