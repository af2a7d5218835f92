use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use joinflow_database::models::User;
use joinflow_database::Store;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{validate_new_password, CredentialsPayload};
use crate::error::AppError;
use crate::secrets::hash_password;

const DEFAULT_ROLE: &str = "user";

#[derive(Serialize)]
pub struct SignedUp {
    message: &'static str,
    id: Uuid,
}

pub async fn signup(
    State(store): State<Arc<dyn Store>>,
    payload: Result<Json<CredentialsPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<SignedUp>), AppError> {
    let Json(payload) = payload?;
    let (email, password) = payload.validate()?;
    validate_new_password(&password)?;

    let now = Utc::now();
    let id = Uuid::new_v4();
    store
        .create_user(User {
            id,
            email,
            password_hash: hash_password(&password)?,
            role: DEFAULT_ROLE.to_owned(),
            created_at: now,
            updated_at: now,
        })
        .await?;
    info!("created user {id}");

    Ok((
        StatusCode::CREATED,
        Json(SignedUp {
            message: "User registered successfully",
            id,
        }),
    ))
}
