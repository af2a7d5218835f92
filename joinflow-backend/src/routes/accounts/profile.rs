use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use joinflow_database::models::{User, UserChangeset};
use joinflow_database::Store;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{validate_email, validate_new_password};
use crate::error::AppError;
use crate::routes::required;
use crate::secrets::hash_password;

const fn unknown_user() -> AppError {
    AppError::NotFound("user not found or invalid token")
}

#[derive(Deserialize)]
pub struct TokenQuery {
    token: Option<String>,
}

#[derive(Deserialize)]
pub struct ProfilePayload {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Serialize)]
pub struct Profile {
    user: User,
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub async fn profile(
    State(store): State<Arc<dyn Store>>,
    query: Result<Query<TokenQuery>, QueryRejection>,
) -> Result<Json<Profile>, AppError> {
    let Query(query) = query?;
    let token = required(query.token.as_deref(), "session token")?;
    let id = Uuid::parse_str(&token).map_err(|_| unknown_user())?;
    let user = store.user_by_id(id).await?.ok_or_else(unknown_user)?;
    Ok(Json(Profile { user }))
}

pub async fn update_profile(
    State(store): State<Arc<dyn Store>>,
    headers: HeaderMap,
    payload: Result<Json<ProfilePayload>, JsonRejection>,
) -> Result<Json<Profile>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized("missing token"))?;
    let id = Uuid::parse_str(token).map_err(|_| unknown_user())?;
    let Json(payload) = payload?;

    let email = match payload.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => Some(validate_email(Some(email))?),
        _ => None,
    };
    let password_hash = match payload.password.as_deref() {
        Some(password) if !password.is_empty() => {
            validate_new_password(password)?;
            Some(hash_password(password)?)
        }
        _ => None,
    };
    if email.is_none() && password_hash.is_none() {
        return Err(AppError::validation("no fields provided for update"));
    }

    let user = store
        .update_user(
            id,
            UserChangeset {
                email,
                password_hash,
                updated_at: Utc::now(),
            },
        )
        .await?
        .ok_or_else(unknown_user)?;
    info!("updated profile of user {id}");
    Ok(Json(Profile { user }))
}
