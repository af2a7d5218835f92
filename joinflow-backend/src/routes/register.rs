use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use joinflow_database::models::NewRegistrant;
use joinflow_database::Store;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::required;

pub const EVENT_TOKEN_HEADER: &str = "x-event-token";

#[derive(Deserialize)]
pub struct RegistrationPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    matric_no: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default, alias = "committee")]
    committee_id: Option<String>,
}

#[derive(Serialize)]
pub struct Registered {
    message: &'static str,
    group_link: Option<String>,
}

pub async fn register(
    State(store): State<Arc<dyn Store>>,
    headers: HeaderMap,
    payload: Result<Json<RegistrationPayload>, JsonRejection>,
) -> Result<Json<Registered>, AppError> {
    let Json(payload) = payload?;
    let name = required(payload.name.as_deref(), "name")?;
    let matric_no = required(payload.matric_no.as_deref(), "matric_no")?;
    let email = required(payload.email.as_deref(), "email")?;
    let phone = required(payload.phone.as_deref(), "phone")?;
    let committee_id = required(payload.committee_id.as_deref(), "committee_id")?;
    let event_token = required(
        headers
            .get(EVENT_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok()),
        "event token",
    )?;

    // an unparsable id matches no committee, the store still reports an unknown event first
    let committee_id = Uuid::parse_str(&committee_id).unwrap_or_else(|_| Uuid::nil());

    let admitted = store
        .register(
            &event_token,
            NewRegistrant {
                name,
                matric_no,
                email,
                phone,
                committee_id,
            },
        )
        .await?;
    info!(
        "registered {} into committee {} of event {}",
        admitted.registration.matric_no,
        admitted.registration.committee_id,
        admitted.registration.event_id
    );

    Ok(Json(Registered {
        message: "Registration successful! Thank you for joining.",
        group_link: admitted.group_link,
    }))
}
