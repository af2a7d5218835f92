use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use joinflow_database::Store;
use serde::Serialize;
use tracing::error;

#[derive(Serialize)]
pub struct Validity {
    valid: bool,
}

/// Never fails with an error body, storage problems read as an invalid token.
pub async fn validate(
    State(store): State<Arc<dyn Store>>,
    Path(token): Path<String>,
) -> (StatusCode, Json<Validity>) {
    let token = token.trim();
    if token.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(Validity { valid: false }));
    }
    match store.token_exists(token).await {
        Ok(valid) => (StatusCode::OK, Json(Validity { valid })),
        Err(database_error) => {
            error!("failed to validate event token: {database_error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Validity { valid: false }),
            )
        }
    }
}
