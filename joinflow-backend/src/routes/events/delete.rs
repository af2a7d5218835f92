use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use joinflow_database::Store;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Serialize)]
pub struct Deleted {
    success: bool,
}

/// Committees and registrations go with the event.
pub async fn delete(
    State(store): State<Arc<dyn Store>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Deleted>, AppError> {
    let Path(id) = id?;
    if !store.delete_event(id).await? {
        return Err(AppError::NotFound("event not found"));
    }
    info!("deleted event {id}");
    Ok(Json(Deleted { success: true }))
}
