use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use joinflow_database::models::CommitteeRegistrations;
use joinflow_database::Store;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::Data;

pub async fn registrations(
    State(store): State<Arc<dyn Store>>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Data<Vec<CommitteeRegistrations>>>, AppError> {
    let Path(id) = id?;
    let registrations = store
        .event_registrations(id)
        .await?
        .ok_or(AppError::NotFound("event not found"))?;
    Ok(Json(Data {
        data: registrations,
    }))
}
