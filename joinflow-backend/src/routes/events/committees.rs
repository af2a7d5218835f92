use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use joinflow_database::models::CommitteeAvailability;
use joinflow_database::Store;

use crate::error::AppError;
use crate::routes::{required, Data};

/// Recomputed on every request, nothing is cached.
pub async fn committees(
    State(store): State<Arc<dyn Store>>,
    token: Result<Path<String>, PathRejection>,
) -> Result<Json<Data<Vec<CommitteeAvailability>>>, AppError> {
    let Path(token) = token?;
    let token = required(Some(&token), "event token")?;
    let committees = store
        .committee_availability(&token)
        .await?
        .ok_or(AppError::NotFound("event not found"))?;
    Ok(Json(Data { data: committees }))
}
