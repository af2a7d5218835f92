use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use joinflow_database::models::Event;
use joinflow_database::Store;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::{required, Data};

#[derive(Deserialize)]
pub struct OwnerQuery {
    user_id: Option<String>,
}

pub async fn list(
    State(store): State<Arc<dyn Store>>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<Data<Vec<Event>>>, AppError> {
    let Query(query) = query?;
    let user_id = required(query.user_id.as_deref(), "user_id")?;
    let owner = Uuid::parse_str(&user_id)
        .map_err(|_| AppError::validation("user_id is not a valid id"))?;
    let events = store.events_by_owner(owner).await?;
    Ok(Json(Data { data: events }))
}
