use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use joinflow_database::models::{Committee, Event};
use joinflow_database::Store;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::routes::required;
use crate::secrets::generate_token;

/// Forms send capacities as text, API clients as numbers.
#[derive(Deserialize)]
#[serde(untagged)]
pub enum Capacity {
    Number(i64),
    Text(String),
}

impl Capacity {
    fn parse(&self) -> Option<i32> {
        let value = match self {
            Self::Number(number) => *number,
            Self::Text(text) => text.trim().parse().ok()?,
        };
        i32::try_from(value).ok().filter(|value| *value > 0)
    }
}

#[derive(Deserialize)]
pub struct CommitteePayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    max_members: Option<Capacity>,
}

#[derive(Deserialize)]
pub struct CreateEventPayload {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    start_date: Option<DateTime<Utc>>,
    #[serde(default)]
    end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    created_by: Option<Uuid>,
    #[serde(default)]
    group_link: Option<String>,
    #[serde(default, alias = "ajk_list")]
    committees: Vec<CommitteePayload>,
}

#[derive(Serialize)]
pub struct CreatedEvent {
    message: &'static str,
    event: Event,
    committees: Vec<Committee>,
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl CreateEventPayload {
    fn into_rows(self) -> Result<(Event, Vec<Committee>), AppError> {
        let name = required(self.name.as_deref(), "name")?;
        let start_date = self
            .start_date
            .ok_or_else(|| AppError::validation("start_date is required"))?;
        let end_date = self
            .end_date
            .ok_or_else(|| AppError::validation("end_date is required"))?;
        if end_date < start_date {
            return Err(AppError::validation("end_date must not be before start_date"));
        }
        let created_by = self
            .created_by
            .ok_or_else(|| AppError::validation("created_by is required"))?;

        let event = Event {
            id: Uuid::new_v4(),
            name,
            description: optional_text(self.description),
            start_date,
            end_date,
            created_at: Utc::now(),
            created_by,
            token: generate_token(),
            ajk_token: generate_token(),
            group_link: optional_text(self.group_link),
        };

        let committees = self
            .committees
            .into_iter()
            .enumerate()
            .map(|(index, committee)| {
                let name = required(committee.name.as_deref(), "committee name")?;
                let max_members = committee
                    .max_members
                    .as_ref()
                    .and_then(Capacity::parse)
                    .ok_or_else(|| {
                        AppError::validation(format!(
                            "committee {} needs a positive max_members",
                            index + 1
                        ))
                    })?;
                Ok(Committee {
                    id: Uuid::new_v4(),
                    event_id: event.id,
                    name,
                    max_members,
                })
            })
            .collect::<Result<Vec<_>, AppError>>()?;

        Ok((event, committees))
    }
}

/// The event and its committees are stored together or not at all.
pub async fn create(
    State(store): State<Arc<dyn Store>>,
    payload: Result<Json<CreateEventPayload>, JsonRejection>,
) -> Result<Json<CreatedEvent>, AppError> {
    let Json(payload) = payload?;
    let (event, committees) = payload.into_rows()?;

    store
        .create_event(event.clone(), committees.clone())
        .await?;
    info!(
        "created event {} with {} committees",
        event.id,
        committees.len()
    );

    Ok(Json(CreatedEvent {
        message: "Event and committees created successfully",
        event,
        committees,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: serde_json::Value) -> CreateEventPayload {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn capacities_accept_numbers_and_text() {
        let rows = payload(serde_json::json!({
            "name": "Orientation Week",
            "start_date": "2025-01-01T08:00:00Z",
            "end_date": "2025-01-03T17:00:00Z",
            "created_by": Uuid::nil(),
            "ajk_list": [
                { "name": "Logistics", "max_members": "4" },
                { "name": "Food", "max_members": 2 }
            ]
        }))
        .into_rows()
        .unwrap();

        let (event, committees) = rows;
        assert_eq!(event.token.len(), crate::secrets::TOKEN_LENGTH);
        assert_ne!(event.token, event.ajk_token);
        let capacities: Vec<i32> = committees.iter().map(|c| c.max_members).collect();
        assert_eq!(capacities, vec![4, 2]);
        assert!(committees.iter().all(|c| c.event_id == event.id));
    }

    #[test]
    fn committees_need_a_positive_capacity() {
        for max_members in [
            serde_json::json!(0),
            serde_json::json!(-3),
            serde_json::json!(""),
            serde_json::json!("many"),
        ] {
            let result = payload(serde_json::json!({
                "name": "Orientation Week",
                "start_date": "2025-01-01T08:00:00Z",
                "end_date": "2025-01-03T17:00:00Z",
                "created_by": Uuid::nil(),
                "committees": [{ "name": "Logistics", "max_members": max_members }]
            }))
            .into_rows();
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn dates_must_be_ordered() {
        let result = payload(serde_json::json!({
            "name": "Backwards",
            "start_date": "2025-01-03T08:00:00Z",
            "end_date": "2025-01-01T08:00:00Z",
            "created_by": Uuid::nil()
        }))
        .into_rows();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn missing_required_fields() {
        let result = payload(serde_json::json!({ "name": "No dates" })).into_rows();
        let Err(AppError::Validation(message)) = result else {
            panic!("expected a validation error");
        };
        assert_eq!(message, "start_date is required");
    }
}
