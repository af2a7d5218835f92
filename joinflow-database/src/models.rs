use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::admission::available_members;
use crate::schema::{committees, events, registrations, users};

#[derive(Queryable, Selectable, Insertable, Serialize, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = users, check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields left as `None` are not touched.
#[derive(AsChangeset, Clone, Debug)]
#[diesel(table_name = users)]
pub struct UserChangeset {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Insertable, Serialize, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = events, check_for_backend(diesel::pg::Pg))]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub created_by: Uuid,
    pub token: String,
    pub ajk_token: String,
    pub group_link: Option<String>,
}

#[derive(Queryable, Selectable, Insertable, Serialize, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = committees, check_for_backend(diesel::pg::Pg))]
pub struct Committee {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub max_members: i32,
}

#[derive(Queryable, Selectable, Insertable, Serialize, Clone, Debug, PartialEq, Eq)]
#[diesel(table_name = registrations, check_for_backend(diesel::pg::Pg))]
pub struct Registration {
    pub id: Uuid,
    pub name: String,
    pub matric_no: String,
    pub email: String,
    pub phone: String,
    pub committee_id: Uuid,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A registration request that already passed input validation.
#[derive(Clone, Debug)]
pub struct NewRegistrant {
    pub name: String,
    pub matric_no: String,
    pub email: String,
    pub phone: String,
    pub committee_id: Uuid,
}

impl NewRegistrant {
    pub(crate) fn into_registration(self, event_id: Uuid) -> Registration {
        Registration {
            id: Uuid::new_v4(),
            name: self.name,
            matric_no: self.matric_no,
            email: self.email,
            phone: self.phone,
            committee_id: self.committee_id,
            event_id,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Admitted {
    pub registration: Registration,
    pub group_link: Option<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CommitteeAvailability {
    pub id: Uuid,
    pub name: String,
    pub max_members: i32,
    pub available_members: i64,
}

impl CommitteeAvailability {
    #[must_use]
    pub fn new(committee: &Committee, registered: i64) -> Self {
        Self {
            id: committee.id,
            name: committee.name.clone(),
            max_members: committee.max_members,
            available_members: available_members(committee.max_members, registered),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CommitteeRegistrations {
    pub committee: Committee,
    pub registrations: Vec<Registration>,
}

impl CommitteeRegistrations {
    /// Keeps the order of `committees` and, within a committee, of `registrations`.
    #[must_use]
    pub fn group(committees: Vec<Committee>, registrations: Vec<Registration>) -> Vec<Self> {
        let mut grouped: Vec<Self> = committees
            .into_iter()
            .map(|committee| Self {
                committee,
                registrations: Vec::new(),
            })
            .collect();
        for registration in registrations {
            if let Some(entry) = grouped
                .iter_mut()
                .find(|entry| entry.committee.id == registration.committee_id)
            {
                entry.registrations.push(registration);
            }
        }
        grouped
    }
}
