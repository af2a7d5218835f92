use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::admission::{admit, CommitteeSlot};
use crate::error::{AccountError, DatabaseError, EventError, RegistrationError};
use crate::models::{
    Admitted, Committee, CommitteeAvailability, CommitteeRegistrations, Event, NewRegistrant,
    Registration, User, UserChangeset,
};
use crate::store::Store;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    events: Vec<Event>,
    committees: Vec<Committee>,
    registrations: Vec<Registration>,
}

impl Tables {
    fn event_by_token(&self, token: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.token == token)
    }

    fn registered(&self, committee_id: Uuid) -> i64 {
        let count = self
            .registrations
            .iter()
            .filter(|registration| registration.committee_id == committee_id)
            .count();
        i64::try_from(count).unwrap_or(i64::MAX)
    }

    fn committees_of(&self, event_id: Uuid) -> Vec<Committee> {
        let mut committees: Vec<Committee> = self
            .committees
            .iter()
            .filter(|committee| committee.event_id == event_id)
            .cloned()
            .collect();
        committees.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        committees
    }
}

/// [`Store`] that keeps everything in process memory.
///
/// One lock guards all tables, so every operation is atomic. Used by the
/// tests and by servers started without a database url.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn token_exists(&self, token: &str) -> Result<bool, DatabaseError> {
        Ok(self.tables.lock().await.event_by_token(token).is_some())
    }

    async fn committee_availability(
        &self,
        token: &str,
    ) -> Result<Option<Vec<CommitteeAvailability>>, DatabaseError> {
        let tables = self.tables.lock().await;
        let Some(event) = tables
            .events
            .iter()
            .find(|event| event.token == token || event.ajk_token == token)
        else {
            return Ok(None);
        };
        Ok(Some(
            tables
                .committees_of(event.id)
                .iter()
                .map(|committee| {
                    CommitteeAvailability::new(committee, tables.registered(committee.id))
                })
                .collect(),
        ))
    }

    async fn register(
        &self,
        event_token: &str,
        registrant: NewRegistrant,
    ) -> Result<Admitted, RegistrationError> {
        let mut tables = self.tables.lock().await;
        let event = tables
            .event_by_token(event_token)
            .ok_or(RegistrationError::NotFound)?;
        let (event_id, group_link) = (event.id, event.group_link.clone());

        let slot = tables
            .committees
            .iter()
            .find(|committee| {
                committee.id == registrant.committee_id && committee.event_id == event_id
            })
            .map(|committee| CommitteeSlot {
                max_members: committee.max_members,
                registered: tables.registered(committee.id),
            });
        let already_registered = tables.registrations.iter().any(|registration| {
            registration.event_id == event_id && registration.matric_no == registrant.matric_no
        });
        admit(slot, already_registered)?;

        let registration = registrant.into_registration(event_id);
        tables.registrations.push(registration.clone());
        Ok(Admitted {
            registration,
            group_link,
        })
    }

    async fn create_event(
        &self,
        event: Event,
        committees: Vec<Committee>,
    ) -> Result<(), EventError> {
        let mut tables = self.tables.lock().await;
        if !tables.users.iter().any(|user| user.id == event.created_by) {
            return Err(EventError::OwnerNotFound);
        }
        if tables
            .events
            .iter()
            .any(|existing| existing.token == event.token || existing.ajk_token == event.ajk_token)
        {
            return Err(EventError::TokenTaken);
        }
        tables.events.push(event);
        tables.committees.extend(committees);
        Ok(())
    }

    async fn events_by_owner(&self, owner: Uuid) -> Result<Vec<Event>, DatabaseError> {
        let tables = self.tables.lock().await;
        let mut events: Vec<Event> = tables
            .events
            .iter()
            .filter(|event| event.created_by == owner)
            .cloned()
            .collect();
        events.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.lock().await;
        let before = tables.events.len();
        tables.events.retain(|event| event.id != id);
        if tables.events.len() == before {
            return Ok(false);
        }
        tables.committees.retain(|committee| committee.event_id != id);
        tables
            .registrations
            .retain(|registration| registration.event_id != id);
        Ok(true)
    }

    async fn event_registrations(
        &self,
        event_id: Uuid,
    ) -> Result<Option<Vec<CommitteeRegistrations>>, DatabaseError> {
        let tables = self.tables.lock().await;
        if !tables.events.iter().any(|event| event.id == event_id) {
            return Ok(None);
        }
        let mut registrations: Vec<Registration> = tables
            .registrations
            .iter()
            .filter(|registration| registration.event_id == event_id)
            .cloned()
            .collect();
        registrations.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(Some(CommitteeRegistrations::group(
            tables.committees_of(event_id),
            registrations,
        )))
    }

    async fn create_user(&self, user: User) -> Result<(), AccountError> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|existing| existing.email == user.email) {
            return Err(AccountError::EmailTaken);
        }
        tables.users.push(user);
        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.email == email).cloned())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|user| user.id == id).cloned())
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChangeset,
    ) -> Result<Option<User>, AccountError> {
        let mut tables = self.tables.lock().await;
        if let Some(email) = &changes.email {
            if tables
                .users
                .iter()
                .any(|user| user.id != id && &user.email == email)
            {
                return Err(AccountError::EmailTaken);
            }
        }
        let Some(user) = tables.users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = changes.updated_at;
        Ok(Some(user.clone()))
    }
}
