use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AccountError, DatabaseError, EventError, RegistrationError};
use crate::models::{
    Admitted, Committee, CommitteeAvailability, CommitteeRegistrations, Event, NewRegistrant,
    User, UserChangeset,
};

/// Everything the HTTP layer needs from persistence.
///
/// Implementations must make [`Store::register`] atomic: the committee lookup,
/// the head count, the duplicate check and the insert behave as one step with
/// respect to concurrent calls.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Whether `token` is the public registration token of some event.
    async fn token_exists(&self, token: &str) -> Result<bool, DatabaseError>;

    /// Committees of the event owning `token` (registration or committee
    /// management token), or `None` if there is no such event.
    async fn committee_availability(
        &self,
        token: &str,
    ) -> Result<Option<Vec<CommitteeAvailability>>, DatabaseError>;

    async fn register(
        &self,
        event_token: &str,
        registrant: NewRegistrant,
    ) -> Result<Admitted, RegistrationError>;

    /// Inserts the event and all of its committees, or nothing.
    async fn create_event(&self, event: Event, committees: Vec<Committee>)
        -> Result<(), EventError>;

    async fn events_by_owner(&self, owner: Uuid) -> Result<Vec<Event>, DatabaseError>;

    /// Returns `false` if no event had this id.
    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn event_registrations(
        &self,
        event_id: Uuid,
    ) -> Result<Option<Vec<CommitteeRegistrations>>, DatabaseError>;

    async fn create_user(&self, user: User) -> Result<(), AccountError>;

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChangeset,
    ) -> Result<Option<User>, AccountError>;
}
