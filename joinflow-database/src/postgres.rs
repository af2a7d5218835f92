use core::future::Future;
use core::time::Duration;
use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use tracing::debug;
use uuid::Uuid;

use crate::admission::{admit, CommitteeSlot};
use crate::error::{AccountError, DatabaseError, EventError, RegistrationError};
use crate::models::{
    Admitted, Committee, CommitteeAvailability, CommitteeRegistrations, Event, NewRegistrant,
    Registration, User, UserChangeset,
};
use crate::schema::{committees, events, registrations, users};
use crate::store::Store;
use crate::Pool;

/// [`Store`] backed by PostgreSQL.
///
/// Admission locks the committee row for the rest of its transaction, so two
/// registrations for the same committee never count concurrently. The unique
/// `(event_id, matric_no)` index catches the same person racing into two
/// different committees.
#[derive(Clone)]
pub struct PgStore {
    pool: Pool,
    timeout: Duration,
}

impl PgStore {
    #[must_use]
    pub const fn new(pool: Pool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }

    async fn bounded<T, E>(
        &self,
        operation: impl Future<Output = Result<T, E>> + Send,
    ) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        tokio::time::timeout(self.timeout, operation)
            .await
            .unwrap_or_else(|_elapsed| Err(DatabaseError::Timeout(self.timeout).into()))
    }
}

#[async_trait]
impl Store for PgStore {
    async fn token_exists(&self, token: &str) -> Result<bool, DatabaseError> {
        self.bounded(async {
            let mut connection = self.pool.get().await?;
            let exists = diesel::select(diesel::dsl::exists(
                events::table.filter(events::token.eq(token)),
            ))
            .get_result::<bool>(&mut connection)
            .await?;
            Ok::<_, DatabaseError>(exists)
        })
        .await
    }

    async fn committee_availability(
        &self,
        token: &str,
    ) -> Result<Option<Vec<CommitteeAvailability>>, DatabaseError> {
        self.bounded(async {
            let mut connection = self.pool.get().await?;
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, DatabaseError, _>(|connection| {
                    async move {
                        let Some(event_id) = events::table
                            .filter(events::token.eq(token).or(events::ajk_token.eq(token)))
                            .select(events::id)
                            .get_result::<Uuid>(connection)
                            .await
                            .optional()?
                        else {
                            return Ok(None);
                        };
                        let committees = committees::table
                            .filter(committees::event_id.eq(event_id))
                            .order((committees::name.asc(), committees::id.asc()))
                            .select(Committee::as_select())
                            .load(connection)
                            .await?;
                        let counts: HashMap<Uuid, i64> = registrations::table
                            .filter(registrations::event_id.eq(event_id))
                            .group_by(registrations::committee_id)
                            .select((registrations::committee_id, diesel::dsl::count_star()))
                            .load::<(Uuid, i64)>(connection)
                            .await?
                            .into_iter()
                            .collect();
                        Ok(Some(
                            committees
                                .iter()
                                .map(|committee| {
                                    CommitteeAvailability::new(
                                        committee,
                                        counts.get(&committee.id).copied().unwrap_or(0),
                                    )
                                })
                                .collect(),
                        ))
                    }
                    .scope_boxed()
                })
                .await
        })
        .await
    }

    async fn register(
        &self,
        event_token: &str,
        registrant: NewRegistrant,
    ) -> Result<Admitted, RegistrationError> {
        self.bounded(async {
            let mut connection = self.pool.get().await.map_err(DatabaseError::from)?;
            connection
                .transaction::<_, RegistrationError, _>(|connection| {
                    async move {
                        let (event_id, group_link) = events::table
                            .filter(events::token.eq(event_token))
                            .select((events::id, events::group_link))
                            .get_result::<(Uuid, Option<String>)>(connection)
                            .await
                            .optional()?
                            .ok_or(RegistrationError::NotFound)?;

                        // held until commit, concurrent admissions to this committee wait here
                        let max_members = committees::table
                            .filter(committees::id.eq(registrant.committee_id))
                            .filter(committees::event_id.eq(event_id))
                            .select(committees::max_members)
                            .for_update()
                            .get_result::<i32>(connection)
                            .await
                            .optional()?;

                        let slot = match max_members {
                            Some(max_members) => {
                                let registered = registrations::table
                                    .filter(registrations::committee_id.eq(registrant.committee_id))
                                    .count()
                                    .get_result::<i64>(connection)
                                    .await?;
                                Some(CommitteeSlot {
                                    max_members,
                                    registered,
                                })
                            }
                            None => None,
                        };

                        let already_registered = diesel::select(diesel::dsl::exists(
                            registrations::table
                                .filter(registrations::event_id.eq(event_id))
                                .filter(registrations::matric_no.eq(&registrant.matric_no)),
                        ))
                        .get_result::<bool>(connection)
                        .await?;

                        admit(slot, already_registered)?;

                        let registration = registrant.into_registration(event_id);
                        diesel::insert_into(registrations::table)
                            .values(&registration)
                            .execute(connection)
                            .await?;
                        debug!(
                            "admitted {} into committee {}",
                            registration.matric_no, registration.committee_id
                        );
                        Ok(Admitted {
                            registration,
                            group_link,
                        })
                    }
                    .scope_boxed()
                })
                .await
        })
        .await
    }

    async fn create_event(
        &self,
        event: Event,
        committees: Vec<Committee>,
    ) -> Result<(), EventError> {
        self.bounded(async {
            let mut connection = self.pool.get().await.map_err(DatabaseError::from)?;
            connection
                .transaction::<_, EventError, _>(|connection| {
                    async move {
                        diesel::insert_into(events::table)
                            .values(&event)
                            .execute(connection)
                            .await?;
                        if !committees.is_empty() {
                            diesel::insert_into(committees::table)
                                .values(&committees)
                                .execute(connection)
                                .await?;
                        }
                        Ok(())
                    }
                    .scope_boxed()
                })
                .await
        })
        .await
    }

    async fn events_by_owner(&self, owner: Uuid) -> Result<Vec<Event>, DatabaseError> {
        self.bounded(async {
            let mut connection = self.pool.get().await?;
            let events = events::table
                .filter(events::created_by.eq(owner))
                .order((events::start_date.asc(), events::id.asc()))
                .select(Event::as_select())
                .load(&mut connection)
                .await?;
            Ok::<_, DatabaseError>(events)
        })
        .await
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.bounded(async {
            let mut connection = self.pool.get().await?;
            let deleted = diesel::delete(events::table.find(id))
                .execute(&mut connection)
                .await?;
            Ok::<_, DatabaseError>(deleted > 0)
        })
        .await
    }

    async fn event_registrations(
        &self,
        event_id: Uuid,
    ) -> Result<Option<Vec<CommitteeRegistrations>>, DatabaseError> {
        self.bounded(async {
            let mut connection = self.pool.get().await?;
            connection
                .build_transaction()
                .read_only()
                .repeatable_read()
                .run::<_, DatabaseError, _>(|connection| {
                    async move {
                        let exists =
                            diesel::select(diesel::dsl::exists(events::table.find(event_id)))
                                .get_result::<bool>(connection)
                                .await?;
                        if !exists {
                            return Ok(None);
                        }
                        let committees = committees::table
                            .filter(committees::event_id.eq(event_id))
                            .order((committees::name.asc(), committees::id.asc()))
                            .select(Committee::as_select())
                            .load(connection)
                            .await?;
                        let registrations = registrations::table
                            .filter(registrations::event_id.eq(event_id))
                            .order((registrations::created_at.asc(), registrations::id.asc()))
                            .select(Registration::as_select())
                            .load(connection)
                            .await?;
                        Ok(Some(CommitteeRegistrations::group(committees, registrations)))
                    }
                    .scope_boxed()
                })
                .await
        })
        .await
    }

    async fn create_user(&self, user: User) -> Result<(), AccountError> {
        self.bounded(async {
            let mut connection = self.pool.get().await.map_err(DatabaseError::from)?;
            diesel::insert_into(users::table)
                .values(&user)
                .execute(&mut connection)
                .await?;
            Ok::<_, AccountError>(())
        })
        .await
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.bounded(async {
            let mut connection = self.pool.get().await?;
            let user = users::table
                .filter(users::email.eq(email))
                .select(User::as_select())
                .get_result(&mut connection)
                .await
                .optional()?;
            Ok::<_, DatabaseError>(user)
        })
        .await
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        self.bounded(async {
            let mut connection = self.pool.get().await?;
            let user = users::table
                .find(id)
                .select(User::as_select())
                .get_result(&mut connection)
                .await
                .optional()?;
            Ok::<_, DatabaseError>(user)
        })
        .await
    }

    async fn update_user(
        &self,
        id: Uuid,
        changes: UserChangeset,
    ) -> Result<Option<User>, AccountError> {
        self.bounded(async {
            let mut connection = self.pool.get().await.map_err(DatabaseError::from)?;
            let user = diesel::update(users::table.find(id))
                .set(&changes)
                .returning(User::as_returning())
                .get_result(&mut connection)
                .await
                .optional()?;
            Ok::<_, AccountError>(user)
        })
        .await
    }
}
