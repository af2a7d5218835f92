pub mod admission;
pub mod error;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod schema;
pub mod store;

use diesel_async::pooled_connection::deadpool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::{AsyncPgConnection, SimpleAsyncConnection as _};
pub use error::{AccountError, DatabaseError, EventError, RegistrationError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::Store;
use tracing::info;

pub type Pool = deadpool::Pool<AsyncPgConnection>;

const MIGRATIONS: [&str; 2] = [
    include_str!("../migrations/2024-01-01-000000_create_joinflow.sql"),
    include_str!("../migrations/2024-03-01-000000_unbounded_text.sql"),
];

// https://github.com/tokio-rs/axum/tree/main/examples/diesel-async-postgres

pub fn get_database_connection(
    database_url: &str,
    max_size: usize,
) -> Result<Pool, DatabaseError> {
    let config = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    Ok(Pool::builder(config).max_size(max_size).build()?)
}

/// Creates missing tables and indexes. Safe to run on every start.
pub async fn setup_schema(pool: &Pool) -> Result<(), DatabaseError> {
    let mut connection = pool.get().await?;
    for migration in MIGRATIONS {
        connection.batch_execute(migration).await?;
    }
    info!("database schema is up to date");
    Ok(())
}
