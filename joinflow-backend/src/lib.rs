pub mod error;
pub mod routes;
pub mod secrets;
pub mod telemetry;

use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use error::AppError;
use joinflow_config::Config;
use joinflow_database::{get_database_connection, setup_schema, MemoryStore, PgStore, Store};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{info, warn};

use crate::routes::accounts::login::login;
use crate::routes::accounts::profile::{profile, update_profile};
use crate::routes::accounts::signup::signup;
use crate::routes::events::committees::committees;
use crate::routes::events::create::create;
use crate::routes::events::delete::delete;
use crate::routes::events::list::list;
use crate::routes::events::registrations::registrations;
use crate::routes::events::validate::validate;
use crate::routes::register::register;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(store: impl Store) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Picks PostgreSQL when a database url is configured and memory otherwise.
pub async fn setup_store(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    if let Some(database_url) = &config.database_url {
        let pool = get_database_connection(database_url, config.database_pool_size)?;
        setup_schema(&pool).await?;
        Ok(Arc::new(PgStore::new(pool, config.storage_timeout())))
    } else {
        warn!("no database url configured, registrations are kept in memory only");
        Ok(Arc::new(MemoryStore::new()))
    }
}

pub fn router(state: AppState) -> Router {
    // every event route names its parameter `event`, it is an id or a token depending on the route
    let app = Router::new()
        .route("/events", get(list).post(create))
        .route("/events/:event", axum::routing::delete(delete))
        .route("/events/:event/validate", post(validate))
        .route("/events/:event/committees", get(committees))
        .route("/events/:event/registrations", get(registrations))
        .route("/registrations", post(register))
        .route("/users", post(signup))
        .route("/login", post(login))
        .route("/profile", get(profile).put(update_profile))
        .with_state(state);

    // layers are in reverse order
    app.layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_response(DefaultOnResponse::default().include_headers(true)),
        )
        .layer(CatchPanicLayer::new())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

pub async fn run_server(config: Config) -> Result<(), AppError> {
    info!("starting up server...");

    let store = setup_store(&config).await?;
    let app = router(AppState { store });

    let listener = TcpListener::bind(config.listen_address).await?;
    info!("listening on {}", config.listen_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    warn!("SHUTDOWN");
    Ok(())
}

#[allow(clippy::redundant_pub_crate)]
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
