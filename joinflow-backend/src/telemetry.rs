use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, Layer as _};

const DEFAULT_LOG_LEVEL: &str =
    "info,joinflow_backend=debug,joinflow_database=debug,tower_http=debug";

/// Logs to stdout, filtered by `RUST_LOG`.
pub fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer();
    tracing_subscriber::registry()
        .with(
            stdout_log.with_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_LEVEL.into()),
            ),
        )
        .init();
}
