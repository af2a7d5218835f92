use joinflow_backend::error::AppError;
use joinflow_backend::run_server;
use joinflow_backend::telemetry::setup_logging;
use joinflow_config::get_config;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // avoid putting more code here as this is outside of all spans
    setup_logging();
    let config = get_config()?;
    run_server(config).await
}
