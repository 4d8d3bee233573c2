//! DevOps demo service entry point.

use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use devops_app::api::{serve, AppState};
use devops_app::config::Config;
use devops_app::utils::shutdown_signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration comes first: it decides the log filter
    let config = Config::load();

    let filter = match &config {
        Ok(config) => EnvFilter::try_new(config.log_filter())
            .unwrap_or_else(|_| EnvFilter::new("info")),
        Err(_) => EnvFilter::new("info"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = config.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!("Configuration loaded successfully");
    info!("Version: {}", config.app_version);
    info!("Environment: {}", config.environment);
    info!("Debug: {}", config.debug);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("Failed to bind {}: {}", addr, e);
        e
    })?;
    info!("HTTP server listening on {}", addr);

    serve(listener, AppState::new(config), shutdown_signal()).await?;

    info!("Server stopped");
    Ok(())
}
