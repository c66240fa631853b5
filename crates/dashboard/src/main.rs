//! Dashboard service
//!
//! Renders the shared monitoring logs as a web page on port 8001.

use anyhow::Result;
use dashboard::{
    api::{self, AppState},
    config::{DashboardConfig, DASHBOARD_PORT},
};
use monitor_lib::{
    health::{components, HealthRegistry},
    StructuredLogger,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = DashboardConfig::load()?;
    info!(log_dir = %config.log_dir, port = DASHBOARD_PORT, "Dashboard configured");

    let health_registry = HealthRegistry::new();
    health_registry.register(components::METRICS_LOG).await;
    health_registry.register(components::STATUS_LOG).await;

    let logger = StructuredLogger::new("dashboard");
    logger.log_startup(SERVICE_VERSION);

    let state = Arc::new(AppState::new(config.log_paths(), health_registry.clone()));
    health_registry.set_ready(true).await;

    tokio::select! {
        result = api::serve(DASHBOARD_PORT, state) => result?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            logger.log_shutdown("SIGINT received");
        }
    }

    Ok(())
}
