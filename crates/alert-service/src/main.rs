//! Alert service
//!
//! Polls the shared metrics and status logs on a fixed interval and emails
//! an alert through AWS SES when a threshold is crossed, at most once per
//! cooldown window for each alert kind.

use anyhow::Result;
use monitor_lib::{
    check_loop::CheckLoop,
    health::{components, HealthRegistry},
    log::LogPaths,
    notifier::{Notifier, NotifierConfig, SesMailer},
    observability::{MonitorMetrics, StructuredLogger},
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;
mod supervisor;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    let config = config::AlertConfig::load()?;
    let recipients = config.recipients();
    info!(
        sender = ?config.sender(),
        recipients = %recipients.join(", "),
        check_interval_secs = config.check_interval,
        alert_cooldown_secs = config.alert_cooldown,
        cpu_threshold = config.cpu_threshold,
        memory_threshold = config.memory_threshold,
        log_dir = %config.log_dir,
        "Alert service configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::METRICS_LOG).await;
    health_registry.register(components::STATUS_LOG).await;
    health_registry.register(components::MAILER).await;
    health_registry.register(components::CHECK_LOOP).await;

    // Register metrics before the first scrape
    let _metrics = MonitorMetrics::new();

    let logger = StructuredLogger::new("alert-service");
    logger.log_startup(SERVICE_VERSION);

    let mailer = SesMailer::new(&config.aws_region, config.sender(), recipients).await;
    if mailer.sender().is_none() {
        warn!("SENDER_EMAIL is not set; alerts will fail until it is configured");
        health_registry
            .set_degraded(components::MAILER, "SENDER_EMAIL is not configured")
            .await;
    }

    let notifier = Notifier::new(
        Arc::new(mailer),
        NotifierConfig::new(LogPaths::in_dir(&config.log_dir), config.thresholds()),
        health_registry.clone(),
        logger.clone(),
    );
    let check_loop = CheckLoop::new(notifier, config.check_config());

    let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
    let loop_handle = tokio::spawn(check_loop.run(shutdown_rx));

    let app_state = Arc::new(api::AppState::new(health_registry.clone()));
    health_registry.set_ready(true).await;
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    let summary = supervisor::supervise(
        loop_handle,
        api_handle,
        shutdown_tx,
        &health_registry,
        &logger,
        tokio::signal::ctrl_c(),
    )
    .await?;

    info!(
        cycles = summary.cycles,
        alerts_sent = summary.alerts_sent,
        "Alert service stopped"
    );

    Ok(())
}
