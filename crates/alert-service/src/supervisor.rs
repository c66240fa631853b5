//! Watches the check loop and health API until shutdown

use anyhow::{anyhow, Context, Result};
use monitor_lib::{
    check_loop::LoopSummary,
    health::{components, HealthRegistry},
    StructuredLogger,
};
use std::future::Future;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::error;

/// Wait for `signal`, or fail as soon as either background task stops on its own
///
/// On an early stop the check loop component is marked unhealthy and
/// readiness is withdrawn before the error is returned.
pub async fn supervise<S>(
    mut loop_handle: JoinHandle<LoopSummary>,
    mut api_handle: JoinHandle<Result<()>>,
    shutdown_tx: broadcast::Sender<()>,
    health: &HealthRegistry,
    logger: &StructuredLogger,
    signal: S,
) -> Result<LoopSummary>
where
    S: Future<Output = std::io::Result<()>>,
{
    tokio::select! {
        result = signal => {
            result.context("Failed to listen for shutdown signal")?;
            logger.log_shutdown("SIGINT received");

            // The loop may already have stopped; nothing to signal then
            let _ = shutdown_tx.send(());
            let summary = loop_handle.await.context("Alert check loop panicked")?;
            api_handle.abort();
            Ok(summary)
        }
        result = &mut loop_handle => {
            api_handle.abort();
            let reason = match result {
                Ok(summary) => anyhow!(
                    "Alert check loop stopped unexpectedly after {} cycles",
                    summary.cycles
                ),
                Err(e) => anyhow!(e).context("Alert check loop panicked"),
            };
            mark_down(health, &reason).await;
            Err(reason)
        }
        result = &mut api_handle => {
            let _ = shutdown_tx.send(());
            loop_handle.abort();
            let reason = match result {
                Ok(Ok(())) => anyhow!("Health API stopped unexpectedly"),
                Ok(Err(e)) => e.context("Health API failed"),
                Err(e) => anyhow!(e).context("Health API panicked"),
            };
            error!(error = %format!("{:#}", reason), "Health API stopped");
            health.set_ready(false).await;
            Err(reason)
        }
    }
}

async fn mark_down(health: &HealthRegistry, reason: &anyhow::Error) {
    let message = format!("{:#}", reason);
    error!(error = %message, "Alert check loop stopped");
    health.set_unhealthy(components::CHECK_LOOP, message).await;
    health.set_ready(false).await;
}
