//! Periodic alert check loop
//!
//! Waits for the log producer to start, then runs one notifier cycle per
//! tick until a shutdown signal arrives. Cycles never overlap.

use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::notifier::{CooldownState, Notifier, DEFAULT_COOLDOWN_SECS};
use crate::observability::MonitorMetrics;

/// Shortest period the ticker accepts
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for the check loop
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Time between cycles (default: 30 seconds)
    pub interval: Duration,
    /// Delay before the first cycle (default: 30 seconds)
    pub startup_delay: Duration,
    /// Minimum time between two alerts of the same kind (default: 300 seconds)
    pub cooldown: Duration,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            startup_delay: Duration::from_secs(30),
            cooldown: Duration::from_secs(DEFAULT_COOLDOWN_SECS),
        }
    }
}

/// Counters returned when the loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopSummary {
    pub cycles: u64,
    pub alerts_sent: u64,
}

/// Alert check loop owning the cooldown state
pub struct CheckLoop {
    notifier: Notifier,
    config: CheckConfig,
    state: CooldownState,
    metrics: MonitorMetrics,
}

impl CheckLoop {
    pub fn new(notifier: Notifier, config: CheckConfig) -> Self {
        let state = CooldownState::new(config.cooldown);
        Self {
            notifier,
            config,
            state,
            metrics: MonitorMetrics::new(),
        }
    }

    /// Run until `shutdown` fires or its sender is dropped
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) -> LoopSummary {
        let mut summary = LoopSummary::default();

        info!(
            startup_delay_secs = self.config.startup_delay.as_secs(),
            "Waiting for monitoring logs"
        );
        tokio::select! {
            _ = sleep(self.config.startup_delay) => {}
            _ = shutdown.recv() => {
                info!("Shutdown before first check");
                return summary;
            }
        }

        info!(
            interval_secs = self.config.interval.as_secs(),
            cooldown_secs = self.state.cooldown().as_secs(),
            "Starting alert check loop"
        );

        let mut ticker = interval(self.config.interval.max(MIN_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let start = Instant::now();
                    let report = self
                        .notifier
                        .run_cycle(&mut self.state, start.into_std())
                        .await;
                    let elapsed = start.elapsed();

                    self.metrics.observe_check(elapsed.as_secs_f64());
                    summary.cycles += 1;
                    summary.alerts_sent += report.sent.len() as u64;

                    debug!(
                        cycle = summary.cycles,
                        raised = report.raised.len(),
                        sent = report.sent.len(),
                        suppressed = report.suppressed.len(),
                        failed = report.failed.len(),
                        elapsed_ms = elapsed.as_millis(),
                        "Check cycle complete"
                    );
                }
                _ = shutdown.recv() => {
                    info!(cycles = summary.cycles, "Shutting down alert check loop");
                    break;
                }
            }
        }

        summary
    }
}
