//! One alert evaluation cycle: read, evaluate, gate by cooldown, send

use chrono::Local;
use std::sync::Arc;
use std::time::Instant;

use super::cooldown::CooldownState;
use super::mailer::Mailer;
use super::message::compose;
use crate::evaluator::{evaluate, AlertKind, Thresholds};
use crate::health::{components, HealthRegistry};
use crate::log::{read_metrics, read_status, LogPaths};
use crate::models::{MetricsReading, StatusReading};
use crate::observability::{MonitorMetrics, StructuredLogger};

/// Lines of metrics history attached to alerts
pub const DEFAULT_METRICS_TAIL: usize = 10;

/// Lines of status history attached to alerts
pub const DEFAULT_STATUS_TAIL: usize = 5;

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub paths: LogPaths,
    pub thresholds: Thresholds,
    pub metrics_tail: usize,
    pub status_tail: usize,
}

impl NotifierConfig {
    pub fn new(paths: LogPaths, thresholds: Thresholds) -> Self {
        Self {
            paths,
            thresholds,
            metrics_tail: DEFAULT_METRICS_TAIL,
            status_tail: DEFAULT_STATUS_TAIL,
        }
    }
}

/// What happened during one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Either log had no usable newest line, so nothing was evaluated
    pub waiting: bool,
    pub raised: Vec<AlertKind>,
    pub sent: Vec<AlertKind>,
    pub suppressed: Vec<AlertKind>,
    /// Passed the cooldown but delivery failed; the cooldown still applies
    pub failed: Vec<AlertKind>,
}

/// Cooldown-gated alert dispatcher
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    config: NotifierConfig,
    health: HealthRegistry,
    metrics: MonitorMetrics,
    logger: StructuredLogger,
}

impl Notifier {
    pub fn new(
        mailer: Arc<dyn Mailer>,
        config: NotifierConfig,
        health: HealthRegistry,
        logger: StructuredLogger,
    ) -> Self {
        Self {
            mailer,
            config,
            health,
            metrics: MonitorMetrics::new(),
            logger,
        }
    }

    /// Run one evaluation cycle at `now`
    ///
    /// Never fails: unreadable logs end the cycle early and delivery
    /// errors are logged and counted.
    pub async fn run_cycle(&self, state: &mut CooldownState, now: Instant) -> CycleReport {
        let metrics_reading = read_metrics(&self.config.paths.metrics, self.config.metrics_tail).await;
        let status_reading = read_status(&self.config.paths.status, self.config.status_tail).await;

        self.health
            .observe_readings(&metrics_reading, &status_reading)
            .await;
        if matches!(metrics_reading, MetricsReading::Malformed { .. }) {
            self.metrics.inc_malformed_line("metrics");
        }
        if matches!(status_reading, StatusReading::Malformed { .. }) {
            self.metrics.inc_malformed_line("status");
        }

        let mut report = CycleReport::default();

        let (Some(metrics), Some(status)) = (metrics_reading.sample(), status_reading.sample())
        else {
            self.logger.log_waiting(
                metrics_reading.sample().is_some(),
                status_reading.sample().is_some(),
            );
            report.waiting = true;
            return report;
        };

        self.metrics.set_latest_sample(
            metrics.cpu_percent,
            metrics.memory_percent,
            metrics.latency_seconds,
        );

        let thresholds = &self.config.thresholds;
        for alert in evaluate(metrics, status, thresholds) {
            report.raised.push(alert.kind);

            if !state.try_acquire(alert.kind, now) {
                self.metrics.inc_alert_suppressed(alert.kind);
                self.logger
                    .log_alert_suppressed(alert.kind, state.remaining(alert.kind, now));
                report.suppressed.push(alert.kind);
                continue;
            }

            let email = compose(&alert, metrics, status, thresholds, Local::now());
            match self.mailer.send(&email).await {
                Ok(message_id) => {
                    self.metrics.inc_alert_sent(alert.kind, alert.severity);
                    self.logger
                        .log_alert_sent(alert.kind, alert.severity, &message_id);
                    self.health.set_healthy(components::MAILER).await;
                    report.sent.push(alert.kind);
                }
                Err(e) => {
                    self.metrics.inc_delivery_failure(alert.kind);
                    self.logger.log_delivery_failed(alert.kind, &e.to_string());
                    self.health
                        .set_degraded(components::MAILER, e.to_string())
                        .await;
                    report.failed.push(alert.kind);
                }
            }
        }

        if report.raised.is_empty() {
            self.logger.log_all_normal(
                metrics.cpu_percent,
                metrics.memory_percent,
                metrics.latency_seconds,
            );
        } else {
            self.logger
                .log_cycle_alerts(&report.sent, &report.suppressed);
        }

        report
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::notifier::mailer::MailerError;
    use crate::notifier::message::AlertEmail;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records every email instead of delivering it
    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<AlertEmail>>,
        pub fail: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &AlertEmail) -> Result<String, MailerError> {
            self.sent.lock().unwrap().push(email.clone());
            if self.fail {
                Err(MailerError::Delivery("simulated outage".to_string()))
            } else {
                Ok(format!("msg-{}", self.count()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingMailer;
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::fs;

    const HOT_CPU: &str = "2024-01-09 10:30:00 | CPU: 85.5% | Memory: 40.2% | Latency: 0.125s\n";
    const CALM: &str = "2024-01-09 10:30:00 | CPU: 10.0% | Memory: 20.0% | Latency: 0.1s\n";
    const UP: &str = "2024-01-09 10:30:00 | Status: UP | HTTP: 200\n";

    async fn setup(metrics: &str, status: &str) -> (TempDir, NotifierConfig) {
        let dir = TempDir::new().unwrap();
        let paths = LogPaths::in_dir(dir.path());
        fs::write(&paths.metrics, metrics).await.unwrap();
        fs::write(&paths.status, status).await.unwrap();
        (dir, NotifierConfig::new(paths, Thresholds::default()))
    }

    fn notifier(mailer: Arc<RecordingMailer>, config: NotifierConfig) -> Notifier {
        Notifier::new(
            mailer,
            config,
            HealthRegistry::new(),
            StructuredLogger::new("alert-service-test"),
        )
    }

    #[tokio::test]
    async fn test_repeat_within_cooldown_sends_once() {
        let (_dir, config) = setup(HOT_CPU, UP).await;
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone(), config);
        let mut state = CooldownState::new(Duration::from_secs(300));
        let start = Instant::now();

        let first = notifier.run_cycle(&mut state, start).await;
        let second = notifier
            .run_cycle(&mut state, start + Duration::from_secs(30))
            .await;

        assert_eq!(first.sent, vec![AlertKind::HighCpu]);
        assert_eq!(second.suppressed, vec![AlertKind::HighCpu]);
        assert_eq!(mailer.count(), 1);
    }

    #[tokio::test]
    async fn test_cycles_spanning_cooldown_send_twice() {
        let (_dir, config) = setup(HOT_CPU, UP).await;
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone(), config);
        let mut state = CooldownState::new(Duration::from_secs(300));
        let start = Instant::now();

        notifier.run_cycle(&mut state, start).await;
        notifier
            .run_cycle(&mut state, start + Duration::from_secs(301))
            .await;

        assert_eq!(mailer.count(), 2);
        let subjects: Vec<String> = mailer
            .sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.subject.clone())
            .collect();
        assert_eq!(subjects, vec!["[CRITICAL] High CPU Usage: 85.5%"; 2]);
    }

    #[tokio::test]
    async fn test_failed_delivery_still_starts_cooldown() {
        let (_dir, config) = setup(HOT_CPU, UP).await;
        let mailer = Arc::new(RecordingMailer::failing());
        let notifier = notifier(mailer.clone(), config);
        let mut state = CooldownState::new(Duration::from_secs(300));
        let start = Instant::now();

        let first = notifier.run_cycle(&mut state, start).await;
        let second = notifier
            .run_cycle(&mut state, start + Duration::from_secs(60))
            .await;

        assert_eq!(first.failed, vec![AlertKind::HighCpu]);
        assert!(first.sent.is_empty());
        assert_eq!(second.suppressed, vec![AlertKind::HighCpu]);
        assert_eq!(mailer.count(), 1);
    }

    #[tokio::test]
    async fn test_missing_logs_wait_without_sending() {
        let dir = TempDir::new().unwrap();
        let config = NotifierConfig::new(LogPaths::in_dir(dir.path()), Thresholds::default());
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone(), config);
        let mut state = CooldownState::default();

        let report = notifier.run_cycle(&mut state, Instant::now()).await;

        assert!(report.waiting);
        assert_eq!(mailer.count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_status_is_not_alerted() {
        let (_dir, config) = setup(HOT_CPU, "2024-01-09 10:30:00 | Status:\n").await;
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone(), config);
        let mut state = CooldownState::default();

        let report = notifier.run_cycle(&mut state, Instant::now()).await;

        assert!(report.waiting);
        assert_eq!(mailer.count(), 0);
    }

    #[tokio::test]
    async fn test_normal_metrics_raise_nothing() {
        let (_dir, config) = setup(CALM, UP).await;
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone(), config);
        let mut state = CooldownState::default();

        let report = notifier.run_cycle(&mut state, Instant::now()).await;

        assert!(!report.waiting);
        assert!(report.raised.is_empty());
        assert_eq!(mailer.count(), 0);
    }

    #[tokio::test]
    async fn test_container_down_raises_both_status_alerts() {
        let (_dir, config) = setup(CALM, "2024-01-09 10:30:00 | Status: DOWN | HTTP: 000\n").await;
        let mailer = Arc::new(RecordingMailer::default());
        let notifier = notifier(mailer.clone(), config);
        let mut state = CooldownState::default();

        let report = notifier.run_cycle(&mut state, Instant::now()).await;

        assert_eq!(
            report.sent,
            vec![AlertKind::ContainerDown, AlertKind::UnhealthyResponse]
        );
        assert_eq!(mailer.count(), 2);
    }
}
