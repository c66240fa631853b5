//! Offline alert check against a local log directory

use anyhow::Result;
use colored::Colorize;
use monitor_lib::evaluator::evaluate;
use monitor_lib::log::{read_metrics, read_status, LogPaths};
use monitor_lib::notifier::{DEFAULT_METRICS_TAIL, DEFAULT_STATUS_TAIL};
use monitor_lib::{Alert, Severity, Thresholds};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

use crate::output::{color_severity, print_success, print_warning, OutputFormat};

/// Result of evaluating the newest log lines once
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckOutcome {
    /// A log had no usable newest line, so nothing was evaluated
    pub waiting: bool,
    pub alerts: Vec<Alert>,
}

impl CheckOutcome {
    pub fn has_critical(&self) -> bool {
        self.alerts.iter().any(|a| a.severity == Severity::Critical)
    }
}

#[derive(Tabled)]
struct AlertRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Evaluate the logs in `log_dir` with the alert service's rules
pub async fn run_check(log_dir: &Path, cpu_threshold: f64, memory_threshold: f64) -> CheckOutcome {
    let paths = LogPaths::in_dir(log_dir);
    let metrics = read_metrics(&paths.metrics, DEFAULT_METRICS_TAIL).await;
    let status = read_status(&paths.status, DEFAULT_STATUS_TAIL).await;

    match (metrics.sample(), status.sample()) {
        (Some(metrics), Some(status)) => CheckOutcome {
            waiting: false,
            alerts: evaluate(
                metrics,
                status,
                &Thresholds::new(cpu_threshold, memory_threshold),
            ),
        },
        _ => CheckOutcome {
            waiting: true,
            alerts: Vec::new(),
        },
    }
}

pub fn print_outcome(outcome: &CheckOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        }
        OutputFormat::Table => {
            if outcome.waiting {
                print_warning("No usable log data yet, nothing evaluated");
            } else if outcome.alerts.is_empty() {
                print_success("All systems normal");
            } else {
                let rows: Vec<AlertRow> = outcome
                    .alerts
                    .iter()
                    .map(|a| AlertRow {
                        kind: a.kind.to_string(),
                        severity: color_severity(a.severity),
                        message: a.message.clone(),
                    })
                    .collect();

                let table = tabled::Table::new(rows)
                    .with(tabled::settings::Style::rounded())
                    .to_string();
                println!("{}", table);
                println!("\n{} {}", "Alerts:".bold(), outcome.alerts.len());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_lib::AlertKind;
    use tempfile::TempDir;

    async fn write_logs(dir: &TempDir, metrics: &str, status: &str) {
        let paths = LogPaths::in_dir(dir.path());
        tokio::fs::write(&paths.metrics, metrics).await.unwrap();
        tokio::fs::write(&paths.status, status).await.unwrap();
    }

    #[tokio::test]
    async fn test_critical_alert_detected() {
        let dir = TempDir::new().unwrap();
        write_logs(
            &dir,
            "2024-01-09 10:30:00 | CPU: 85.5% | Memory: 40.2% | Latency: 0.125s\n",
            "2024-01-09 10:30:00 | Status: UP | HTTP: 200\n",
        )
        .await;

        let outcome = run_check(dir.path(), 80.0, 80.0).await;

        assert!(!outcome.waiting);
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].kind, AlertKind::HighCpu);
        assert!(outcome.has_critical());
    }

    #[tokio::test]
    async fn test_custom_threshold_silences_alert() {
        let dir = TempDir::new().unwrap();
        write_logs(
            &dir,
            "2024-01-09 10:30:00 | CPU: 85.5% | Memory: 40.2% | Latency: 0.125s\n",
            "2024-01-09 10:30:00 | Status: UP | HTTP: 200\n",
        )
        .await;

        let outcome = run_check(dir.path(), 90.0, 80.0).await;
        assert!(outcome.alerts.is_empty());
        assert!(!outcome.has_critical());
    }

    #[tokio::test]
    async fn test_latency_only_is_not_critical() {
        let dir = TempDir::new().unwrap();
        write_logs(
            &dir,
            "2024-01-09 10:30:00 | CPU: 10.0% | Memory: 20.0% | Latency: 2.5s\n",
            "2024-01-09 10:30:00 | Status: UP | HTTP: 200\n",
        )
        .await;

        let outcome = run_check(dir.path(), 80.0, 80.0).await;
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].severity, Severity::Warning);
        assert!(!outcome.has_critical());
    }

    #[tokio::test]
    async fn test_missing_logs_wait() {
        let dir = TempDir::new().unwrap();
        let outcome = run_check(dir.path(), 80.0, 80.0).await;

        assert!(outcome.waiting);
        assert!(!outcome.has_critical());
    }
}
