//! Per-request view of the logs

use chrono::Utc;
use monitor_lib::{
    evaluator::{evaluate_dashboard, DashboardAlert, DisplayLevel},
    format_number,
    health::HealthRegistry,
    log::{display_tail, read_metrics, read_status, LogPaths},
    MetricSample, MetricsReading, MonitorMetrics, StatusReading, StatusSample,
};
use serde::{Deserialize, Serialize};

/// Lines of each log shown on the page
pub const DISPLAY_TAIL: usize = 10;

/// Everything one render needs, read fresh from disk
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub metrics: MetricSample,
    pub status: StatusSample,
    pub alerts: Vec<DashboardAlert>,
    pub recent_metrics: String,
    pub recent_status: String,
}

impl DashboardSnapshot {
    /// Read both logs, falling back to default values for missing or malformed lines
    pub async fn load(paths: &LogPaths, health: &HealthRegistry, metrics: &MonitorMetrics) -> Self {
        let metrics_reading = read_metrics(&paths.metrics, DISPLAY_TAIL).await;
        let status_reading = read_status(&paths.status, DISPLAY_TAIL).await;

        health
            .observe_readings(&metrics_reading, &status_reading)
            .await;
        if matches!(metrics_reading, MetricsReading::Malformed { .. }) {
            metrics.inc_malformed_line("metrics");
        }
        if matches!(status_reading, StatusReading::Malformed { .. }) {
            metrics.inc_malformed_line("status");
        }

        let sample = metrics_reading.or_default();
        let status = status_reading.or_default();
        let alerts = evaluate_dashboard(&sample, &status);

        // Shown lines come from the same read as the parsed values
        Self {
            recent_metrics: display_tail(&paths.metrics, &sample.raw_tail).await,
            recent_status: display_tail(&paths.status, &status.raw_tail).await,
            metrics: sample,
            status,
            alerts,
        }
    }

    pub fn cpu_display(&self) -> String {
        format!("{}%", format_number(self.metrics.cpu_percent))
    }

    pub fn memory_display(&self) -> String {
        format!("{}%", format_number(self.metrics.memory_percent))
    }

    pub fn latency_display(&self) -> String {
        format_number(self.metrics.latency_seconds)
    }

    pub fn cpu_level(&self) -> DisplayLevel {
        DisplayLevel::classify(self.metrics.cpu_percent)
    }

    pub fn memory_level(&self) -> DisplayLevel {
        DisplayLevel::classify(self.metrics.memory_percent)
    }

    /// Alert panel text, one entry per line
    pub fn alert_text(&self) -> String {
        self.alerts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_response(&self) -> MetricsResponse {
        MetricsResponse {
            timestamp: Utc::now().to_rfc3339(),
            container_status: self.status.container_status.to_string(),
            http_code: self.status.http_code.clone(),
            cpu: self.cpu_display(),
            memory: self.memory_display(),
            latency: self.latency_display(),
        }
    }
}

/// Body of `GET /api/metrics`; every field is a string so the shape never changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    pub timestamp: String,
    pub container_status: String,
    pub http_code: String,
    pub cpu: String,
    pub memory: String,
    pub latency: String,
}
