//! Threshold evaluation
//!
//! Two presenters consume the same samples with different rules:
//! - [`evaluate`] feeds the email notifier and returns nothing when all is well
//! - [`evaluate_dashboard`] feeds the web page, uses a fixed 60/80 scale for
//!   cpu and memory, and always returns at least one entry

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{format_number, ContainerStatus, MetricSample, StatusSample};

/// Latency above which a warning fires, in seconds
pub const LATENCY_THRESHOLD_SECS: f64 = 1.0;

/// Dashboard warning tier for cpu and memory, in percent
pub const DISPLAY_WARNING_PERCENT: f64 = 60.0;

/// Dashboard critical tier for cpu and memory, in percent
pub const DISPLAY_CRITICAL_PERCENT: f64 = 80.0;

/// HTTP code the health probe expects
pub const HEALTHY_HTTP_CODE: &str = "200";

/// Alert severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert type classification, also the cooldown key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    ContainerDown,
    UnhealthyResponse,
    HighCpu,
    HighMemory,
    HighLatency,
}

impl AlertKind {
    /// Every kind, in evaluation order
    pub const ALL: [AlertKind; 5] = [
        AlertKind::ContainerDown,
        AlertKind::UnhealthyResponse,
        AlertKind::HighCpu,
        AlertKind::HighMemory,
        AlertKind::HighLatency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::ContainerDown => "container_down",
            AlertKind::UnhealthyResponse => "unhealthy_response",
            AlertKind::HighCpu => "high_cpu",
            AlertKind::HighMemory => "high_memory",
            AlertKind::HighLatency => "high_latency",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raised alert
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub severity: Severity,
    pub message: String,
}

impl Alert {
    fn new(kind: AlertKind, severity: Severity, message: String) -> Self {
        Self {
            kind,
            severity,
            message,
        }
    }
}

/// Configurable thresholds for the notifier rules
///
/// Latency always uses [`LATENCY_THRESHOLD_SECS`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub cpu_percent: f64,
    pub memory_percent: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::new(80.0, 80.0)
    }
}

impl Thresholds {
    pub fn new(cpu_percent: f64, memory_percent: f64) -> Self {
        Self {
            cpu_percent,
            memory_percent,
        }
    }
}

/// Evaluate the notifier rules; an empty vector means nothing fired
///
/// Rules are independent and the output keeps the fixed order
/// container, http, cpu, memory, latency. All comparisons are strict.
pub fn evaluate(metrics: &MetricSample, status: &StatusSample, thresholds: &Thresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if status.container_status == ContainerStatus::Down {
        alerts.push(Alert::new(
            AlertKind::ContainerDown,
            Severity::Critical,
            "Container is DOWN!".to_string(),
        ));
    }

    if status.http_code != HEALTHY_HTTP_CODE {
        alerts.push(Alert::new(
            AlertKind::UnhealthyResponse,
            Severity::Critical,
            format!("Unhealthy HTTP Response: {}", status.http_code),
        ));
    }

    if metrics.cpu_percent > thresholds.cpu_percent {
        alerts.push(Alert::new(
            AlertKind::HighCpu,
            Severity::Critical,
            format!("High CPU Usage: {}%", format_number(metrics.cpu_percent)),
        ));
    }

    if metrics.memory_percent > thresholds.memory_percent {
        alerts.push(Alert::new(
            AlertKind::HighMemory,
            Severity::Warning,
            format!("High Memory Usage: {}%", format_number(metrics.memory_percent)),
        ));
    }

    if metrics.latency_seconds > LATENCY_THRESHOLD_SECS {
        alerts.push(Alert::new(
            AlertKind::HighLatency,
            Severity::Warning,
            format!("High Latency: {}s", format_number(metrics.latency_seconds)),
        ));
    }

    alerts
}

/// Colour tier for a single cpu or memory value on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayLevel {
    Normal,
    Warning,
    Critical,
}

impl DisplayLevel {
    pub fn classify(percent: f64) -> Self {
        if percent > DISPLAY_CRITICAL_PERCENT {
            DisplayLevel::Critical
        } else if percent > DISPLAY_WARNING_PERCENT {
            DisplayLevel::Warning
        } else {
            DisplayLevel::Normal
        }
    }

    /// CSS class used by the dashboard page
    pub fn css_class(&self) -> &'static str {
        match self {
            DisplayLevel::Normal => "",
            DisplayLevel::Warning => "warning",
            DisplayLevel::Critical => "critical",
        }
    }
}

/// One line of the dashboard alert panel; `severity` is `None` for the all-clear entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardAlert {
    pub severity: Option<Severity>,
    pub message: String,
}

impl DashboardAlert {
    fn critical(message: String) -> Self {
        Self {
            severity: Some(Severity::Critical),
            message,
        }
    }

    fn warning(message: String) -> Self {
        Self {
            severity: Some(Severity::Warning),
            message,
        }
    }

    fn all_clear() -> Self {
        Self {
            severity: None,
            message: "All systems normal".to_string(),
        }
    }
}

impl fmt::Display for DashboardAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            Some(Severity::Critical) => write!(f, "🔴 CRITICAL: {}", self.message),
            Some(Severity::Warning) => write!(f, "🟡 WARNING: {}", self.message),
            None => write!(f, "✅ {}", self.message),
        }
    }
}

/// Evaluate the dashboard rules; returns the all-clear entry when nothing fires
pub fn evaluate_dashboard(metrics: &MetricSample, status: &StatusSample) -> Vec<DashboardAlert> {
    let mut alerts = Vec::new();

    if status.container_status == ContainerStatus::Down {
        alerts.push(DashboardAlert::critical("Container is DOWN!".to_string()));
    }

    if status.http_code != HEALTHY_HTTP_CODE {
        alerts.push(DashboardAlert::critical(format!(
            "HTTP response code {} (expected 200)",
            status.http_code
        )));
    }

    if let Some(alert) = tiered("CPU", metrics.cpu_percent) {
        alerts.push(alert);
    }

    if let Some(alert) = tiered("Memory", metrics.memory_percent) {
        alerts.push(alert);
    }

    if metrics.latency_seconds > LATENCY_THRESHOLD_SECS {
        alerts.push(DashboardAlert::warning(format!(
            "High latency {}s (threshold: 1.0s)",
            format_number(metrics.latency_seconds)
        )));
    }

    if alerts.is_empty() {
        alerts.push(DashboardAlert::all_clear());
    }

    alerts
}

fn tiered(label: &str, percent: f64) -> Option<DashboardAlert> {
    let value = format_number(percent);
    match DisplayLevel::classify(percent) {
        DisplayLevel::Critical => Some(DashboardAlert::critical(format!(
            "{} usage at {}% (threshold: 80%)",
            label, value
        ))),
        DisplayLevel::Warning => Some(DashboardAlert::warning(format!(
            "{} usage at {}% (threshold: 60%)",
            label, value
        ))),
        DisplayLevel::Normal => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(cpu: f64, memory: f64, latency: f64) -> MetricSample {
        MetricSample {
            timestamp: "2024-01-09 10:30:00".to_string(),
            cpu_percent: cpu,
            memory_percent: memory,
            latency_seconds: latency,
            raw_tail: Vec::new(),
        }
    }

    fn status(container_status: ContainerStatus, http_code: &str) -> StatusSample {
        StatusSample {
            timestamp: "2024-01-09 10:30:00".to_string(),
            container_status,
            http_code: http_code.to_string(),
            raw_tail: Vec::new(),
        }
    }

    fn healthy() -> StatusSample {
        status(ContainerStatus::Up, "200")
    }

    #[test]
    fn test_cpu_above_threshold_is_single_critical() {
        let alerts = evaluate(&metrics(85.0, 10.0, 0.1), &healthy(), &Thresholds::default());

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighCpu);
        assert_eq!(alerts[0].severity, Severity::Critical);
    }

    #[test]
    fn test_cpu_at_threshold_does_not_fire() {
        let alerts = evaluate(&metrics(80.0, 80.0, 1.0), &healthy(), &Thresholds::default());
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_example_line_raises_cpu_alert() {
        let sample = metrics(85.5, 40.2, 0.125);
        let alerts = evaluate(&sample, &healthy(), &Thresholds::new(80.0, 80.0));

        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighCpu);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert!(alerts[0].message.contains("85.5"));
    }

    #[test]
    fn test_all_rules_fire_in_fixed_order() {
        let alerts = evaluate(
            &metrics(95.0, 95.0, 2.5),
            &status(ContainerStatus::Down, "000"),
            &Thresholds::default(),
        );

        let kinds: Vec<AlertKind> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(kinds, AlertKind::ALL.to_vec());
        assert_eq!(alerts[3].severity, Severity::Warning);
        assert_eq!(alerts[4].severity, Severity::Warning);
    }

    #[test]
    fn test_custom_memory_threshold() {
        let alerts = evaluate(&metrics(10.0, 55.0, 0.1), &healthy(), &Thresholds::new(80.0, 50.0));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighMemory);
        assert_eq!(alerts[0].message, "High Memory Usage: 55.0%");
    }

    #[test]
    fn test_latency_threshold_ignores_custom_limits() {
        let lenient = Thresholds::new(99.0, 99.0);

        assert!(evaluate(&metrics(10.0, 10.0, 1.0), &healthy(), &lenient).is_empty());

        let alerts = evaluate(&metrics(10.0, 10.0, 1.01), &healthy(), &lenient);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::HighLatency);
        assert_eq!(alerts[0].message, "High Latency: 1.01s");
    }

    #[test]
    fn test_unknown_status_only_flags_http() {
        let alerts = evaluate(
            &metrics(1.0, 1.0, 0.1),
            &status(ContainerStatus::Unknown, "000"),
            &Thresholds::default(),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, AlertKind::UnhealthyResponse);
    }

    #[test]
    fn test_dashboard_all_clear() {
        let alerts = evaluate_dashboard(&metrics(10.0, 10.0, 0.1), &healthy());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].severity, None);
        assert_eq!(alerts[0].to_string(), "✅ All systems normal");
    }

    #[test]
    fn test_dashboard_two_tier_scale() {
        let alerts = evaluate_dashboard(&metrics(65.0, 85.0, 0.1), &healthy());

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, Some(Severity::Warning));
        assert_eq!(alerts[0].to_string(), "🟡 WARNING: CPU usage at 65.0% (threshold: 60%)");
        assert_eq!(alerts[1].severity, Some(Severity::Critical));
        assert!(alerts[1].message.starts_with("Memory usage at 85.0%"));
    }

    #[test]
    fn test_dashboard_defaults_flag_http() {
        let alerts = evaluate_dashboard(
            &MetricSample::fallback(Vec::new()),
            &StatusSample::fallback(Vec::new()),
        );
        assert_eq!(alerts.len(), 1);
        assert_eq!(
            alerts[0].to_string(),
            "🔴 CRITICAL: HTTP response code 000 (expected 200)"
        );
    }

    #[test]
    fn test_display_level_boundaries() {
        assert_eq!(DisplayLevel::classify(60.0), DisplayLevel::Normal);
        assert_eq!(DisplayLevel::classify(60.1), DisplayLevel::Warning);
        assert_eq!(DisplayLevel::classify(80.0), DisplayLevel::Warning);
        assert_eq!(DisplayLevel::classify(80.1), DisplayLevel::Critical);
        assert_eq!(DisplayLevel::Critical.css_class(), "critical");
    }
}
