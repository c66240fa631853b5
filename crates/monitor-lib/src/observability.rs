//! Observability infrastructure for the monitoring services
//!
//! Provides:
//! - Prometheus metrics (check cycles, alert delivery, parse failures, dashboard renders)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, register_int_counter_vec,
    GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::evaluator::{AlertKind, Severity};

/// Histogram buckets for check cycle duration (in seconds)
const CHECK_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<MonitorMetricsInner> = OnceLock::new();

struct MonitorMetricsInner {
    check_cycles: IntCounter,
    check_duration_seconds: Histogram,
    alerts_sent: IntCounterVec,
    alerts_suppressed: IntCounterVec,
    delivery_failures: IntCounterVec,
    malformed_lines: IntCounterVec,
    dashboard_requests: IntCounterVec,
    latest_sample: GaugeVec,
}

impl MonitorMetricsInner {
    fn new() -> Self {
        Self {
            check_cycles: register_int_counter!(
                "monitor_check_cycles_total",
                "Number of alert evaluation cycles run"
            )
            .expect("Failed to register check_cycles"),

            check_duration_seconds: register_histogram!(
                "monitor_check_duration_seconds",
                "Time spent reading logs, evaluating and notifying in one cycle",
                CHECK_BUCKETS.to_vec()
            )
            .expect("Failed to register check_duration_seconds"),

            alerts_sent: register_int_counter_vec!(
                "monitor_alerts_sent_total",
                "Alerts that passed the cooldown and were handed to the mailer",
                &["kind", "severity"]
            )
            .expect("Failed to register alerts_sent"),

            alerts_suppressed: register_int_counter_vec!(
                "monitor_alerts_suppressed_total",
                "Alerts dropped because their kind was still cooling down",
                &["kind"]
            )
            .expect("Failed to register alerts_suppressed"),

            delivery_failures: register_int_counter_vec!(
                "monitor_alert_delivery_failures_total",
                "Alert emails the mailer failed to deliver",
                &["kind"]
            )
            .expect("Failed to register delivery_failures"),

            malformed_lines: register_int_counter_vec!(
                "monitor_malformed_lines_total",
                "Newest log lines that did not match the expected format",
                &["log"]
            )
            .expect("Failed to register malformed_lines"),

            dashboard_requests: register_int_counter_vec!(
                "monitor_dashboard_requests_total",
                "Dashboard renders by endpoint",
                &["endpoint"]
            )
            .expect("Failed to register dashboard_requests"),

            latest_sample: register_gauge_vec!(
                "monitor_latest_sample",
                "Most recently parsed metric values",
                &["metric"]
            )
            .expect("Failed to register latest_sample"),
        }
    }
}

/// Metrics handle for Prometheus exposition
///
/// Clones share the same global registry entries.
#[derive(Clone)]
pub struct MonitorMetrics {
    _private: (),
}

impl Default for MonitorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MonitorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(MonitorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &MonitorMetricsInner {
        GLOBAL_METRICS.get_or_init(MonitorMetricsInner::new)
    }

    /// Record one finished check cycle
    pub fn observe_check(&self, duration_secs: f64) {
        self.inner().check_cycles.inc();
        self.inner().check_duration_seconds.observe(duration_secs);
    }

    pub fn inc_alert_sent(&self, kind: AlertKind, severity: Severity) {
        self.inner()
            .alerts_sent
            .with_label_values(&[kind.as_str(), severity.as_str()])
            .inc();
    }

    pub fn inc_alert_suppressed(&self, kind: AlertKind) {
        self.inner()
            .alerts_suppressed
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    pub fn inc_delivery_failure(&self, kind: AlertKind) {
        self.inner()
            .delivery_failures
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    /// Count a malformed newest line; `log` is "metrics" or "status"
    pub fn inc_malformed_line(&self, log: &str) {
        self.inner().malformed_lines.with_label_values(&[log]).inc();
    }

    pub fn inc_dashboard_request(&self, endpoint: &str) {
        self.inner()
            .dashboard_requests
            .with_label_values(&[endpoint])
            .inc();
    }

    /// Publish the latest parsed cpu, memory and latency values
    pub fn set_latest_sample(&self, cpu_percent: f64, memory_percent: f64, latency_seconds: f64) {
        let gauge = &self.inner().latest_sample;
        gauge.with_label_values(&["cpu_percent"]).set(cpu_percent);
        gauge.with_label_values(&["memory_percent"]).set(memory_percent);
        gauge.with_label_values(&["latency_seconds"]).set(latency_seconds);
    }
}

/// Structured logger for monitoring events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn log_startup(&self, version: &str) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            "Monitoring service started"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Monitoring service shutting down"
        );
    }

    pub fn log_alert_sent(&self, kind: AlertKind, severity: Severity, message_id: &str) {
        info!(
            event = "alert_sent",
            service = %self.service,
            kind = %kind,
            severity = %severity,
            message_id = %message_id,
            "Alert sent"
        );
    }

    pub fn log_alert_suppressed(&self, kind: AlertKind, remaining: Duration) {
        info!(
            event = "alert_suppressed",
            service = %self.service,
            kind = %kind,
            remaining_secs = remaining.as_secs(),
            "Alert suppressed by cooldown"
        );
    }

    pub fn log_delivery_failed(&self, kind: AlertKind, error: &str) {
        error!(
            event = "alert_delivery_failed",
            service = %self.service,
            kind = %kind,
            error = %error,
            "Failed to send alert"
        );
    }

    pub fn log_waiting(&self, metrics_ready: bool, status_ready: bool) {
        info!(
            event = "waiting_for_metrics",
            service = %self.service,
            metrics_ready = metrics_ready,
            status_ready = status_ready,
            "Waiting for metrics"
        );
    }

    pub fn log_all_normal(&self, cpu_percent: f64, memory_percent: f64, latency_seconds: f64) {
        info!(
            event = "check_normal",
            service = %self.service,
            cpu_percent = cpu_percent,
            memory_percent = memory_percent,
            latency_seconds = latency_seconds,
            "All metrics normal"
        );
    }

    pub fn log_cycle_alerts(&self, sent: &[AlertKind], suppressed: &[AlertKind]) {
        let sent: Vec<&str> = sent.iter().map(AlertKind::as_str).collect();
        let suppressed: Vec<&str> = suppressed.iter().map(AlertKind::as_str).collect();
        warn!(
            event = "check_alerts",
            service = %self.service,
            sent = %sent.join(","),
            suppressed = %suppressed.join(","),
            "Alert conditions present"
        );
    }
}
