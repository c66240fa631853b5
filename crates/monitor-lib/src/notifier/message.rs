//! Alert email composition

use chrono::{DateTime, Local};

use crate::evaluator::{Alert, AlertKind, Severity, Thresholds, LATENCY_THRESHOLD_SECS};
use crate::models::{format_number, MetricSample, StatusSample};

/// A rendered alert email
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEmail {
    pub kind: AlertKind,
    pub severity: Severity,
    /// Full subject line including the severity prefix
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

/// Build the email for one alert from the samples that raised it
pub fn compose(
    alert: &Alert,
    metrics: &MetricSample,
    status: &StatusSample,
    thresholds: &Thresholds,
    sent_at: DateTime<Local>,
) -> AlertEmail {
    let text_body = body_for(alert.kind, metrics, status, thresholds);
    AlertEmail {
        kind: alert.kind,
        severity: alert.severity,
        subject: format!("[{}] {}", alert.severity, alert.message),
        html_body: render_html(alert, &text_body, sent_at),
        text_body,
    }
}

fn body_for(
    kind: AlertKind,
    metrics: &MetricSample,
    status: &StatusSample,
    thresholds: &Thresholds,
) -> String {
    let cpu = format_number(metrics.cpu_percent);
    let memory = format_number(metrics.memory_percent);
    let latency = format_number(metrics.latency_seconds);

    match kind {
        AlertKind::ContainerDown => format!(
            "Container Status: {}\nHTTP Response: {}\nTimestamp: {}\n\n\
             Recent Status History:\n{}\n\n\
             Action Required: Investigate and restart container immediately.",
            status.container_status,
            status.http_code,
            status.timestamp,
            status.recent_lines()
        ),
        AlertKind::UnhealthyResponse => format!(
            "HTTP Response Code: {} (Expected: 200)\nContainer Status: {}\nTimestamp: {}\n\n\
             Recent Status History:\n{}\n\n\
             Action Required: Check application logs and health.",
            status.http_code,
            status.container_status,
            status.timestamp,
            status.recent_lines()
        ),
        AlertKind::HighCpu => format!(
            "CPU Usage: {}% (Threshold: {}%)\nMemory Usage: {}%\nLatency: {}s\nTimestamp: {}\n\n\
             Recent Metrics:\n{}\n\n\
             Action Required: Investigate CPU-intensive processes or scale resources.",
            cpu,
            format_number(thresholds.cpu_percent),
            memory,
            latency,
            metrics.timestamp,
            metrics.recent_lines()
        ),
        AlertKind::HighMemory => format!(
            "Memory Usage: {}% (Threshold: {}%)\nCPU Usage: {}%\nLatency: {}s\nTimestamp: {}\n\n\
             Recent Metrics:\n{}\n\n\
             Action Required: Check for memory leaks or scale resources.",
            memory,
            format_number(thresholds.memory_percent),
            cpu,
            latency,
            metrics.timestamp,
            metrics.recent_lines()
        ),
        AlertKind::HighLatency => format!(
            "Response Latency: {}s (Threshold: {}s)\nCPU Usage: {}%\nMemory Usage: {}%\nTimestamp: {}\n\n\
             Recent Metrics:\n{}\n\n\
             Action Required: Investigate slow database queries or external dependencies.",
            latency,
            format_number(LATENCY_THRESHOLD_SECS),
            cpu,
            memory,
            metrics.timestamp,
            metrics.recent_lines()
        ),
    }
}

fn banner_colour(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "#ff4444",
        Severity::Warning => "#ffaa44",
    }
}

fn render_html(alert: &Alert, text_body: &str, sent_at: DateTime<Local>) -> String {
    let details = escape_html(text_body).replace('\n', "<br>");
    format!(
        r#"<html>
<head>
<style>
body {{ font-family: Arial, sans-serif; }}
.alert-box {{ background: {colour}; color: white; padding: 20px; border-radius: 5px; margin: 10px 0; }}
.details {{ background: #f4f4f4; padding: 15px; border-radius: 5px; margin: 10px 0; }}
</style>
</head>
<body>
<div class="alert-box">
<h2>🚨 {severity} ALERT</h2>
<h3>{subject}</h3>
</div>
<div class="details">
{details}
</div>
<p><small>Sent from Docker Monitoring System at {sent_at}</small></p>
</body>
</html>
"#,
        colour = banner_colour(alert.severity),
        severity = alert.severity,
        subject = escape_html(&alert.message),
        details = details,
        sent_at = sent_at.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Escape text for inclusion in HTML element content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::evaluate;
    use crate::models::ContainerStatus;
    use chrono::TimeZone;

    fn samples() -> (MetricSample, StatusSample) {
        let metrics = MetricSample {
            timestamp: "2024-01-09 10:30:00".to_string(),
            cpu_percent: 85.5,
            memory_percent: 40.2,
            latency_seconds: 0.125,
            raw_tail: vec![
                "2024-01-09 10:29:30 | CPU: 70.0% | Memory: 40.0% | Latency: 0.1s".to_string(),
                "2024-01-09 10:30:00 | CPU: 85.5% | Memory: 40.2% | Latency: 0.125s".to_string(),
            ],
        };
        let status = StatusSample {
            timestamp: "2024-01-09 10:30:00".to_string(),
            container_status: ContainerStatus::Down,
            http_code: "000".to_string(),
            raw_tail: vec!["2024-01-09 10:30:00 | Status: DOWN | HTTP: 000".to_string()],
        };
        (metrics, status)
    }

    fn sent_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 9, 10, 30, 5).unwrap()
    }

    #[test]
    fn test_cpu_email_content() {
        let (metrics, status) = samples();
        let thresholds = Thresholds::default();
        let alerts = evaluate(&metrics, &status, &thresholds);
        let cpu_alert = alerts.iter().find(|a| a.kind == AlertKind::HighCpu).unwrap();

        let email = compose(cpu_alert, &metrics, &status, &thresholds, sent_at());

        assert_eq!(email.subject, "[CRITICAL] High CPU Usage: 85.5%");
        assert!(email.text_body.starts_with("CPU Usage: 85.5% (Threshold: 80.0%)"));
        assert!(email.text_body.contains("Recent Metrics:\n2024-01-09 10:29:30"));
        assert!(email.text_body.contains("scale resources"));
        assert!(email.html_body.contains("#ff4444"));
        assert!(email.html_body.contains("2024-01-09 10:30:05"));
    }

    #[test]
    fn test_container_down_email_uses_status_history() {
        let (metrics, status) = samples();
        let thresholds = Thresholds::default();
        let alert = &evaluate(&metrics, &status, &thresholds)[0];

        let email = compose(alert, &metrics, &status, &thresholds, sent_at());

        assert_eq!(email.kind, AlertKind::ContainerDown);
        assert!(email.text_body.contains("Container Status: DOWN"));
        assert!(email.text_body.contains("Status: DOWN | HTTP: 000"));
        assert!(email.html_body.contains("<br>"));
    }

    #[test]
    fn test_warning_banner_colour() {
        let (mut metrics, mut status) = samples();
        metrics.cpu_percent = 10.0;
        metrics.latency_seconds = 2.0;
        status.container_status = ContainerStatus::Up;
        status.http_code = "200".to_string();
        let thresholds = Thresholds::default();

        let alerts = evaluate(&metrics, &status, &thresholds);
        assert_eq!(alerts.len(), 1);

        let email = compose(&alerts[0], &metrics, &status, &thresholds, sent_at());
        assert_eq!(email.subject, "[WARNING] High Latency: 2.0s");
        assert!(email.html_body.contains("#ffaa44"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }
}
