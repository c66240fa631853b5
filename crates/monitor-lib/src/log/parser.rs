//! Line parsers for the metrics and status logs
//!
//! Metrics lines look like
//! `2024-01-09 10:30:00 | CPU: 85.5% | Memory: 40.2% | Latency: 0.125s`
//! and status lines like `2024-01-09 10:30:00 | Status: UP | HTTP: 200`.
//! Only the newest line of a tail is parsed; earlier lines are carried
//! verbatim for display.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::ParseError;
use crate::models::{ContainerStatus, MetricSample, MetricsReading, StatusReading, StatusSample};

const NUMBER: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

static METRICS_RE: OnceLock<Regex> = OnceLock::new();
static STATUS_RE: OnceLock<Regex> = OnceLock::new();

fn metrics_re() -> &'static Regex {
    METRICS_RE.get_or_init(|| {
        let pattern = format!(
            r"^\s*(?P<ts>[^|]*?)\s*\|\s*CPU:\s*(?P<cpu>{n})\s*%\s*\|\s*Memory:\s*(?P<mem>{n})\s*%\s*\|\s*Latency:\s*(?P<lat>{n})\s*s\s*$",
            n = NUMBER
        );
        Regex::new(&pattern).expect("metrics pattern is valid")
    })
}

fn status_re() -> &'static Regex {
    STATUS_RE.get_or_init(|| {
        Regex::new(r"^\s*(?P<ts>[^|]*?)\s*\|\s*Status:\s*(?P<status>\S+)\s*\|\s*HTTP:\s*(?P<code>\S+)\s*$")
            .expect("status pattern is valid")
    })
}

/// Fields extracted from one metrics line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMetrics {
    pub timestamp: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub latency_seconds: f64,
}

/// Fields extracted from one status line
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatus {
    pub timestamp: String,
    pub container_status: ContainerStatus,
    pub http_code: String,
}

/// Parse a single metrics line
pub fn parse_metrics_line(line: &str) -> Result<ParsedMetrics, ParseError> {
    let caps = metrics_re()
        .captures(line)
        .ok_or(ParseError::Malformed { format: "metrics" })?;

    Ok(ParsedMetrics {
        timestamp: caps["ts"].to_string(),
        cpu_percent: parse_float("cpu", &caps["cpu"])?,
        memory_percent: parse_float("memory", &caps["mem"])?,
        latency_seconds: parse_float("latency", &caps["lat"])?,
    })
}

/// Parse a single status line
pub fn parse_status_line(line: &str) -> Result<ParsedStatus, ParseError> {
    let caps = status_re()
        .captures(line)
        .ok_or(ParseError::Malformed { format: "status" })?;

    Ok(ParsedStatus {
        timestamp: caps["ts"].to_string(),
        container_status: ContainerStatus::from_word(&caps["status"]),
        http_code: caps["code"].to_string(),
    })
}

/// Turn a metrics tail into a reading; the newest line is authoritative
pub fn parse_metrics_tail(raw_tail: Vec<String>) -> MetricsReading {
    let Some(last) = raw_tail.last() else {
        return MetricsReading::NoData;
    };

    match parse_metrics_line(last) {
        Ok(parsed) => MetricsReading::Sample(MetricSample {
            timestamp: parsed.timestamp,
            cpu_percent: parsed.cpu_percent,
            memory_percent: parsed.memory_percent,
            latency_seconds: parsed.latency_seconds,
            raw_tail,
        }),
        Err(reason) => MetricsReading::Malformed {
            line: last.clone(),
            reason,
            raw_tail,
        },
    }
}

/// Turn a status tail into a reading; the newest line is authoritative
pub fn parse_status_tail(raw_tail: Vec<String>) -> StatusReading {
    let Some(last) = raw_tail.last() else {
        return StatusReading::NoData;
    };

    match parse_status_line(last) {
        Ok(parsed) => StatusReading::Sample(StatusSample {
            timestamp: parsed.timestamp,
            container_status: parsed.container_status,
            http_code: parsed.http_code,
            raw_tail,
        }),
        Err(reason) => StatusReading::Malformed {
            line: last.clone(),
            reason,
            raw_tail,
        },
    }
}

fn parse_float(field: &'static str, value: &str) -> Result<f64, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metrics_line() {
        let parsed =
            parse_metrics_line("2024-01-09 10:30:00 | CPU: 85.5% | Memory: 40.2% | Latency: 0.125s")
                .unwrap();

        assert_eq!(parsed.timestamp, "2024-01-09 10:30:00");
        assert_eq!(parsed.cpu_percent, 85.5);
        assert_eq!(parsed.memory_percent, 40.2);
        assert_eq!(parsed.latency_seconds, 0.125);
    }

    #[test]
    fn test_formatted_values_parse_back() {
        for (cpu, mem, lat) in [(0.0, 0.0, 0.0), (12.34, 99.99, 1.5), (100.0, 3.0, 0.001)] {
            let line = format!(
                "2024-01-09 10:30:00 | CPU: {:.2}% | Memory: {:.2}% | Latency: {:.3}s",
                cpu, mem, lat
            );
            let parsed = parse_metrics_line(&line).unwrap();
            assert!((parsed.cpu_percent - cpu).abs() < 1e-9);
            assert!((parsed.memory_percent - mem).abs() < 1e-9);
            assert!((parsed.latency_seconds - lat).abs() < 1e-9);
        }
    }

    #[test]
    fn test_parse_metrics_line_malformed() {
        assert_eq!(
            parse_metrics_line("2024-01-09 10:30:00 | CPU: 85.5%"),
            Err(ParseError::Malformed { format: "metrics" })
        );
        assert!(parse_metrics_line("").is_err());
        assert!(parse_metrics_line("2024 | CPU: high% | Memory: 1% | Latency: 1s").is_err());
    }

    #[test]
    fn test_parse_status_line() {
        let parsed = parse_status_line("2024-01-09 10:30:00 | Status: DOWN | HTTP: 503").unwrap();
        assert_eq!(parsed.container_status, ContainerStatus::Down);
        assert_eq!(parsed.http_code, "503");

        let parsed = parse_status_line("2024-01-09 10:30:00 | Status: PAUSED | HTTP: 000").unwrap();
        assert_eq!(parsed.container_status, ContainerStatus::Unknown);
    }

    #[test]
    fn test_parse_status_line_malformed() {
        assert_eq!(
            parse_status_line("2024-01-09 10:30:00 | Status: UP"),
            Err(ParseError::Malformed { format: "status" })
        );
    }

    #[test]
    fn test_metrics_tail_uses_last_line_only() {
        let tail = vec![
            "not a metrics line".to_string(),
            "2024-01-09 10:30:00 | CPU: 10.0% | Memory: 20.0% | Latency: 0.1s".to_string(),
        ];

        match parse_metrics_tail(tail.clone()) {
            MetricsReading::Sample(sample) => {
                assert_eq!(sample.cpu_percent, 10.0);
                assert_eq!(sample.raw_tail, tail);
            }
            other => panic!("expected sample, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_tails_are_no_data() {
        assert_eq!(parse_metrics_tail(Vec::new()), MetricsReading::NoData);
        assert_eq!(parse_status_tail(Vec::new()), StatusReading::NoData);
    }

    #[test]
    fn test_malformed_last_line_is_reported() {
        let tail = vec!["2024-01-09 10:30:00 | Status: UP | HT".to_string()];
        match parse_status_tail(tail) {
            StatusReading::Malformed { line, reason, .. } => {
                assert!(line.ends_with("HT"));
                assert_eq!(reason, ParseError::Malformed { format: "status" });
            }
            other => panic!("expected malformed, got {:?}", other),
        }
    }
}
