//! Core data models for the monitoring services

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;

/// Container state as reported in the status log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContainerStatus {
    Up,
    Down,
    Unknown,
}

impl ContainerStatus {
    /// Map a status word to a variant; anything other than UP or DOWN is unknown
    pub fn from_word(word: &str) -> Self {
        match word.trim() {
            "UP" => ContainerStatus::Up,
            "DOWN" => ContainerStatus::Down,
            _ => ContainerStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Up => "UP",
            ContainerStatus::Down => "DOWN",
            ContainerStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot parsed from the newest line of the metrics log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub latency_seconds: f64,
    /// Last N raw lines, oldest first, kept for display only
    pub raw_tail: Vec<String>,
}

impl MetricSample {
    /// Best-effort sample used when the newest line cannot be parsed
    pub fn fallback(raw_tail: Vec<String>) -> Self {
        Self {
            timestamp: String::new(),
            cpu_percent: 0.0,
            memory_percent: 0.0,
            latency_seconds: 0.0,
            raw_tail,
        }
    }

    /// Recent lines joined for inclusion in emails and pages
    pub fn recent_lines(&self) -> String {
        self.raw_tail.join("\n")
    }
}

/// Snapshot parsed from the newest line of the status log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSample {
    pub timestamp: String,
    pub container_status: ContainerStatus,
    pub http_code: String,
    pub raw_tail: Vec<String>,
}

impl StatusSample {
    pub fn fallback(raw_tail: Vec<String>) -> Self {
        Self {
            timestamp: String::new(),
            container_status: ContainerStatus::Unknown,
            http_code: "000".to_string(),
            raw_tail,
        }
    }

    pub fn recent_lines(&self) -> String {
        self.raw_tail.join("\n")
    }
}

/// Outcome of reading the metrics log
#[derive(Debug, Clone, PartialEq)]
pub enum MetricsReading {
    /// File missing, empty or unreadable
    NoData,
    Sample(MetricSample),
    /// The newest line did not parse
    Malformed {
        line: String,
        reason: ParseError,
        raw_tail: Vec<String>,
    },
}

impl MetricsReading {
    /// Structured sample, if the newest line parsed
    pub fn sample(&self) -> Option<&MetricSample> {
        match self {
            MetricsReading::Sample(sample) => Some(sample),
            _ => None,
        }
    }

    /// Sample with malformed or missing data replaced by zeros
    pub fn or_default(self) -> MetricSample {
        match self {
            MetricsReading::Sample(sample) => sample,
            MetricsReading::Malformed { raw_tail, .. } => MetricSample::fallback(raw_tail),
            MetricsReading::NoData => MetricSample::fallback(Vec::new()),
        }
    }
}

/// Outcome of reading the status log
#[derive(Debug, Clone, PartialEq)]
pub enum StatusReading {
    NoData,
    Sample(StatusSample),
    Malformed {
        line: String,
        reason: ParseError,
        raw_tail: Vec<String>,
    },
}

impl StatusReading {
    pub fn sample(&self) -> Option<&StatusSample> {
        match self {
            StatusReading::Sample(sample) => Some(sample),
            _ => None,
        }
    }

    /// Sample with malformed or missing data replaced by UNKNOWN / "000"
    pub fn or_default(self) -> StatusSample {
        match self {
            StatusReading::Sample(sample) => sample,
            StatusReading::Malformed { raw_tail, .. } => StatusSample::fallback(raw_tail),
            StatusReading::NoData => StatusSample::fallback(Vec::new()),
        }
    }
}

/// Render a float the way the log producer writes it: integral values keep one decimal
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
