//! Error types shared by the monitoring crates

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading monitoring logs
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("log file not found: {}", .0.display())]
    FileMissing(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reasons a single log line could not be turned into a sample
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line does not match the {format} format")]
    Malformed { format: &'static str },

    #[error("field {field} has a non-numeric value {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}
