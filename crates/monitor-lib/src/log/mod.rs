//! Reading and parsing of the shared monitoring logs
//!
//! Both logs are append-only text files written by an external monitor.
//! Nothing here ever writes to them.

mod parser;
mod tail;

pub use parser::{
    parse_metrics_line, parse_metrics_tail, parse_status_line, parse_status_tail, ParsedMetrics,
    ParsedStatus,
};
pub use tail::{display_tail, read_tail, FILE_NOT_FOUND, NO_DATA_YET};

use std::path::{Path, PathBuf};
use tracing::warn;

use crate::models::{MetricsReading, StatusReading};

/// File name of the metrics log inside the log directory
pub const METRICS_LOG: &str = "metrics.log";

/// File name of the status log inside the log directory
pub const STATUS_LOG: &str = "status.log";

/// Default location of the shared log volume
pub const DEFAULT_LOG_DIR: &str = "/logs";

/// Paths of the two logs inside one directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    pub metrics: PathBuf,
    pub status: PathBuf,
}

impl LogPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            metrics: dir.join(METRICS_LOG),
            status: dir.join(STATUS_LOG),
        }
    }
}

/// Read the newest metrics sample from the last `n` lines of a log
pub async fn read_metrics(path: &Path, n: usize) -> MetricsReading {
    let tail = match read_tail(path, n).await {
        Ok(tail) => tail,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Metrics log unreadable");
            return MetricsReading::NoData;
        }
    };

    let reading = parse_metrics_tail(tail);
    if let MetricsReading::Malformed { line, reason, .. } = &reading {
        warn!(path = %path.display(), line = %line, reason = %reason, "Malformed metrics line");
    }
    reading
}

/// Read the newest status sample from the last `n` lines of a log
pub async fn read_status(path: &Path, n: usize) -> StatusReading {
    let tail = match read_tail(path, n).await {
        Ok(tail) => tail,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Status log unreadable");
            return StatusReading::NoData;
        }
    };

    let reading = parse_status_tail(tail);
    if let StatusReading::Malformed { line, reason, .. } = &reading {
        warn!(path = %path.display(), line = %line, reason = %reason, "Malformed status line");
    }
    reading
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContainerStatus;
    use tempfile::TempDir;
    use tokio::fs;

    #[tokio::test]
    async fn test_read_metrics_and_status_from_dir() {
        let dir = TempDir::new().unwrap();
        let paths = LogPaths::in_dir(dir.path());

        fs::write(
            &paths.metrics,
            "2024-01-09 10:29:30 | CPU: 20.0% | Memory: 30.0% | Latency: 0.1s\n\
             2024-01-09 10:30:00 | CPU: 85.5% | Memory: 40.2% | Latency: 0.125s\n",
        )
        .await
        .unwrap();
        fs::write(&paths.status, "2024-01-09 10:30:00 | Status: UP | HTTP: 200\n")
            .await
            .unwrap();

        let metrics = read_metrics(&paths.metrics, 10).await;
        let sample = metrics.sample().unwrap();
        assert_eq!(sample.cpu_percent, 85.5);
        assert_eq!(sample.raw_tail.len(), 2);

        let status = read_status(&paths.status, 5).await;
        assert_eq!(status.sample().unwrap().container_status, ContainerStatus::Up);
    }

    #[tokio::test]
    async fn test_missing_logs_are_no_data() {
        let dir = TempDir::new().unwrap();
        let paths = LogPaths::in_dir(dir.path());

        assert_eq!(read_metrics(&paths.metrics, 10).await, MetricsReading::NoData);
        assert_eq!(read_status(&paths.status, 5).await, StatusReading::NoData);
    }
}
