//! Log tail command

use anyhow::Result;
use clap::ValueEnum;
use monitor_lib::log::{read_tail, LogPaths, NO_DATA_YET};
use monitor_lib::MonitorError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogKind {
    Metrics,
    Status,
}

impl LogKind {
    pub fn path_in(&self, log_dir: &Path) -> PathBuf {
        let paths = LogPaths::in_dir(log_dir);
        match self {
            LogKind::Metrics => paths.metrics,
            LogKind::Status => paths.status,
        }
    }
}

/// Last `n` lines of one log, failing if the file does not exist
pub async fn load_tail(log_dir: &Path, log: LogKind, n: usize) -> Result<Vec<String>, MonitorError> {
    let path = log.path_in(log_dir);
    let exists = tokio::fs::try_exists(&path)
        .await
        .map_err(|source| MonitorError::Io {
            path: path.clone(),
            source,
        })?;
    if !exists {
        return Err(MonitorError::FileMissing(path));
    }
    read_tail(&path, n).await
}

pub async fn show_tail(log_dir: &Path, log: LogKind, n: usize) -> Result<()> {
    let lines = load_tail(log_dir, log, n).await?;

    if lines.is_empty() {
        println!("{}", NO_DATA_YET);
    } else {
        for line in lines {
            println!("{}", line);
        }
    }

    Ok(())
}
