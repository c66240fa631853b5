//! Dashboard configuration

use anyhow::{Context, Result};
use monitor_lib::log::{LogPaths, DEFAULT_LOG_DIR};
use serde::Deserialize;

/// Port the dashboard listens on
pub const DASHBOARD_PORT: u16 = 8001;

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Directory holding metrics.log and status.log
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from the process environment (`LOG_DIR`)
    pub fn load() -> Result<Self> {
        config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("Failed to read dashboard environment")?
            .try_deserialize()
            .context("Invalid dashboard configuration")
    }

    pub fn log_paths(&self) -> LogPaths {
        LogPaths::in_dir(&self.log_dir)
    }
}
