//! Alert service configuration

use anyhow::{Context, Result};
use monitor_lib::check_loop::CheckConfig;
use monitor_lib::log::DEFAULT_LOG_DIR;
use monitor_lib::notifier::parse_recipients;
use monitor_lib::Thresholds;
use serde::Deserialize;
use std::time::Duration;

/// Alert service configuration, read from unprefixed environment variables
#[derive(Debug, Clone, Deserialize)]
pub struct AlertConfig {
    /// AWS region of the SES endpoint
    #[serde(default = "default_aws_region")]
    pub aws_region: String,

    /// Verified SES sender; missing is tolerated until the first send
    #[serde(default)]
    pub sender_email: Option<String>,

    /// Comma-separated recipient list
    #[serde(default)]
    pub recipient_emails: String,

    /// Seconds between two alerts of the same kind
    #[serde(default = "default_alert_cooldown")]
    pub alert_cooldown: u64,

    /// Seconds between check cycles
    #[serde(default = "default_check_interval")]
    pub check_interval: u64,

    #[serde(default = "default_threshold")]
    pub cpu_threshold: f64,

    #[serde(default = "default_threshold")]
    pub memory_threshold: f64,

    /// Directory holding metrics.log and status.log
    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    /// Seconds to wait for the log producer before the first check
    #[serde(default = "default_startup_delay")]
    pub startup_delay: u64,

    /// Port for health and Prometheus endpoints
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_aws_region() -> String {
    "us-east-1".to_string()
}

fn default_alert_cooldown() -> u64 {
    300
}

fn default_check_interval() -> u64 {
    30
}

fn default_threshold() -> f64 {
    80.0
}

fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}

fn default_startup_delay() -> u64 {
    30
}

fn default_api_port() -> u16 {
    9100
}

impl AlertConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::build(config::Environment::default().try_parsing(true))
    }

    /// Load configuration from an explicit variable map
    #[cfg(test)]
    pub fn from_vars(vars: std::collections::HashMap<String, String>) -> Result<Self> {
        Self::build(config::Environment::default().source(Some(vars)).try_parsing(true))
    }

    fn build(source: config::Environment) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(source)
            .build()
            .context("Failed to read alert service environment")?
            .try_deserialize()
            .context("Invalid alert service configuration")?;

        if config.check_interval == 0 {
            anyhow::bail!("CHECK_INTERVAL must be at least 1 second");
        }

        Ok(config)
    }

    /// Sender address, treating an empty value as unset
    pub fn sender(&self) -> Option<String> {
        self.sender_email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn recipients(&self) -> Vec<String> {
        parse_recipients(&self.recipient_emails)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.cpu_threshold, self.memory_threshold)
    }

    pub fn check_config(&self) -> CheckConfig {
        CheckConfig {
            interval: Duration::from_secs(self.check_interval),
            startup_delay: Duration::from_secs(self.startup_delay),
            cooldown: Duration::from_secs(self.alert_cooldown),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AlertConfig::from_vars(HashMap::new()).unwrap();

        assert_eq!(config.aws_region, "us-east-1");
        assert_eq!(config.sender(), None);
        assert!(config.recipients().is_empty());
        assert_eq!(config.alert_cooldown, 300);
        assert_eq!(config.check_interval, 30);
        assert_eq!(config.thresholds(), Thresholds::new(80.0, 80.0));
        assert_eq!(config.log_dir, "/logs");
    }

    #[test]
    fn test_environment_overrides() {
        let config = AlertConfig::from_vars(vars(&[
            ("AWS_REGION", "eu-west-1"),
            ("SENDER_EMAIL", "alerts@example.com"),
            ("RECIPIENT_EMAILS", "a@example.com, b@example.com"),
            ("ALERT_COOLDOWN", "60"),
            ("CHECK_INTERVAL", "5"),
            ("CPU_THRESHOLD", "90.5"),
            ("MEMORY_THRESHOLD", "70"),
        ]))
        .unwrap();

        assert_eq!(config.aws_region, "eu-west-1");
        assert_eq!(config.sender().as_deref(), Some("alerts@example.com"));
        assert_eq!(config.recipients(), vec!["a@example.com", "b@example.com"]);

        let check = config.check_config();
        assert_eq!(check.cooldown, Duration::from_secs(60));
        assert_eq!(check.interval, Duration::from_secs(5));
        assert_eq!(config.thresholds().cpu_percent, 90.5);
        assert_eq!(config.thresholds().memory_percent, 70.0);
    }

    #[test]
    fn test_blank_sender_is_unset() {
        let config = AlertConfig::from_vars(vars(&[("SENDER_EMAIL", "  ")])).unwrap();
        assert_eq!(config.sender(), None);
    }

    #[test]
    fn test_invalid_interval_is_rejected() {
        assert!(AlertConfig::from_vars(vars(&[("CHECK_INTERVAL", "soon")])).is_err());
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let err = AlertConfig::from_vars(vars(&[("CHECK_INTERVAL", "0")])).unwrap_err();
        assert!(err.to_string().contains("CHECK_INTERVAL"));
    }
}
