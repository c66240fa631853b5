//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use monitor_lib::{DisplayLevel, Severity};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Color a container status word
pub fn color_container_status(status: &str) -> String {
    match status {
        "UP" => status.green().to_string(),
        "DOWN" => status.red().to_string(),
        _ => status.yellow().to_string(),
    }
}

pub fn color_http_code(code: &str) -> String {
    if code == "200" {
        code.green().to_string()
    } else {
        code.red().to_string()
    }
}

/// Color a percentage string like "85.5%" on the dashboard's 60/80 scale
pub fn color_percent(value: &str) -> String {
    let level = value
        .trim_end_matches('%')
        .parse::<f64>()
        .map(DisplayLevel::classify)
        .unwrap_or(DisplayLevel::Normal);

    match level {
        DisplayLevel::Critical => value.red().to_string(),
        DisplayLevel::Warning => value.yellow().to_string(),
        DisplayLevel::Normal => value.green().to_string(),
    }
}

pub fn color_severity(severity: Severity) -> String {
    match severity {
        Severity::Critical => severity.as_str().red().bold().to_string(),
        Severity::Warning => severity.as_str().yellow().to_string(),
    }
}
