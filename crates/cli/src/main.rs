//! Container monitoring CLI
//!
//! Queries a running dashboard, or evaluates a local log directory with the
//! same rules the alert service uses.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, status, tail};
use monitor_lib::log::DEFAULT_LOG_DIR;
use std::path::PathBuf;

/// Exit status when at least one CRITICAL alert fires
const CRITICAL_EXIT_CODE: i32 = 2;

/// Container monitoring CLI
#[derive(Parser)]
#[command(name = "monitorctl")]
#[command(author, version, about = "CLI for the container monitoring services", long_about = None)]
pub struct Cli {
    /// Dashboard URL (can also be set via MONITOR_DASHBOARD_URL env var)
    #[arg(long, global = true, env = "MONITOR_DASHBOARD_URL", default_value = "http://localhost:8001")]
    pub dashboard_url: String,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the latest values reported by the dashboard
    Status,

    /// Evaluate the local logs and print any alerts
    Check {
        /// Directory holding metrics.log and status.log
        #[arg(long, env = "LOG_DIR", default_value = DEFAULT_LOG_DIR)]
        log_dir: PathBuf,

        /// CPU alert threshold in percent
        #[arg(long, default_value_t = 80.0)]
        cpu_threshold: f64,

        /// Memory alert threshold in percent
        #[arg(long, default_value_t = 80.0)]
        memory_threshold: f64,
    },

    /// Print the last lines of a log
    Tail {
        /// Which log to print
        #[arg(value_enum)]
        log: tail::LogKind,

        /// Directory holding metrics.log and status.log
        #[arg(long, env = "LOG_DIR", default_value = DEFAULT_LOG_DIR)]
        log_dir: PathBuf,

        /// Number of lines
        #[arg(short = 'n', long, default_value_t = 10)]
        lines: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => {
            let client = client::DashboardClient::new(&cli.dashboard_url)?;
            status::show_status(&client, cli.format).await?;
        }
        Commands::Check {
            log_dir,
            cpu_threshold,
            memory_threshold,
        } => {
            let outcome = check::run_check(&log_dir, cpu_threshold, memory_threshold).await;
            check::print_outcome(&outcome, cli.format)?;
            if outcome.has_critical() {
                std::process::exit(CRITICAL_EXIT_CODE);
            }
        }
        Commands::Tail {
            log,
            log_dir,
            lines,
        } => {
            tail::show_tail(&log_dir, log, lines).await?;
        }
    }

    Ok(())
}
