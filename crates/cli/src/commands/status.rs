//! Dashboard status command

use anyhow::Result;
use colored::Colorize;

use crate::client::DashboardClient;
use crate::output::{color_container_status, color_http_code, color_percent, OutputFormat};

/// Show the latest values from `/api/metrics`
pub async fn show_status(client: &DashboardClient, format: OutputFormat) -> Result<()> {
    let snapshot = client.metrics().await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&snapshot)?;
            println!("{}", json);
        }
        OutputFormat::Table => {
            println!("{}", "Container Status".bold());
            println!("{}", "=".repeat(40));
            println!(
                "Container:      {}",
                color_container_status(&snapshot.container_status)
            );
            println!("HTTP Response:  {}", color_http_code(&snapshot.http_code));
            println!("CPU Usage:      {}", color_percent(&snapshot.cpu));
            println!("Memory Usage:   {}", color_percent(&snapshot.memory));
            println!("Latency:        {}s", snapshot.latency);
            println!();
            println!("Fetched at {}", snapshot.timestamp.dimmed());
        }
    }

    Ok(())
}
