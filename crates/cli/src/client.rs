//! HTTP client for the dashboard API

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// Client for a running dashboard
pub struct DashboardClient {
    client: Client,
    base_url: Url,
}

impl DashboardClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid dashboard URL")?;

        Ok(Self { client, base_url })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to reach dashboard")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Dashboard error ({}): {}", status, body);
        }

        response.json().await.context("Failed to parse response")
    }

    /// Fetch `GET /api/metrics`
    pub async fn metrics(&self) -> Result<MetricsSnapshot> {
        self.get("api/metrics").await
    }
}

/// Body of the dashboard's `/api/metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub container_status: String,
    pub http_code: String,
    pub cpu: String,
    pub memory: String,
    pub latency: String,
}
