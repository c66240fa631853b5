//! HTTP routes for the dashboard

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use chrono::Local;
use monitor_lib::{
    health::{ComponentStatus, HealthRegistry},
    log::LogPaths,
    MonitorMetrics,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tracing::{error, info};

use crate::render::render_page;
use crate::snapshot::DashboardSnapshot;

/// Shared application state; holds no per-request data
#[derive(Clone)]
pub struct AppState {
    pub paths: LogPaths,
    pub health_registry: HealthRegistry,
    pub metrics: MonitorMetrics,
}

impl AppState {
    pub fn new(paths: LogPaths, health_registry: HealthRegistry) -> Self {
        Self {
            paths,
            health_registry,
            metrics: MonitorMetrics::new(),
        }
    }

    async fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::load(&self.paths, &self.health_registry, &self.metrics).await
    }
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    state.metrics.inc_dashboard_request("/");
    let snapshot = state.snapshot().await;
    Html(render_page(&snapshot, Local::now()))
}

async fn api_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics.inc_dashboard_request("/api/metrics");
    let snapshot = state.snapshot().await;
    Json(snapshot.to_response())
}

async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };

    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

async fn metrics() -> impl IntoResponse {
    let mut buffer = Vec::new();

    if let Err(e) = TextEncoder::new().encode(&prometheus::gather(), &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return (StatusCode::INTERNAL_SERVER_ERROR, Vec::new()).into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/metrics", get(api_metrics))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
