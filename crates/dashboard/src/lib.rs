//! Container monitoring dashboard
//!
//! Serves the current metrics and status as an auto-refreshing HTML page
//! and as JSON. Every request re-reads the shared logs; nothing is cached.

pub mod api;
pub mod config;
pub mod render;
pub mod snapshot;

pub use api::{create_router, AppState};
pub use snapshot::{DashboardSnapshot, MetricsResponse};
