//! Core library for the container monitoring services
//!
//! This crate provides the shared functionality for:
//! - Reading the tail of the append-only metrics and status logs
//! - Parsing log lines into typed samples
//! - Threshold evaluation for the alert service and the dashboard
//! - Cooldown-gated email notification
//! - Health checks and observability

pub mod check_loop;
pub mod error;
pub mod evaluator;
pub mod health;
pub mod log;
pub mod models;
pub mod notifier;
pub mod observability;

pub use error::{MonitorError, ParseError};
pub use evaluator::{Alert, AlertKind, DashboardAlert, DisplayLevel, Severity, Thresholds};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{MonitorMetrics, StructuredLogger};
