//! Alert notification for the alert service
//!
//! This module provides:
//! - Per-kind cooldown tracking so repeated conditions are not re-sent
//! - Email composition for each alert kind
//! - Delivery through a pluggable mailer (AWS SES in production)

mod cooldown;
mod dispatcher;
mod mailer;
mod message;

pub use cooldown::{CooldownState, DEFAULT_COOLDOWN_SECS};
pub use dispatcher::{CycleReport, Notifier, NotifierConfig, DEFAULT_METRICS_TAIL, DEFAULT_STATUS_TAIL};
pub use mailer::{parse_recipients, Mailer, MailerError, SesMailer};
pub use message::{compose, escape_html, AlertEmail};

#[cfg(test)]
pub(crate) use dispatcher::test_support;
