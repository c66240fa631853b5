//! CLI command implementations

pub mod check;
pub mod status;
pub mod tail;
