//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod message;
pub mod outcome;

pub use config::{ConfigInputs, ProbeConfig};
pub use error::{ConfigError, ProbeError, exit_code_for};
pub use message::{NotificationMessage, compose};
pub use outcome::{ImageSummary, ProbeOutcome, classify_failure};
