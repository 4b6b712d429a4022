//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Exit codes ────────────────────────────────────────────────────────────────

/// Capacity was available (and the probe instance was handled).
pub const EXIT_AVAILABLE: i32 = 0;
/// Any fatal error: configuration, image resolution, parse or launch failure.
pub const EXIT_FATAL: i32 = 1;
/// The provider reported capacity exhaustion. Expected, not a defect.
pub const EXIT_UNAVAILABLE: i32 = 2;
/// A required external tool is not installed.
pub const EXIT_MISSING_DEPENDENCY: i32 = 3;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while building a `ProbeConfig`. Always fatal, never retried.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required setting: {name} (set {env})")]
    MissingRequired {
        name: &'static str,
        env: &'static str,
    },

    #[error("Invalid value for {name}: {value} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

// ── Probe errors ──────────────────────────────────────────────────────────────

/// Fatal errors raised by the probe pipeline after configuration succeeded.
///
/// `CapacityUnavailable` and `LaunchFailed` are outcomes, not errors; see
/// [`crate::domain::outcome::ProbeOutcome`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Required tool '{tool}' not found on PATH. Install it and retry.")]
    MissingDependency { tool: String },

    #[error("No image with display name '{filter}' in the compartment.")]
    ImageNotFound { filter: String },

    #[error("Launch reported success but the response has no instance id: {detail}")]
    ResponseParse { detail: String },

    #[error("{operation} failed: {detail}")]
    ControlPlane {
        operation: &'static str,
        detail: String,
    },
}

impl ProbeError {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingDependency { .. } => EXIT_MISSING_DEPENDENCY,
            Self::ImageNotFound { .. } | Self::ResponseParse { .. } | Self::ControlPlane { .. } => {
                EXIT_FATAL
            }
        }
    }
}

/// Map any error surfaced to `main` onto a process exit status.
///
/// Typed probe errors keep their own status; everything else is fatal.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ProbeError>()
        .map_or(EXIT_FATAL, ProbeError::exit_code)
}
