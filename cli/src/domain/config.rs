//! Domain types and validators for probe configuration.
//!
//! Pure functions only: no I/O, no async, no environment access. The CLI
//! layer resolves flags and environment variables into [`ConfigInputs`] once;
//! [`ProbeConfig::resolve`] validates them into the immutable run config.

use std::time::Duration;

use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

pub const DEFAULT_PROFILE: &str = "DEFAULT";
pub const DEFAULT_SHAPE: &str = "VM.Standard.A1.Flex";
pub const DEFAULT_OCPUS: u32 = 4;
pub const DEFAULT_MEMORY_GB: u32 = 24;
pub const DEFAULT_IMAGE_NAME: &str = "Canonical-Ubuntu-22.04-aarch64-2024.05.31-0";
pub const DEFAULT_WEBHOOK_USERNAME: &str = "OCI Capacity Probe";
pub const DEFAULT_LAUNCH_TIMEOUT_SECS: u64 = 900;
pub const DEFAULT_TERMINATE_TIMEOUT_SECS: u64 = 600;

// ── Inputs ───────────────────────────────────────────────────────────────────

/// Raw, unvalidated settings as gathered from flags and environment.
///
/// Optional string fields treat blank values the same as absent ones.
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    pub profile: Option<String>,
    pub shape: Option<String>,
    pub ocpus: Option<u32>,
    pub memory_gb: Option<u32>,
    pub image_id: Option<String>,
    pub image_name: Option<String>,
    pub availability_domain: Option<String>,
    pub compartment_id: Option<String>,
    pub subnet_id: Option<String>,
    pub webhook_url: Option<String>,
    pub webhook_username: Option<String>,
    pub launch_timeout_secs: Option<u64>,
    pub terminate_timeout_secs: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────────────

/// Immutable configuration for a single probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub profile: String,
    pub shape: String,
    pub ocpus: u32,
    pub memory_gb: u32,
    pub availability_domain: String,
    pub compartment_id: String,
    pub subnet_id: String,
    /// Direct image OCID. When set, no catalog lookup happens.
    pub image_id: Option<String>,
    /// Exact display name resolved when `image_id` is absent.
    pub image_name: String,
    pub webhook_url: Option<String>,
    pub webhook_username: String,
    pub launch_timeout: Duration,
    pub terminate_timeout: Duration,
}

impl ProbeConfig {
    /// Validate raw inputs into a run configuration.
    ///
    /// Required ids are checked in the order compartment, subnet,
    /// availability domain; the first missing one is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required id is missing or blank, when
    /// sizing is zero, or when neither an image id nor an image name is set.
    pub fn resolve(inputs: ConfigInputs) -> Result<Self, ConfigError> {
        let compartment_id = required(inputs.compartment_id, "compartment id", "OCI_COMPARTMENT_ID")?;
        let subnet_id = required(inputs.subnet_id, "subnet id", "OCI_SUBNET_ID")?;
        let availability_domain = required(
            inputs.availability_domain,
            "availability domain",
            "OCI_AVAILABILITY_DOMAIN",
        )?;

        let ocpus = positive(inputs.ocpus.unwrap_or(DEFAULT_OCPUS), "ocpus")?;
        let memory_gb = positive(inputs.memory_gb.unwrap_or(DEFAULT_MEMORY_GB), "memory GB")?;

        let image_id = non_blank(inputs.image_id);
        let image_name = match inputs.image_name {
            Some(name) => name.trim().to_string(),
            None => DEFAULT_IMAGE_NAME.to_string(),
        };
        if image_id.is_none() && image_name.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "image name",
                value: String::new(),
                reason: "set OCI_IMAGE_ID or a non-empty OCI_IMAGE_NAME",
            });
        }

        let launch_timeout = timeout(
            inputs.launch_timeout_secs,
            DEFAULT_LAUNCH_TIMEOUT_SECS,
            "launch timeout",
        )?;
        let terminate_timeout = timeout(
            inputs.terminate_timeout_secs,
            DEFAULT_TERMINATE_TIMEOUT_SECS,
            "terminate timeout",
        )?;

        Ok(Self {
            profile: non_blank(inputs.profile).unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            shape: non_blank(inputs.shape).unwrap_or_else(|| DEFAULT_SHAPE.to_string()),
            ocpus,
            memory_gb,
            availability_domain,
            compartment_id,
            subnet_id,
            image_id,
            image_name,
            webhook_url: non_blank(inputs.webhook_url),
            webhook_username: non_blank(inputs.webhook_username)
                .unwrap_or_else(|| DEFAULT_WEBHOOK_USERNAME.to_string()),
            launch_timeout,
            terminate_timeout,
        })
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(
    value: Option<String>,
    name: &'static str,
    env: &'static str,
) -> Result<String, ConfigError> {
    non_blank(value).ok_or(ConfigError::MissingRequired { name, env })
}

fn positive(value: u32, name: &'static str) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "must be greater than zero",
        });
    }
    Ok(value)
}

fn timeout(value: Option<u64>, default: u64, name: &'static str) -> Result<Duration, ConfigError> {
    let secs = value.unwrap_or(default);
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            name,
            value: secs.to_string(),
            reason: "must be at least one second",
        });
    }
    Ok(Duration::from_secs(secs))
}

// ── Unit tests ───────────────────────────────────────────────────────────────
