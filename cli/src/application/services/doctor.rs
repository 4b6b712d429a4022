//! Application service: pre-flight diagnostics.
//!
//! Checks everything a probe run needs without calling the provider API:
//! the control-plane tool and the resolved configuration.

use serde::Serialize;

use crate::application::ports::{ComputeControlPlane, ProgressReporter};
use crate::application::services::probe::ensure_tooling;
use crate::domain::config::ProbeConfig;

/// Result of `doctor`.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorReport {
    /// `None` when the tool is missing.
    pub tool_version: Option<String>,
    pub profile: String,
    pub shape: String,
    pub availability_domain: String,
    /// `"id"` for a direct image id, `"name"` for a display-name lookup.
    pub image_source: &'static str,
    pub webhook_configured: bool,
}

impl DoctorReport {
    /// Every check passed.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.tool_version.is_some()
    }
}

/// Run the pre-flight checks.
pub async fn run_doctor(
    control_plane: &impl ComputeControlPlane,
    reporter: &impl ProgressReporter,
    config: &ProbeConfig,
) -> DoctorReport {
    reporter.step("checking control-plane tool...");
    let tool_version = match ensure_tooling(control_plane).await {
        Ok(version) => {
            reporter.success(&format!("found {version}"));
            Some(version)
        }
        Err(e) => {
            reporter.warn(&e.to_string());
            None
        }
    };

    if config.webhook_url.is_none() {
        reporter.warn("no webhook configured, notifications will be skipped");
    }

    DoctorReport {
        tool_version,
        profile: config.profile.clone(),
        shape: config.shape.clone(),
        availability_domain: config.availability_domain.clone(),
        image_source: if config.image_id.is_some() { "id" } else { "name" },
        webhook_configured: config.webhook_url.is_some(),
    }
}
