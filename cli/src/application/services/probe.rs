//! Application service: the capacity probe use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits. Order of operations:
//! tool check, image resolution, launch, cleanup, notification.

use std::process::Output;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{ComputeControlPlane, LaunchSpec, Notifier, ProgressReporter};
use crate::domain::{NotificationMessage, ProbeError};
use crate::domain::config::ProbeConfig;
use crate::domain::message::compose;
use crate::domain::outcome::{
    ProbeOutcome, classify_failure, parse_image_list, parse_launch_response, select_image,
};

/// Name of the control-plane tool that must be installed.
pub const CONTROL_PLANE_TOOL: &str = "oci";

// ── Public types ──────────────────────────────────────────────────────────────

/// What happened to the probe instance after a successful launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CleanupStatus {
    /// Nothing was launched.
    NotRequired,
    Terminated,
    /// Termination failed; the instance may still exist.
    Failed(String),
}

/// How the webhook delivery went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyStatus {
    Skipped,
    Sent,
    Failed,
}

/// Everything a completed probe run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    pub image_id: String,
    pub display_name: String,
    pub cleanup: CleanupStatus,
    pub notification: NotifyStatus,
}

impl ProbeReport {
    /// Exit status of the run. Cleanup and notification never affect it.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        self.outcome.exit_code()
    }
}

// ── Use-case ──────────────────────────────────────────────────────────────────

/// Run one probe attempt end to end.
///
/// `notifier` is `None` when no webhook is configured.
///
/// # Errors
///
/// Returns a [`ProbeError`] for a missing tool, an unresolvable image, a
/// failed image lookup, or a launch success without an instance id. Launch
/// failures are outcomes, not errors.
pub async fn run_probe(
    control_plane: &impl ComputeControlPlane,
    notifier: Option<&impl Notifier>,
    reporter: &impl ProgressReporter,
    config: &ProbeConfig,
    display_name: &str,
) -> Result<ProbeReport> {
    ensure_tooling(control_plane).await?;

    let image_id = resolve_image_id(control_plane, config, reporter).await?;

    reporter.step(&format!(
        "Launching {} ({} OCPU / {} GB) in {}...",
        config.shape, config.ocpus, config.memory_gb, config.availability_domain
    ));
    let outcome = attempt_launch(control_plane, config, &image_id, display_name).await?;
    match &outcome {
        ProbeOutcome::CapacityAvailable { instance_id } => {
            reporter.success(&format!("Capacity available, launched {instance_id}"));
        }
        ProbeOutcome::CapacityUnavailable => reporter.warn("Out of capacity"),
        ProbeOutcome::LaunchFailed { .. } => reporter.warn("Launch failed"),
    }

    let cleanup = cleanup(control_plane, config, &outcome, reporter).await;

    let warning = match &cleanup {
        CleanupStatus::Failed(detail) => Some(detail.as_str()),
        _ => None,
    };
    let message = compose(config, &outcome, warning);
    let notification = match notifier {
        Some(notifier) => notify(notifier, &message, reporter).await,
        None => NotifyStatus::Skipped,
    };

    Ok(ProbeReport {
        outcome,
        image_id,
        display_name: display_name.to_string(),
        cleanup,
        notification,
    })
}

/// Confirm the control-plane tool can be executed.
///
/// # Errors
///
/// Returns [`ProbeError::MissingDependency`] if the tool cannot be spawned or
/// exits non-zero when asked for its version.
pub async fn ensure_tooling(control_plane: &impl ComputeControlPlane) -> Result<String> {
    let missing = || ProbeError::MissingDependency {
        tool: CONTROL_PLANE_TOOL.to_string(),
    };
    let output = control_plane.version().await.map_err(|_| missing())?;
    if !output.status.success() {
        return Err(missing().into());
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Return the configured image id, or resolve the image name to one.
///
/// # Errors
///
/// Returns [`ProbeError::ImageNotFound`] when no image matches exactly, or
/// [`ProbeError::ControlPlane`] when the listing fails.
pub async fn resolve_image_id(
    control_plane: &impl ComputeControlPlane,
    config: &ProbeConfig,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    if let Some(id) = &config.image_id {
        return Ok(id.clone());
    }

    reporter.step(&format!("Resolving image '{}'...", config.image_name));
    let output = control_plane
        .list_images(&config.compartment_id, &config.image_name)
        .await
        .map_err(|e| ProbeError::ControlPlane {
            operation: "image lookup",
            detail: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(ProbeError::ControlPlane {
            operation: "image lookup",
            detail: diagnostic(&output),
        }
        .into());
    }

    let images = parse_image_list(&String::from_utf8_lossy(&output.stdout)).map_err(|e| {
        ProbeError::ControlPlane {
            operation: "image lookup",
            detail: format!("unreadable image listing: {e}"),
        }
    })?;
    let image = select_image(&images, &config.image_name).ok_or_else(|| ProbeError::ImageNotFound {
        filter: config.image_name.clone(),
    })?;

    reporter.success(&format!("Image resolved: {}", image.id));
    Ok(image.id.clone())
}

/// Issue one launch request and classify the result.
///
/// # Errors
///
/// Returns [`ProbeError::ResponseParse`] when the launch succeeded but the
/// response carries no instance id.
pub async fn attempt_launch(
    control_plane: &impl ComputeControlPlane,
    config: &ProbeConfig,
    image_id: &str,
    display_name: &str,
) -> Result<ProbeOutcome> {
    let spec = LaunchSpec {
        shape: &config.shape,
        ocpus: config.ocpus,
        memory_gb: config.memory_gb,
        availability_domain: &config.availability_domain,
        compartment_id: &config.compartment_id,
        subnet_id: &config.subnet_id,
        image_id,
        display_name,
        timeout: config.launch_timeout,
    };

    let output = match control_plane.launch_instance(&spec).await {
        Ok(output) => output,
        Err(e) => return Ok(classify_failure(&format!("{e:#}"))),
    };

    if output.status.success() {
        let instance_id = parse_launch_response(&String::from_utf8_lossy(&output.stdout))?;
        return Ok(ProbeOutcome::CapacityAvailable { instance_id });
    }
    Ok(classify_failure(&diagnostic(&output)))
}

/// Terminate the probe instance, if one was launched. Never fails the run.
pub async fn cleanup(
    control_plane: &impl ComputeControlPlane,
    config: &ProbeConfig,
    outcome: &ProbeOutcome,
    reporter: &impl ProgressReporter,
) -> CleanupStatus {
    let Some(instance_id) = outcome.instance_id() else {
        return CleanupStatus::NotRequired;
    };

    reporter.step(&format!("Terminating {instance_id}..."));
    let result = control_plane
        .terminate_instance(instance_id, false, config.terminate_timeout)
        .await;
    let failure = match result {
        Ok(output) if output.status.success() => None,
        Ok(output) => Some(diagnostic(&output)),
        Err(e) => Some(format!("{e:#}")),
    };

    match failure {
        None => {
            reporter.success("Probe instance terminated");
            CleanupStatus::Terminated
        }
        Some(detail) => {
            reporter.warn(&format!(
                "Could not terminate {instance_id}, remove it manually: {detail}"
            ));
            CleanupStatus::Failed(detail)
        }
    }
}

/// Deliver `message`, swallowing any error after reporting it.
pub async fn notify(
    notifier: &impl Notifier,
    message: &NotificationMessage,
    reporter: &impl ProgressReporter,
) -> NotifyStatus {
    match notifier.post_message(message).await {
        Ok(()) => {
            reporter.success("Notification sent");
            NotifyStatus::Sent
        }
        Err(e) => {
            reporter.warn(&format!("Notification not delivered: {e:#}"));
            NotifyStatus::Failed
        }
    }
}

/// Full diagnostic text from a failed command: stderr, then stdout.
///
/// `oci` waiters print the last known resource state on stdout when they give
/// up, so stdout can hold the only trace of an instance id.
fn diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    match (stderr.trim(), stdout.trim()) {
        (err, "") => err.to_string(),
        ("", out) => out.to_string(),
        (err, out) => format!("{err}\n{out}"),
    }
}
