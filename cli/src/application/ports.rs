//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::NotificationMessage;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Launch parameters for a probe instance.
pub struct LaunchSpec<'a> {
    /// Compute shape, e.g. `"VM.Standard.A1.Flex"`.
    pub shape: &'a str,
    pub ocpus: u32,
    pub memory_gb: u32,
    pub availability_domain: &'a str,
    pub compartment_id: &'a str,
    pub subnet_id: &'a str,
    pub image_id: &'a str,
    /// Unique per run, e.g. `"capacity-probe-1717171717"`.
    pub display_name: &'a str,
    /// How long to wait for the instance to reach `RUNNING`.
    pub timeout: Duration,
}

// ── Control Plane Port ────────────────────────────────────────────────────────

/// Provider compute control plane. Implementations return the raw process
/// output; interpretation lives in the domain and application layers.
#[allow(async_fn_in_trait)]
pub trait ComputeControlPlane {
    /// Report the control-plane tool version. A spawn failure means the tool
    /// is not installed.
    async fn version(&self) -> Result<Output>;
    /// List images in `compartment_id` whose display name is `display_name`.
    async fn list_images(&self, compartment_id: &str, display_name: &str) -> Result<Output>;
    /// Launch an instance and wait for it to run.
    async fn launch_instance(&self, spec: &LaunchSpec<'_>) -> Result<Output>;
    /// Force-terminate an instance and wait for `TERMINATED`.
    async fn terminate_instance(
        &self,
        instance_id: &str,
        preserve_boot_volume: bool,
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Notification Port ─────────────────────────────────────────────────────────

/// Delivers a message to an external channel.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Post `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails. Callers treat this as best-effort.
    async fn post_message(&self, message: &NotificationMessage) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait: no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
