//! `oci` CLI adapter: implements the `ComputeControlPlane` port.
//!
//! Every call runs `oci` with the configured `--profile`; credentials and
//! region come from the CLI's own config file.

use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ComputeControlPlane, LaunchSpec};

/// Binary name of the provider CLI.
pub const OCI_BIN: &str = "oci";

/// Extra time given to the runner on top of `--max-wait-seconds`, so the CLI
/// reports its own wait timeout before we kill it.
const WAIT_GRACE: Duration = Duration::from_secs(30);

/// Production control plane backed by the `oci` binary.
pub struct OciCli<R: CommandRunner> {
    runner: R,
    profile: String,
}

impl<R: CommandRunner> OciCli<R> {
    pub fn new(runner: R, profile: impl Into<String>) -> Self {
        Self {
            runner,
            profile: profile.into(),
        }
    }

    async fn oci(&self, args: &[&str], timeout: Option<Duration>) -> Result<Output> {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 2);
        full.extend_from_slice(args);
        full.extend_from_slice(&["--profile", self.profile.as_str()]);
        match timeout {
            Some(t) => self.runner.run_with_timeout(OCI_BIN, &full, t + WAIT_GRACE).await,
            None => self.runner.run(OCI_BIN, &full).await,
        }
    }
}

/// `--shape-config` JSON for a flexible shape.
#[must_use]
pub fn shape_config(ocpus: u32, memory_gb: u32) -> String {
    serde_json::json!({ "ocpus": ocpus, "memoryInGBs": memory_gb }).to_string()
}

impl<R: CommandRunner> ComputeControlPlane for OciCli<R> {
    async fn version(&self) -> Result<Output> {
        self.runner.run(OCI_BIN, &["--version"]).await
    }

    async fn list_images(&self, compartment_id: &str, display_name: &str) -> Result<Output> {
        self.oci(
            &[
                "compute",
                "image",
                "list",
                "--compartment-id",
                compartment_id,
                "--display-name",
                display_name,
                "--all",
            ],
            None,
        )
        .await
    }

    async fn launch_instance(&self, spec: &LaunchSpec<'_>) -> Result<Output> {
        let shape_config = shape_config(spec.ocpus, spec.memory_gb);
        let max_wait = spec.timeout.as_secs().to_string();
        self.oci(
            &[
                "compute",
                "instance",
                "launch",
                "--availability-domain",
                spec.availability_domain,
                "--compartment-id",
                spec.compartment_id,
                "--subnet-id",
                spec.subnet_id,
                "--shape",
                spec.shape,
                "--shape-config",
                &shape_config,
                "--image-id",
                spec.image_id,
                "--display-name",
                spec.display_name,
                "--assign-public-ip",
                "false",
                "--wait-for-state",
                "RUNNING",
                "--max-wait-seconds",
                &max_wait,
            ],
            Some(spec.timeout),
        )
        .await
    }

    async fn terminate_instance(
        &self,
        instance_id: &str,
        preserve_boot_volume: bool,
        timeout: Duration,
    ) -> Result<Output> {
        let max_wait = timeout.as_secs().to_string();
        self.oci(
            &[
                "compute",
                "instance",
                "terminate",
                "--instance-id",
                instance_id,
                "--force",
                "--preserve-boot-volume",
                if preserve_boot_volume { "true" } else { "false" },
                "--wait-for-state",
                "TERMINATED",
                "--max-wait-seconds",
                &max_wait,
            ],
            Some(timeout),
        )
        .await
    }
}
