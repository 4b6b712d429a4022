//! Command implementations

pub mod doctor;
pub mod run;
pub mod version;

use clap::Args;

use crate::domain::ConfigInputs;

/// Probe settings. Every flag falls back to an environment variable so a
/// scheduler can drive the probe with no arguments beyond the subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ProbeArgs {
    /// OCI CLI config profile
    #[arg(long, env = "OCI_PROFILE")]
    pub profile: Option<String>,

    /// Compute shape to probe
    #[arg(long, env = "OCI_SHAPE")]
    pub shape: Option<String>,

    /// OCPU count for the flexible shape
    #[arg(long, env = "OCI_OCPUS")]
    pub ocpus: Option<u32>,

    /// Memory size in GB for the flexible shape
    #[arg(long, env = "OCI_MEMORY_GB")]
    pub memory_gb: Option<u32>,

    /// Image OCID (skips the display-name lookup)
    #[arg(long, env = "OCI_IMAGE_ID")]
    pub image_id: Option<String>,

    /// Exact image display name to resolve when no image OCID is given
    #[arg(long, env = "OCI_IMAGE_NAME")]
    pub image_name: Option<String>,

    /// Availability domain to launch in (required)
    #[arg(long, env = "OCI_AVAILABILITY_DOMAIN")]
    pub availability_domain: Option<String>,

    /// Compartment OCID (required)
    #[arg(long, env = "OCI_COMPARTMENT_ID")]
    pub compartment_id: Option<String>,

    /// Subnet OCID (required)
    #[arg(long, env = "OCI_SUBNET_ID")]
    pub subnet_id: Option<String>,

    /// Discord-compatible webhook for notifications
    #[arg(long, env = "DISCORD_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,

    /// Username shown on webhook messages
    #[arg(long, env = "PROBE_WEBHOOK_USERNAME")]
    pub webhook_username: Option<String>,

    /// Seconds to wait for the probe instance to reach RUNNING
    #[arg(long, env = "PROBE_LAUNCH_TIMEOUT_SECS")]
    pub launch_timeout: Option<u64>,

    /// Seconds to wait for the probe instance to reach TERMINATED
    #[arg(long, env = "PROBE_TERMINATE_TIMEOUT_SECS")]
    pub terminate_timeout: Option<u64>,
}

impl From<ProbeArgs> for ConfigInputs {
    fn from(args: ProbeArgs) -> Self {
        Self {
            profile: args.profile,
            shape: args.shape,
            ocpus: args.ocpus,
            memory_gb: args.memory_gb,
            image_id: args.image_id,
            image_name: args.image_name,
            availability_domain: args.availability_domain,
            compartment_id: args.compartment_id,
            subnet_id: args.subnet_id,
            webhook_url: args.webhook_url,
            webhook_username: args.webhook_username,
            launch_timeout_secs: args.launch_timeout,
            terminate_timeout_secs: args.terminate_timeout,
        }
    }
}
