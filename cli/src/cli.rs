//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags};
use crate::commands;

/// Check whether an OCI compute shape has free capacity right now
#[derive(Parser)]
#[command(
    name = "capacity-probe",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Launch a probe instance, release it, and report capacity
    ///
    /// Exit status: 0 capacity available, 1 error, 2 out of capacity,
    /// 3 oci CLI missing.
    Run(commands::ProbeArgs),

    /// Check configuration and the oci CLI without launching anything
    Doctor(commands::ProbeArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command and return the process exit status.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<i32> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            no_color,
            quiet,
            json,
        });
        match command {
            Command::Run(args) => commands::run::run(&app, args).await,
            Command::Doctor(args) => commands::doctor::run(&app, args).await,
            Command::Version => {
                commands::version::run(json);
                Ok(0)
            }
        }
    }
}
