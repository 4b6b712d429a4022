//! `capacity-probe doctor`: pre-flight diagnostics.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::doctor::{DoctorReport, run_doctor};
use crate::commands::ProbeArgs;
use crate::domain::ProbeConfig;
use crate::domain::error::EXIT_MISSING_DEPENDENCY;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::oci::OciCli;
use crate::output::{OutputContext, TerminalReporter, json};

/// Validate configuration and tooling without touching the provider API.
///
/// Exits `0` when healthy, `3` when the `oci` tool is missing.
///
/// # Errors
///
/// Returns an error for invalid configuration.
pub async fn run(app: &AppContext, args: ProbeArgs) -> Result<i32> {
    let config = ProbeConfig::resolve(args.into())?;
    let control_plane = OciCli::new(TokioCommandRunner::default(), config.profile.as_str());

    let report = {
        let reporter = TerminalReporter::new(&app.output);
        run_doctor(&control_plane, &reporter, &config).await
    };

    if app.is_json() {
        println!("{}", json::format_report(&report)?);
    } else {
        render_human(&app.output, &report);
    }

    Ok(if report.is_healthy() {
        0
    } else {
        EXIT_MISSING_DEPENDENCY
    })
}

fn render_human(ctx: &OutputContext, report: &DoctorReport) {
    let webhook = if report.webhook_configured { "configured" } else { "not set" };
    ctx.facts(
        "Configuration",
        &[
            ("Profile", report.profile.as_str()),
            ("Shape", report.shape.as_str()),
            ("Domain", report.availability_domain.as_str()),
            ("Image from", report.image_source),
            ("Webhook", webhook),
        ],
    );
    if report.is_healthy() {
        ctx.success("Ready to probe");
    } else {
        ctx.error("oci CLI not found on PATH");
    }
}
