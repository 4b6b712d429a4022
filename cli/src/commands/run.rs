//! `capacity-probe run`: one probe attempt.

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::probe::{CleanupStatus, NotifyStatus, ProbeReport, run_probe};
use crate::commands::ProbeArgs;
use crate::domain::outcome::probe_display_name;
use crate::domain::ProbeConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::oci::OciCli;
use crate::infra::webhook::WebhookNotifier;
use crate::output::{OutputContext, TerminalReporter, json};

/// Run the probe and return the process exit status.
///
/// # Errors
///
/// Returns an error for invalid configuration or any fatal probe error.
pub async fn run(app: &AppContext, args: ProbeArgs) -> Result<i32> {
    let config = ProbeConfig::resolve(args.into())?;

    let control_plane = OciCli::new(TokioCommandRunner::default(), config.profile.as_str());
    let notifier = config.webhook_url.as_deref().map(WebhookNotifier::new);
    let reporter = TerminalReporter::new(&app.output);
    let display_name = probe_display_name(chrono::Utc::now().timestamp());

    let report = run_probe(
        &control_plane,
        notifier.as_ref(),
        &reporter,
        &config,
        &display_name,
    )
    .await?;
    drop(reporter);

    if app.is_json() {
        println!("{}", json::format_report(&report)?);
    } else {
        render_human(&app.output, &config, &report);
    }
    Ok(report.exit_code())
}

fn render_human(ctx: &OutputContext, config: &ProbeConfig, report: &ProbeReport) {
    ctx.facts(
        "Probe result",
        &[
            ("Shape", config.shape.as_str()),
            ("Domain", config.availability_domain.as_str()),
            ("Image", report.image_id.as_str()),
            ("Instance", report.display_name.as_str()),
        ],
    );
    ctx.outcome(&report.outcome);

    if let CleanupStatus::Failed(detail) = &report.cleanup {
        ctx.warn(&format!("Probe instance may still exist: {detail}"));
    }
    if report.notification == NotifyStatus::Skipped {
        ctx.info("No webhook configured, notification skipped");
    }
}
