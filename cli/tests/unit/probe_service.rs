//! Tests for the `probe` application service.
//!
//! Drives `run_probe()` and its steps through scripted port implementations
//! and checks outcomes, exit codes, cleanup calls, and notifications.

#![allow(clippy::expect_used)]

use capacity_probe::application::services::probe::{
    CleanupStatus, NotifyStatus, attempt_launch, cleanup, resolve_image_id, run_probe,
};
use capacity_probe::domain::{ProbeError, ProbeOutcome, exit_code_for};

use crate::helpers::{
    INSTANCE_ID, NOT_AUTHORIZED, OUT_OF_HOST_CAPACITY, config, config_with_image_id, err_output,
    failed_output, ok_output,
};
use crate::mocks::{Call, RecordingNotifier, RecordingReporter, ScriptedControlPlane};

const DISPLAY_NAME: &str = "capacity-probe-1717171717";

fn probe_error(err: &anyhow::Error) -> &ProbeError {
    err.downcast_ref::<ProbeError>().expect("typed probe error")
}

// ── Image resolution ──────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_image_id_takes_first_exact_match() {
    let cp = ScriptedControlPlane::capacity_available();
    let id = resolve_image_id(&cp, &config(), &RecordingReporter::default())
        .await
        .expect("resolved");
    assert_eq!(id, "ocid1.image.oc1.phx.first");
    assert_eq!(cp.count(|c| matches!(c, Call::ListImages { .. })), 1);
}

#[tokio::test]
async fn resolve_image_id_with_direct_id_skips_lookup() {
    let cp = ScriptedControlPlane::capacity_available();
    let id = resolve_image_id(
        &cp,
        &config_with_image_id("ocid1.image.oc1.phx.direct"),
        &RecordingReporter::default(),
    )
    .await
    .expect("resolved");
    assert_eq!(id, "ocid1.image.oc1.phx.direct");
    assert!(cp.calls().is_empty(), "no lookup expected: {:?}", cp.calls());
}

#[tokio::test]
async fn resolve_image_id_zero_matches_is_image_not_found() {
    let cp = ScriptedControlPlane {
        images: Ok(ok_output(
            br#"{"data": [{"display-name": "Something-Else", "id": "x"}]}"#,
        )),
        ..ScriptedControlPlane::capacity_available()
    };
    let err = resolve_image_id(&cp, &config(), &RecordingReporter::default())
        .await
        .expect_err("no match");
    assert!(matches!(probe_error(&err), ProbeError::ImageNotFound { .. }));
    assert_eq!(exit_code_for(&err), 1);
}

#[tokio::test]
async fn resolve_image_id_empty_listing_is_image_not_found() {
    let cp = ScriptedControlPlane {
        images: Ok(ok_output(b"")),
        ..ScriptedControlPlane::capacity_available()
    };
    let err = resolve_image_id(&cp, &config(), &RecordingReporter::default())
        .await
        .expect_err("no match");
    assert!(matches!(probe_error(&err), ProbeError::ImageNotFound { .. }));
}

#[tokio::test]
async fn resolve_image_id_lookup_failure_is_control_plane_error() {
    let cp = ScriptedControlPlane {
        images: Ok(err_output(1, NOT_AUTHORIZED)),
        ..ScriptedControlPlane::capacity_available()
    };
    let err = resolve_image_id(&cp, &config(), &RecordingReporter::default())
        .await
        .expect_err("lookup failed");
    assert!(matches!(
        probe_error(&err),
        ProbeError::ControlPlane { operation: "image lookup", .. }
    ));
}

// ── Launch classification ─────────────────────────────────────────────────────

#[tokio::test]
async fn attempt_launch_success_yields_available() {
    let cp = ScriptedControlPlane::capacity_available();
    let outcome = attempt_launch(&cp, &config(), "img", DISPLAY_NAME)
        .await
        .expect("classified");
    assert_eq!(
        outcome,
        ProbeOutcome::CapacityAvailable {
            instance_id: INSTANCE_ID.to_string()
        }
    );
    assert_eq!(
        cp.calls(),
        vec![Call::Launch {
            image_id: "img".to_string(),
            display_name: DISPLAY_NAME.to_string(),
            shape: "VM.Standard.A1.Flex".to_string(),
        }]
    );
}

#[tokio::test]
async fn attempt_launch_null_id_is_parse_error() {
    let cp = ScriptedControlPlane {
        launch: Ok(ok_output(br#"{"data": {"id": null}}"#)),
        ..ScriptedControlPlane::capacity_available()
    };
    let err = attempt_launch(&cp, &config(), "img", DISPLAY_NAME)
        .await
        .expect_err("no id");
    assert!(matches!(probe_error(&err), ProbeError::ResponseParse { .. }));
    assert_eq!(exit_code_for(&err), 1);
}

#[tokio::test]
async fn attempt_launch_spawn_failure_is_launch_failed() {
    let cp = ScriptedControlPlane {
        launch: Err("oci timed out after 930s".to_string()),
        ..ScriptedControlPlane::capacity_available()
    };
    let outcome = attempt_launch(&cp, &config(), "img", DISPLAY_NAME)
        .await
        .expect("classified");
    assert!(matches!(outcome, ProbeOutcome::LaunchFailed { raw_error } if raw_error.contains("timed out")));
}

#[tokio::test]
async fn attempt_launch_keeps_stdout_of_a_timed_out_waiter() {
    let cp = ScriptedControlPlane {
        launch: Ok(failed_output(
            2,
            br#"{"data": {"id": "ocid1.instance.oc1.phx.stray", "lifecycle-state": "PROVISIONING"}}"#,
            b"Failed to wait until the resource entered the specified state. \
              Outputting last known resource state\nMaximum wait time has been exceeded.",
        )),
        ..ScriptedControlPlane::capacity_available()
    };
    let outcome = attempt_launch(&cp, &config(), "img", DISPLAY_NAME)
        .await
        .expect("classified");
    let ProbeOutcome::LaunchFailed { raw_error } = &outcome else {
        panic!("expected LaunchFailed, got {outcome:?}");
    };
    assert!(raw_error.contains("Maximum wait time"), "{raw_error}");
    assert!(raw_error.contains("ocid1.instance.oc1.phx.stray"), "{raw_error}");
}

#[tokio::test]
async fn attempt_launch_sees_capacity_marker_on_stdout() {
    let cp = ScriptedControlPlane {
        launch: Ok(failed_output(1, OUT_OF_HOST_CAPACITY, b"WARNING: retrying request")),
        ..ScriptedControlPlane::capacity_available()
    };
    let outcome = attempt_launch(&cp, &config(), "img", DISPLAY_NAME)
        .await
        .expect("classified");
    assert_eq!(outcome, ProbeOutcome::CapacityUnavailable);
}

// ── Cleanup ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn cleanup_skips_non_available_outcomes() {
    let cp = ScriptedControlPlane::capacity_available();
    let reporter = RecordingReporter::default();
    for outcome in [
        ProbeOutcome::CapacityUnavailable,
        ProbeOutcome::LaunchFailed {
            raw_error: "x".to_string(),
        },
    ] {
        assert_eq!(
            cleanup(&cp, &config(), &outcome, &reporter).await,
            CleanupStatus::NotRequired
        );
    }
    assert!(cp.calls().is_empty());
}

// ── End to end ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn available_run_terminates_once_and_notifies() {
    let cp = ScriptedControlPlane::capacity_available();
    let notifier = RecordingNotifier::default();
    let reporter = RecordingReporter::default();

    let report = run_probe(&cp, Some(&notifier), &reporter, &config(), DISPLAY_NAME)
        .await
        .expect("probe ran");

    assert_eq!(report.exit_code(), 0);
    assert_eq!(report.cleanup, CleanupStatus::Terminated);
    assert_eq!(report.notification, NotifyStatus::Sent);
    assert_eq!(
        cp.terminate_calls(),
        vec![Call::Terminate {
            instance_id: INSTANCE_ID.to_string(),
            preserve_boot_volume: false,
        }]
    );

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].content.contains("Capacity available"));
    assert!(messages[0].content.contains("Uocm:PHX-AD-1"));
}

#[tokio::test]
async fn calls_happen_in_pipeline_order() {
    let cp = ScriptedControlPlane::capacity_available();
    run_probe(
        &cp,
        None::<&RecordingNotifier>,
        &RecordingReporter::default(),
        &config(),
        DISPLAY_NAME,
    )
    .await
    .expect("probe ran");

    let kinds: Vec<&str> = cp
        .calls()
        .iter()
        .map(|c| match c {
            Call::Version => "version",
            Call::ListImages { .. } => "list",
            Call::Launch { .. } => "launch",
            Call::Terminate { .. } => "terminate",
        })
        .collect();
    assert_eq!(kinds, ["version", "list", "launch", "terminate"]);
}

#[tokio::test]
async fn out_of_capacity_exits_two_without_terminate() {
    let cp = ScriptedControlPlane::launch_fails(OUT_OF_HOST_CAPACITY);
    let notifier = RecordingNotifier::default();

    let report = run_probe(
        &cp,
        Some(&notifier),
        &RecordingReporter::default(),
        &config(),
        DISPLAY_NAME,
    )
    .await
    .expect("probe ran");

    assert_eq!(report.outcome, ProbeOutcome::CapacityUnavailable);
    assert_eq!(report.exit_code(), 2);
    assert!(cp.terminate_calls().is_empty());
    assert!(notifier.messages()[0].content.contains("Out of capacity"));
}

#[tokio::test]
async fn mixed_case_marker_is_unavailable() {
    let cp = ScriptedControlPlane::launch_fails(b"Error: OuT oF CaPaCiTy in AD-1");
    let report = run_probe(
        &cp,
        None::<&RecordingNotifier>,
        &RecordingReporter::default(),
        &config(),
        DISPLAY_NAME,
    )
    .await
    .expect("probe ran");
    assert_eq!(report.exit_code(), 2);
}

#[tokio::test]
async fn other_launch_failure_exits_one_with_raw_error_in_message() {
    let cp = ScriptedControlPlane::launch_fails(NOT_AUTHORIZED);
    let notifier = RecordingNotifier::default();

    let report = run_probe(
        &cp,
        Some(&notifier),
        &RecordingReporter::default(),
        &config(),
        DISPLAY_NAME,
    )
    .await
    .expect("probe ran");

    assert!(matches!(report.outcome, ProbeOutcome::LaunchFailed { .. }));
    assert_eq!(report.exit_code(), 1);
    assert!(cp.terminate_calls().is_empty());
    assert!(notifier.messages()[0].content.contains("NotAuthorizedOrNotFound"));
}

#[tokio::test]
async fn terminate_failure_still_exits_zero_with_warning() {
    let cp = ScriptedControlPlane {
        terminate: Ok(err_output(1, b"ServiceError: {\"code\": \"Conflict\"}")),
        ..ScriptedControlPlane::capacity_available()
    };
    let notifier = RecordingNotifier::default();
    let reporter = RecordingReporter::default();

    let report = run_probe(&cp, Some(&notifier), &reporter, &config(), DISPLAY_NAME)
        .await
        .expect("probe ran");

    assert_eq!(report.exit_code(), 0);
    assert!(matches!(report.cleanup, CleanupStatus::Failed(_)));
    assert!(
        reporter.warnings().iter().any(|w| w.contains(INSTANCE_ID)),
        "warnings: {:?}",
        reporter.warnings()
    );
    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].content.contains("Capacity available"));
    assert!(messages[0].content.contains("Termination failed"));
}

#[tokio::test]
async fn terminate_timeout_is_also_a_warning() {
    let cp = ScriptedControlPlane {
        terminate: Err("oci timed out after 630s".to_string()),
        ..ScriptedControlPlane::capacity_available()
    };
    let report = run_probe(
        &cp,
        None::<&RecordingNotifier>,
        &RecordingReporter::default(),
        &config(),
        DISPLAY_NAME,
    )
    .await
    .expect("probe ran");
    assert_eq!(report.exit_code(), 0);
    assert_eq!(
        report.cleanup,
        CleanupStatus::Failed("oci timed out after 630s".to_string())
    );
}

#[tokio::test]
async fn notification_failure_never_changes_exit_code() {
    let scenarios = [
        (ScriptedControlPlane::capacity_available(), 0),
        (ScriptedControlPlane::launch_fails(OUT_OF_HOST_CAPACITY), 2),
        (ScriptedControlPlane::launch_fails(NOT_AUTHORIZED), 1),
    ];
    for (cp, expected) in scenarios {
        let notifier = RecordingNotifier::failing();
        let reporter = RecordingReporter::default();
        let report = run_probe(&cp, Some(&notifier), &reporter, &config(), DISPLAY_NAME)
            .await
            .expect("probe ran");
        assert_eq!(report.exit_code(), expected);
        assert_eq!(report.notification, NotifyStatus::Failed);
        assert_eq!(notifier.messages().len(), 1);
        assert!(reporter.warnings().iter().any(|w| w.contains("Notification")));
    }
}

#[tokio::test]
async fn missing_tool_exits_three_before_any_lookup() {
    let cp = ScriptedControlPlane {
        version: Err("failed to spawn oci".to_string()),
        ..ScriptedControlPlane::capacity_available()
    };
    let notifier = RecordingNotifier::default();
    let err = run_probe(
        &cp,
        Some(&notifier),
        &RecordingReporter::default(),
        &config(),
        DISPLAY_NAME,
    )
    .await
    .expect_err("tool missing");

    assert_eq!(exit_code_for(&err), 3);
    assert_eq!(cp.calls(), vec![Call::Version]);
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn unparseable_success_does_not_terminate_or_notify() {
    let cp = ScriptedControlPlane {
        launch: Ok(ok_output(br#"{"data": {}}"#)),
        ..ScriptedControlPlane::capacity_available()
    };
    let notifier = RecordingNotifier::default();
    let err = run_probe(
        &cp,
        Some(&notifier),
        &RecordingReporter::default(),
        &config(),
        DISPLAY_NAME,
    )
    .await
    .expect_err("parse error");

    assert!(matches!(probe_error(&err), ProbeError::ResponseParse { .. }));
    assert!(cp.terminate_calls().is_empty());
    assert!(notifier.messages().is_empty());
}
