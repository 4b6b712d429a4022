//! Probe outcome type and the launch-result classification policy.
//!
//! Pure functions only: callers hand in captured CLI output and receive a
//! typed outcome. The capacity detection relies on provider wording and is
//! therefore kept in one table ([`CAPACITY_MARKERS`]) plus a structured
//! fallback on the `ServiceError` code.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{EXIT_AVAILABLE, EXIT_FATAL, EXIT_UNAVAILABLE, ProbeError};

/// Prefix of every probe instance display name.
pub const DISPLAY_NAME_PREFIX: &str = "capacity-probe";

// ── Outcome ──────────────────────────────────────────────────────────────────

/// Result of exactly one launch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// The provider allocated an instance; it must be cleaned up.
    CapacityAvailable { instance_id: String },
    /// The provider reported capacity exhaustion. Try again later.
    CapacityUnavailable,
    /// Any other launch failure, with the full diagnostic text.
    LaunchFailed { raw_error: String },
}

impl ProbeOutcome {
    /// Process exit status for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CapacityAvailable { .. } => EXIT_AVAILABLE,
            Self::CapacityUnavailable => EXIT_UNAVAILABLE,
            Self::LaunchFailed { .. } => EXIT_FATAL,
        }
    }

    /// Instance to terminate, if any.
    #[must_use]
    pub fn instance_id(&self) -> Option<&str> {
        match self {
            Self::CapacityAvailable { instance_id } => Some(instance_id),
            _ => None,
        }
    }
}

// ── Capacity policy ──────────────────────────────────────────────────────────

/// What a recognised failure means for the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    CapacityExhausted,
}

/// Case-insensitive marker phrases found in provider diagnostics.
///
/// Fragile by nature: a provider wording change silently turns a capacity
/// signal into `LaunchFailed`. Extend here, nowhere else.
pub const CAPACITY_MARKERS: &[(&str, FailureKind)] = &[
    ("out of host capacity", FailureKind::CapacityExhausted),
    ("out of capacity", FailureKind::CapacityExhausted),
    ("outofcapacity", FailureKind::CapacityExhausted),
    ("limitexceeded", FailureKind::CapacityExhausted),
];

/// `ServiceError` codes that mean the same thing as [`CAPACITY_MARKERS`].
pub const CAPACITY_ERROR_CODES: &[(&str, FailureKind)] = &[
    ("OutOfCapacity", FailureKind::CapacityExhausted),
    ("LimitExceeded", FailureKind::CapacityExhausted),
];

/// Look a failed launch's diagnostic text up in the policy tables.
#[must_use]
pub fn match_failure(diagnostic: &str) -> Option<FailureKind> {
    let lowered = diagnostic.to_lowercase();
    let by_marker = CAPACITY_MARKERS
        .iter()
        .find(|(marker, _)| lowered.contains(marker))
        .map(|(_, kind)| *kind);
    by_marker.or_else(|| {
        let code = service_error_code(diagnostic)?;
        CAPACITY_ERROR_CODES
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(&code))
            .map(|(_, kind)| *kind)
    })
}

/// Classify a failed launch into `CapacityUnavailable` or `LaunchFailed`.
#[must_use]
pub fn classify_failure(diagnostic: &str) -> ProbeOutcome {
    match match_failure(diagnostic) {
        Some(FailureKind::CapacityExhausted) => ProbeOutcome::CapacityUnavailable,
        None => ProbeOutcome::LaunchFailed {
            raw_error: diagnostic.trim().to_string(),
        },
    }
}

/// Extract the `code` field from the first JSON object embedded in a
/// CLI diagnostic (the body printed after `ServiceError:`).
#[must_use]
pub fn service_error_code(diagnostic: &str) -> Option<String> {
    let start = diagnostic.find('{')?;
    let body = serde_json::Deserializer::from_str(&diagnostic[start..])
        .into_iter::<Value>()
        .next()?
        .ok()?;
    body.get("code")?.as_str().map(str::to_string)
}

// ── Response parsing ─────────────────────────────────────────────────────────

/// Pull the instance id out of a successful launch response.
///
/// # Errors
///
/// Returns [`ProbeError::ResponseParse`] when the payload is not JSON or
/// `data.id` is absent, null, or empty.
pub fn parse_launch_response(stdout: &str) -> Result<String, ProbeError> {
    let value: Value = serde_json::from_str(stdout.trim()).map_err(|e| ProbeError::ResponseParse {
        detail: format!("response is not JSON: {e}"),
    })?;
    value
        .pointer("/data/id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ProbeError::ResponseParse {
            detail: "field data.id is missing or null".to_string(),
        })
}

/// One entry of `oci compute image list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageSummary {
    #[serde(rename = "display-name")]
    pub display_name: String,
    pub id: String,
}

#[derive(Deserialize)]
struct ImageList {
    #[serde(default)]
    data: Vec<ImageSummary>,
}

/// Parse an image listing. The CLI prints nothing at all for an empty list.
///
/// # Errors
///
/// Returns an error if non-empty output is not a valid listing.
pub fn parse_image_list(stdout: &str) -> Result<Vec<ImageSummary>, serde_json::Error> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str::<ImageList>(trimmed)?.data)
}

/// Pick the first image whose display name equals `name` exactly.
///
/// Ties between duplicate display names go to provider order.
#[must_use]
pub fn select_image<'a>(images: &'a [ImageSummary], name: &str) -> Option<&'a ImageSummary> {
    images.iter().find(|image| image.display_name == name)
}

/// Display name for a probe instance launched at `epoch_secs`.
#[must_use]
pub fn probe_display_name(epoch_secs: i64) -> String {
    format!("{DISPLAY_NAME_PREFIX}-{epoch_secs}")
}
