//! JSON output helpers for `--json` mode.

use anyhow::{Context, Result};
use serde::Serialize;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "exit_code": 1
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, exit_code: i32) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "exit_code": exit_code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

/// Pretty-print any serializable report.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_report(report: &impl Serialize) -> Result<String> {
    serde_json::to_string_pretty(report).context("JSON serialization failed")
}
