//! Notification message templates.

use serde::Serialize;

use crate::domain::config::ProbeConfig;
use crate::domain::outcome::ProbeOutcome;

/// Discord rejects `content` longer than this many characters.
pub const MAX_CONTENT_CHARS: usize = 2000;

/// Webhook payload: `{"content": ..., "username": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationMessage {
    pub content: String,
    pub username: String,
}

/// Build the message for `outcome`.
///
/// `cleanup_warning` is appended to the available template when the probe
/// instance could not be terminated.
#[must_use]
pub fn compose(
    config: &ProbeConfig,
    outcome: &ProbeOutcome,
    cleanup_warning: Option<&str>,
) -> NotificationMessage {
    let image = config.image_id.as_deref().unwrap_or(&config.image_name);
    let context = format!(
        "Shape: `{}` ({} OCPU / {} GB)\nAvailability domain: `{}`\nImage: `{image}`",
        config.shape, config.ocpus, config.memory_gb, config.availability_domain,
    );

    let mut content = match outcome {
        ProbeOutcome::CapacityAvailable { instance_id } => {
            let mut body = format!(
                "✅ **Capacity available**\n{context}\nProbe instance `{instance_id}` was launched and released."
            );
            if let Some(warning) = cleanup_warning {
                body.push_str(&format!(
                    "\n⚠️ Termination failed, check for a stray instance: {warning}"
                ));
            }
            body
        }
        ProbeOutcome::CapacityUnavailable => {
            format!("❌ **Out of capacity**\n{context}\nWill try again on the next run.")
        }
        ProbeOutcome::LaunchFailed { raw_error } => {
            format!("⚠️ **Launch failed**\n{context}\n```\n{raw_error}\n```")
        }
    };

    truncate_chars(&mut content, MAX_CONTENT_CHARS);

    NotificationMessage {
        content,
        username: config.webhook_username.clone(),
    }
}

/// Cut `text` to at most `max` characters, closing an open code fence.
fn truncate_chars(text: &mut String, max: usize) {
    const ELLIPSIS: &str = "\n…\n```";
    if text.chars().count() <= max {
        return;
    }
    let keep = max - ELLIPSIS.chars().count();
    let cut = text
        .char_indices()
        .nth(keep)
        .map_or(text.len(), |(idx, _)| idx);
    text.truncate(cut);
    if text.matches("```").count() % 2 == 1 {
        text.push_str(ELLIPSIS);
    } else {
        text.push('…');
    }
}
