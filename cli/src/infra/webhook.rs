//! Webhook infrastructure: implements `Notifier` with a `ureq` POST run on
//! the blocking pool.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::Notifier;
use crate::domain::NotificationMessage;

/// Upper bound on a single delivery attempt.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts `{"content", "username"}` JSON to a Discord-compatible webhook.
pub struct WebhookNotifier {
    url: String,
    agent: ureq::Agent,
}

impl WebhookNotifier {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(WEBHOOK_TIMEOUT).build();
        Self {
            url: url.into(),
            agent,
        }
    }
}

impl Notifier for WebhookNotifier {
    async fn post_message(&self, message: &NotificationMessage) -> Result<()> {
        let body = serde_json::to_string(message).context("encoding webhook payload")?;
        let agent = self.agent.clone();
        let url = self.url.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            match agent
                .post(&url)
                .set("Content-Type", "application/json")
                .send_string(&body)
            {
                Ok(_) => Ok(()),
                Err(ureq::Error::Status(code, _)) => anyhow::bail!("webhook returned HTTP {code}"),
                Err(e) => Err(e).context("webhook request failed"),
            }
        })
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking panicked: {e}"))?
    }
}
