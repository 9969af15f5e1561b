use std::time::Duration;

use anyhow::{Context, Result};

use super::embed::WebhookMessage;

/// Posts messages to a single Discord webhook URL.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    webhook_url: String,
}

impl DiscordClient {
    pub fn new(http: reqwest::Client, webhook_url: impl Into<String>) -> Self {
        Self {
            http,
            webhook_url: webhook_url.into(),
        }
    }

    /// Build a client with its own connection pool and request timeout.
    pub fn with_timeout(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Discord HTTP client")?;
        Ok(Self::new(http, webhook_url))
    }

    /// Execute the webhook. Only the response status is inspected.
    pub async fn send(&self, message: &WebhookMessage) -> Result<()> {
        self.http
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await
            .context("Discord webhook request failed")?
            .error_for_status()
            .context("Discord webhook returned an error status")?;
        Ok(())
    }
}
