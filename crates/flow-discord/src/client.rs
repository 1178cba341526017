//! Discord webhook HTTP client.

use anyhow::{Context, Result};
use flow_core::message::NotificationMessage;
use reqwest::Client;
use std::time::Duration;

/// HTTP client for a Discord webhook endpoint.
///
/// Delivery is a single attempt; message formatting is side-effect free,
/// so callers may retry safely.
pub struct DiscordClient {
    client: Client,
    webhook_url: String,
}

impl DiscordClient {
    /// Create a client for the given webhook URL. Returns `None` when the
    /// URL is empty, so an unconfigured deployment skips delivery.
    pub fn from_webhook_url(webhook_url: impl Into<String>) -> Option<Self> {
        let webhook_url = webhook_url.into();
        if webhook_url.trim().is_empty() {
            return None;
        }
        Some(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to create HTTP client"),
            webhook_url,
        })
    }

    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// Deliver a formatted notification to the webhook.
    pub async fn send(&self, message: &NotificationMessage) -> Result<()> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await
            .context("Failed to reach Discord webhook")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Discord webhook returned {}: {}", status, body);
        }

        tracing::debug!("Delivered notification to Discord webhook");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_webhook_url_disables_client() {
        assert!(DiscordClient::from_webhook_url("").is_none());
        assert!(DiscordClient::from_webhook_url("   ").is_none());
    }

    #[test]
    fn configured_webhook_url_is_kept() {
        let client =
            DiscordClient::from_webhook_url("https://discord.com/api/webhooks/1/abc").unwrap();
        assert_eq!(
            client.webhook_url(),
            "https://discord.com/api/webhooks/1/abc"
        );
    }

    #[test]
    fn payload_serializes_to_webhook_shape() {
        use flow_core::message::{Embed, EmbedField};

        let message = NotificationMessage {
            content: String::new(),
            embeds: vec![Embed {
                title: "EGTT01 - Active".to_string(),
                color: 0x2ECC71,
                description: "<@&100>".to_string(),
                fields: vec![EmbedField {
                    name: "Reason".to_string(),
                    value: "Capacity".to_string(),
                    inline: false,
                }],
            }],
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["content"], "");
        assert_eq!(value["embeds"][0]["title"], "EGTT01 - Active");
        assert_eq!(value["embeds"][0]["fields"][0]["inline"], false);
    }
}
