//! Discord notification dispatch.
//!
//! Delivery is best-effort: a webhook failure is logged and never blocks
//! the state change that triggered it.

use flow_core::message::NotificationMessage;
use flow_discord::DiscordClient;

/// Send a notification through the webhook, if one is configured.
pub async fn notify(client: Option<&DiscordClient>, identifier: &str, message: &NotificationMessage) {
    let Some(client) = client else {
        tracing::debug!("No Discord webhook configured, skipping notification for {}", identifier);
        return;
    };

    match client.send(message).await {
        Ok(()) => tracing::info!("Sent Discord notification for {}", identifier),
        Err(err) => tracing::warn!("Discord notification for {} failed: {}", identifier, err),
    }
}
