//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    /// Discord webhook URL; empty disables delivery.
    pub discord_webhook_url: String,
    /// Bearer token that authenticates as the built-in system user.
    pub system_token: String,
    /// Seconds between lifecycle loop ticks.
    pub lifecycle_interval_s: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("FLOW_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            database_path: env::var("FLOW_DATABASE_PATH")
                .unwrap_or_else(|_| "data/flow.db".to_string()),
            database_max_connections: env::var("FLOW_DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            discord_webhook_url: env::var("FLOW_DISCORD_WEBHOOK_URL").unwrap_or_default(),
            system_token: env::var("FLOW_SYSTEM_TOKEN").unwrap_or_default(),
            lifecycle_interval_s: env::var("FLOW_LIFECYCLE_INTERVAL_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}
