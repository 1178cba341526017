//! Shared application state.

use anyhow::Result;
use dashmap::DashMap;
use flow_discord::DiscordClient;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::persistence::{users, Database};

/// Application state: database handle, configuration, the Discord client,
/// and an in-memory index of API tokens.
pub struct AppState {
    db: Database,
    config: Config,
    discord: Option<DiscordClient>,
    /// token -> user id
    tokens: DashMap<String, String>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        let discord = DiscordClient::from_webhook_url(config.discord_webhook_url.clone());
        Self {
            db,
            config,
            discord,
            tokens: DashMap::new(),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn discord(&self) -> Option<&DiscordClient> {
        self.discord.as_ref()
    }

    /// Seed the system user and load persisted API tokens into memory.
    pub async fn load_from_database(&self) -> Result<()> {
        users::ensure_system_user(self.pool()).await?;
        for (token, user_id) in users::load_all_tokens(self.pool()).await? {
            self.tokens.insert(token, user_id);
        }
        Ok(())
    }

    pub fn register_token(&self, token: &str, user_id: &str) {
        self.tokens.insert(token.to_string(), user_id.to_string());
    }

    pub fn user_id_for_token(&self, token: &str) -> Option<String> {
        self.tokens.get(token).map(|entry| entry.value().clone())
    }
}
