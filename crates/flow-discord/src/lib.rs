//! Discord webhook client for flow measure notifications.

mod client;

pub use client::DiscordClient;
