//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Discord API client.
pub mod discord;
/// In-memory guild storage.
pub mod guild_registry;

pub use config::{AppConfig, CliArgs, LogLevel, StorageManager};
pub use discord::DiscordClient;
pub use guild_registry::InMemoryGuildRegistry;
