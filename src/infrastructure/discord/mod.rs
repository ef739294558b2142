//! Discord API client.

mod client;
mod dto;

pub use client::{DISCORD_API_BASE, DiscordClient};
