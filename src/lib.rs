//! Oxicord Member - Discord guild member management.
//!
//! This crate keeps a local projection of Discord guild members, reconciles
//! it with partial and full server updates, and resolves guild and channel
//! permissions from the cached role table.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer coordinating member collections.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "oxicord-member";
