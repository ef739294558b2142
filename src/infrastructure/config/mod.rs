//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{ApiConfig, AppConfig, LogLevel};
pub use args::{CliArgs, Command, MemberTarget, ModifyArgs};
pub use storage::{ConfigError, StorageManager};
