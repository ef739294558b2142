//! Application configuration.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::args::CliArgs;
use crate::domain::ports::RequestOptions;
use crate::infrastructure::discord::DISCORD_API_BASE;

pub(super) const APP_NAME: &str = "oxicord-member";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Discord REST settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds; 0 disables the timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    DISCORD_API_BASE.to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

/// Application configuration from file and CLI.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Bot token. Prefer the `DISCORD_TOKEN` environment variable.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// REST API configuration.
    #[serde(default)]
    pub api: ApiConfig,
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(token) = &args.token {
            self.token = Some(token.clone());
        }
        if let Some(base_url) = &args.api_base_url {
            self.api.base_url.clone_from(base_url);
        }
        if let Some(timeout) = args.timeout_secs {
            self.api.timeout_secs = timeout;
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("oxicord-member.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }

    /// Returns the configured request timeout, if any.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        if self.api.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.api.timeout_secs))
        }
    }

    /// Builds request options carrying the configured timeout.
    #[must_use]
    pub fn request_options(&self) -> RequestOptions {
        match self.request_timeout() {
            Some(timeout) => RequestOptions::new().with_timeout(timeout),
            None => RequestOptions::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
            log_level = "debug"
            token = "secret"

            [api]
            base_url = "http://localhost:9000/api"
            timeout_secs = 5
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.api.base_url, "http://localhost:9000/api");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.api.base_url, DISCORD_API_BASE);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.token.is_none());
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;

        assert!(config.request_timeout().is_none());
        assert!(config.request_options().timeout().is_none());
    }

    #[test]
    fn test_token_is_never_written_back() {
        let config = AppConfig {
            token: Some("secret".to_string()),
            ..AppConfig::default()
        };

        let written = toml::to_string(&config).unwrap();

        assert!(!written.contains("secret"));
    }

    #[test]
    fn test_cli_args_override_file() {
        let mut config: AppConfig = toml::from_str("log_level = \"warn\"").unwrap();
        let args = CliArgs::try_parse_from([
            "oxicord-member",
            "--log-level",
            "trace",
            "--timeout-secs",
            "3",
            "kick",
            "--guild",
            "1",
            "--user",
            "2",
        ])
        .unwrap();

        config.merge_with_args(&args);

        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.api.timeout_secs, 3);
    }
}
