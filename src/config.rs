//! Console configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables prefixed with `ADMIN_PANEL` (for example
//! `ADMIN_PANEL_API_BASE_URL`). Command line flags are applied on top by the
//! binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "admin-panel.toml";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Sources could not be read or deserialized
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A setting has an unusable value
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Runtime settings.
///
/// Loaded by [`Config::load`] from defaults, an optional TOML file and
/// `ADMIN_PANEL_*` environment variables, each overriding the one before.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL, without trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Rows per page on the users and payments screens.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Quiet time before a typed search is applied.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// How long the stat counters take to reach their value.
    #[serde(default = "default_counter_duration_ms")]
    pub counter_duration_ms: u64,

    /// Interval between counter animation frames.
    #[serde(default = "default_counter_tick_ms")]
    pub counter_tick_ms: u64,

    /// Where the remember-me flag is persisted.
    #[serde(default = "default_session_file")]
    pub session_file: PathBuf,

    /// Log output file. Logs never go to the terminal, which the UI owns.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_api_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> usize {
    10
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_counter_duration_ms() -> u64 {
    1000
}

fn default_counter_tick_ms() -> u64 {
    50
}

fn default_session_file() -> PathBuf {
    PathBuf::from(".admin-panel-session.json")
}

fn default_log_file() -> PathBuf {
    PathBuf::from("admin-panel.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            counter_duration_ms: default_counter_duration_ms(),
            counter_tick_ms: default_counter_tick_ms(),
            session_file: default_session_file(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// Loads configuration from `path` (or [`DEFAULT_CONFIG_FILE`]) and the
    /// environment. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = config::Config::builder();

        let file = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if file.exists() {
            settings = settings.add_source(config::File::from(file));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("ADMIN_PANEL")
                .prefix_separator("_")
                .try_parsing(true),
        );

        let config: Config = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the console cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("api_base_url cannot be empty".into()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "api_base_url must start with http:// or https://".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        if self.counter_tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "counter_tick_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// [`Config::request_timeout_secs`] as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// [`Config::search_debounce_ms`] as a `Duration`.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// [`Config::counter_duration_ms`] as a `Duration`.
    pub fn counter_duration(&self) -> Duration {
        Duration::from_millis(self.counter_duration_ms)
    }

    /// [`Config::counter_tick_ms`] as a `Duration`.
    pub fn counter_tick(&self) -> Duration {
        Duration::from_millis(self.counter_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 10);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
    }

    #[test]
    fn test_rejects_bad_url() {
        let config = Config {
            api_base_url: "ftp://example.com".into(),
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config {
            api_base_url: "  ".into(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let config = Config {
            page_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
