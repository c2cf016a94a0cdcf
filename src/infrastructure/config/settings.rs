//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is read from an optional TOML file, then overridden by
//! environment variables. The bot token is only ever taken from
//! `TELEGRAM_TOKEN`.
//!
//! # Example
//!
//! ```no_run
//! use tankwatch::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Some("config.toml"))?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use super::feed::FeedConfig;
use super::logging::LoggingConfig;
use super::storage::StorageConfig;
use super::telegram::TelegramAppConfig;
use crate::application::state::VALUE_FIELD;
use crate::error::{ConfigError, Result};

/// Environment variable holding the bot token.
pub const TOKEN_VAR: &str = "TELEGRAM_TOKEN";
const CHECK_INTERVAL_VAR: &str = "CHECK_INTERVAL";
const SUBSCRIBERS_FILE_VAR: &str = "SUBSCRIBERS_FILE";
const MIN_CHANGE_THRESHOLD_VAR: &str = "MIN_CHANGE_THRESHOLD";

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramAppConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from an optional TOML file plus the process
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - An environment override cannot be parsed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let content = match path {
            Some(path) => std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?,
            None => String::new(),
        };
        Self::from_sources(&content, |key| std::env::var(key).ok())
    }

    /// Parse configuration from TOML content and an environment lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`], minus file access.
    #[allow(clippy::result_large_err)]
    pub fn from_sources<F>(content: &str, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.apply_env(env)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.telegram.token = env(TOKEN_VAR).filter(|token| !token.trim().is_empty());

        if let Some(raw) = env(CHECK_INTERVAL_VAR) {
            self.telegram.check_interval_secs = parse_var(CHECK_INTERVAL_VAR, &raw)?;
        }
        if let Some(raw) = env(MIN_CHANGE_THRESHOLD_VAR) {
            self.telegram.min_change_threshold = parse_var(MIN_CHANGE_THRESHOLD_VAR, &raw)?;
        }
        if let Some(raw) = env(SUBSCRIBERS_FILE_VAR).filter(|raw| !raw.trim().is_empty()) {
            self.storage.subscribers_file = PathBuf::from(raw.trim());
        }
        Ok(())
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        let threshold = self.telegram.min_change_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "min_change_threshold",
                reason: "must be a finite number greater than 0".to_string(),
            }
            .into());
        }
        if self.telegram.check_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "check_interval_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.storage.subscribers_file.as_os_str().is_empty() {
            return Err(ConfigError::MissingField {
                field: "subscribers_file",
            }
            .into());
        }

        let feed = &self.feed;
        let url = url::Url::parse(&feed.url).map_err(|e| ConfigError::InvalidValue {
            field: "feed.url",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(ConfigError::InvalidValue {
                field: "feed.url",
                reason: format!("scheme must be ws or wss, got {}", url.scheme()),
            }
            .into());
        }
        if feed.adapter_set.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "feed.adapter_set",
            }
            .into());
        }
        if feed.item.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "feed.item" }.into());
        }
        if !feed.fields.iter().any(|field| field == VALUE_FIELD) {
            return Err(ConfigError::InvalidValue {
                field: "feed.fields",
                reason: format!("must include {VALUE_FIELD}"),
            }
            .into());
        }
        if feed.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connect_timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        let reconnection = &feed.reconnection;
        if reconnection.initial_delay_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "initial_delay_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if reconnection.max_delay_ms < reconnection.initial_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_delay_ms",
                reason: "must be >= initial_delay_ms".to_string(),
            }
            .into());
        }
        if !(reconnection.backoff_multiplier >= 1.0) {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be >= 1.0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Bot token, required to run the bot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when `TELEGRAM_TOKEN` is unset.
    #[allow(clippy::result_large_err)]
    pub fn require_token(&self) -> Result<&str> {
        self.telegram
            .token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField { field: TOKEN_VAR }.into())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn parse_var<T>(field: &'static str, raw: &str) -> std::result::Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            field,
            reason: format!("'{raw}': {e}"),
        })
}
