//! Telegram bot and notifier configuration.

use std::time::Duration;

use serde::Deserialize;

/// Telegram bot and notification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    /// Bot API token. Only ever read from `TELEGRAM_TOKEN`.
    #[serde(skip)]
    pub token: Option<String>,
    /// Seconds between notifier ticks (default: 60).
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    /// Minimum absolute level change, in percent, that triggers a broadcast.
    #[serde(default = "default_min_change_threshold")]
    pub min_change_threshold: f64,
}

const fn default_check_interval_secs() -> u64 {
    60
}

const fn default_min_change_threshold() -> f64 {
    0.5
}

impl TelegramAppConfig {
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            token: None,
            check_interval_secs: default_check_interval_secs(),
            min_change_threshold: default_min_change_threshold(),
        }
    }
}
