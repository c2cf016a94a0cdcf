//! Telemetry feed and reconnection configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::port::SubscriptionRequest;

/// Lightstreamer endpoint and subscription settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// WebSocket endpoint.
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_adapter_set")]
    pub adapter_set: String,
    /// Item carrying the urine tank level.
    #[serde(default = "default_item")]
    pub item: String,
    #[serde(default = "default_fields")]
    pub fields: Vec<String>,
    /// Client identifier sent with `create_session`.
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Upper bound for reaching a connected session, in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub reconnection: ReconnectionConfig,
}

fn default_url() -> String {
    "wss://push.lightstreamer.com/lightstreamer".into()
}

fn default_adapter_set() -> String {
    "ISSLIVE".into()
}

fn default_item() -> String {
    "NODE3000005".into()
}

fn default_fields() -> Vec<String> {
    vec!["Value".into(), "TimeStamp".into(), "Status.Class".into()]
}

fn default_client_id() -> String {
    "mgQkwtwdysogQz2BJ4Ji kOj2Bg".into()
}

const fn default_connect_timeout_secs() -> u64 {
    30
}

impl FeedConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// MERGE subscription with snapshot for the configured item.
    #[must_use]
    pub fn subscription(&self) -> SubscriptionRequest {
        SubscriptionRequest::merge_with_snapshot(self.item.clone(), self.fields.clone())
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            adapter_set: default_adapter_set(),
            item: default_item(),
            fields: default_fields(),
            client_id: default_client_id(),
            connect_timeout_secs: default_connect_timeout_secs(),
            reconnection: ReconnectionConfig::default(),
        }
    }
}

/// Feed reconnection backoff.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconnectionConfig {
    /// Initial delay before first reconnection attempt (milliseconds).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Maximum delay between reconnection attempts (milliseconds).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Multiplier applied to delay after each failed attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

fn default_initial_delay_ms() -> u64 {
    1000 // 1 second
}

fn default_max_delay_ms() -> u64 {
    60000 // 60 seconds
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for ReconnectionConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}
