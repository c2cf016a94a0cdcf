//! Tankwatch - ISS urine tank level notifications over Telegram.
//!
//! Streams the tank level from the public ISS telemetry feed (Lightstreamer,
//! adapter set `ISSLIVE`, item `NODE3000005`), keeps a persistent list of
//! subscribed chats and broadcasts a message whenever the level has moved by
//! at least the configured threshold since the last broadcast.
//!
//! # Architecture
//!
//! Hexagonal layout:
//!
//! - [`domain`] - Levels, change detection, subscriber ids, connection status
//! - [`port`] - Traits for the telemetry feed, subscriber store and messenger
//! - [`application`] - Telemetry state, subscriber registry, notifier, message texts
//! - [`adapter`] - Lightstreamer, Telegram, subscriber file and CLI
//! - [`infrastructure`] - Configuration, feed supervision and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use tankwatch::infrastructure::config::settings::Config;
//! use tankwatch::infrastructure::runtime;
//!
//! # async fn example() -> tankwatch::error::Result<()> {
//! let config = Config::load(Some("config.toml"))?;
//! runtime::run(config).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
