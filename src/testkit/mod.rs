//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`feed`] - [`ScriptedFeed`](feed::ScriptedFeed), a mock
//!   [`TelemetryFeed`](crate::port::TelemetryFeed) with scripted results.
//! - [`messenger`] - [`RecordingMessenger`](messenger::RecordingMessenger)
//!   capturing outbound chat messages.
//! - [`store`] - [`MemoryStore`](store::MemoryStore), an in-memory
//!   subscriber store with injectable write failures.

pub mod feed;
pub mod messenger;
pub mod store;
