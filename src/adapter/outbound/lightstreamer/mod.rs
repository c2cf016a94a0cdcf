//! Lightstreamer push feed adapter.
//!
//! Speaks TLCP over a WebSocket and exposes the session as a
//! [`TelemetryFeed`](crate::port::TelemetryFeed).

pub mod protocol;
mod stream;

pub use stream::{LightstreamerFeed, LightstreamerSettings};
