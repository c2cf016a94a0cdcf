//! Application services (use cases).
//!
//! These services hold the shared state and coordinate the ports: the
//! telemetry tracker applies feed events, the registry owns subscribers and
//! the notifier turns level changes into broadcasts.

pub mod message;
pub mod notifier;
pub mod state;
pub mod subscription;

pub use notifier::{BroadcastLedger, LevelNotifier, TickOutcome};
pub use state::{TelemetryHandle, TelemetrySnapshot, TelemetryTracker};
pub use subscription::{SubscribeOutcome, SubscriberRegistry, UnsubscribeOutcome};
