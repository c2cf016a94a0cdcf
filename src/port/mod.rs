//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! ```text
//!                 ┌──────────────────────────┐
//!                 │       Application        │
//!     ┌───────────┤   Domain + Port traits   ├────────────┐
//!     │           └──────────────────────────┘            │
//!     ▼                        ▼                          ▼
//! ┌──────────┐         ┌──────────────┐           ┌────────────┐
//! │Telemetry │         │  Subscriber  │           │ Messenger  │
//! │   Feed   │         │    Store     │           │  Adapter   │
//! └──────────┘         └──────────────┘           └────────────┘
//! ```
//!
//! - [`TelemetryFeed`] - push-streaming session delivering [`FeedEvent`]s
//! - [`SubscriberStore`] - persistence for the subscriber set
//! - [`Messenger`] - outbound chat delivery

pub mod outbound;

pub use outbound::feed::{FeedEvent, ItemUpdate, SubscriptionMode, SubscriptionRequest, TelemetryFeed};
pub use outbound::messenger::Messenger;
pub use outbound::store::SubscriberStore;
