//! Telemetry feed port.
//!
//! A feed is one push-streaming session. The adapter translates its wire
//! protocol into [`FeedEvent`]s; the application consumes them through a
//! single dispatch function instead of registering per-callback listeners.

use async_trait::async_trait;

use crate::error::Result;

/// Item subscription modes understood by the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubscriptionMode {
    /// Server merges changes; each update carries only changed fields.
    #[default]
    Merge,
}

impl SubscriptionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "MERGE",
        }
    }
}

/// One item subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub item: String,
    pub fields: Vec<String>,
    pub mode: SubscriptionMode,
    /// Ask for the current value immediately on subscribe.
    pub snapshot: bool,
}

impl SubscriptionRequest {
    #[must_use]
    pub fn merge_with_snapshot(item: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            item: item.into(),
            fields,
            mode: SubscriptionMode::Merge,
            snapshot: true,
        }
    }
}

/// Full field values of one item after an update has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub item: String,
    /// Whether this update belongs to the initial snapshot.
    pub snapshot: bool,
    fields: Vec<(String, Option<String>)>,
}

impl ItemUpdate {
    #[must_use]
    pub fn new(item: impl Into<String>, snapshot: bool, fields: Vec<(String, Option<String>)>) -> Self {
        Self {
            item: item.into(),
            snapshot,
            fields,
        }
    }

    /// Value of a named field; `None` when the field is unknown or null.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .and_then(|(_, value)| value.as_deref())
    }
}

/// Events emitted by a feed session.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Transport status, e.g. `CONNECTING`, `CONNECTED:WS-STREAMING`, `DISCONNECTED`.
    StatusChanged(String),
    /// Subscription accepted by the server.
    Subscribed { items: usize, fields: usize },
    /// A value frame (snapshot or live change).
    Update(ItemUpdate),
    EndOfSnapshot { item: String },
    ClearSnapshot { item: String },
    Unsubscribed,
    SubscriptionError { code: i32, message: String },
    ServerError { code: i32, message: String },
}

/// One live push-streaming session.
#[async_trait]
pub trait TelemetryFeed: Send {
    /// Open the session. Returns once the server has accepted it; the
    /// resulting status changes are delivered through [`next_event`](Self::next_event).
    async fn connect(&mut self) -> Result<()>;

    /// Subscribe to one item on the open session.
    async fn subscribe(&mut self, request: &SubscriptionRequest) -> Result<()>;

    /// Next event, or `None` once the session has ended.
    async fn next_event(&mut self) -> Option<FeedEvent>;

    /// Close the session. Safe to call on a closed session.
    async fn close(&mut self);
}
