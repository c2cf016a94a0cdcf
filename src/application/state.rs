//! Shared telemetry state.
//!
//! The feed supervisor is the only writer: it owns the [`TelemetryTracker`]
//! and publishes immutable [`TelemetrySnapshot`]s over a `watch` channel.
//! Command handlers and the notifier read through cloned
//! [`TelemetryHandle`]s and never observe a half-applied update.

use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::domain::{ConnectionStatus, TankReading};
use crate::port::{FeedEvent, ItemUpdate};

/// Field carrying the tank level.
pub const VALUE_FIELD: &str = "Value";
/// Field carrying the feed-side sample time.
pub const TIMESTAMP_FIELD: &str = "TimeStamp";
/// Field carrying the telemetry quality class.
pub const STATUS_CLASS_FIELD: &str = "Status.Class";

/// Point-in-time view of the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetrySnapshot {
    /// Latest accepted reading; `None` until the first valid frame.
    pub reading: Option<TankReading>,
    pub connection: ConnectionStatus,
}

impl TelemetrySnapshot {
    /// Latest tank level, `None` meaning "no data yet".
    #[must_use]
    pub fn current_value(&self) -> Option<f64> {
        self.reading.as_ref().map(|reading| reading.level)
    }
}

/// Read side of the telemetry state.
#[derive(Debug, Clone)]
pub struct TelemetryHandle {
    receiver: watch::Receiver<TelemetrySnapshot>,
}

impl TelemetryHandle {
    #[must_use]
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.receiver.borrow().clone()
    }

    #[must_use]
    pub fn current_value(&self) -> Option<f64> {
        self.receiver.borrow().current_value()
    }

    #[must_use]
    pub fn connection(&self) -> ConnectionStatus {
        self.receiver.borrow().connection
    }

    /// Wait until a value is available or `limit` elapses.
    pub async fn wait_for_value(&mut self, limit: Duration) -> Option<f64> {
        let wait = async {
            loop {
                if let Some(value) = self.receiver.borrow_and_update().current_value() {
                    return Some(value);
                }
                if self.receiver.changed().await.is_err() {
                    return None;
                }
            }
        };
        tokio::time::timeout(limit, wait).await.ok().flatten()
    }
}

/// Write side of the telemetry state; applies feed events.
#[derive(Debug)]
pub struct TelemetryTracker {
    item: String,
    sender: watch::Sender<TelemetrySnapshot>,
}

impl TelemetryTracker {
    /// Create a tracker for `item` and the first read handle.
    #[must_use]
    pub fn new(item: impl Into<String>) -> (Self, TelemetryHandle) {
        let (sender, receiver) = watch::channel(TelemetrySnapshot::default());
        let tracker = Self {
            item: item.into(),
            sender,
        };
        (tracker, TelemetryHandle { receiver })
    }

    /// Additional read handle.
    #[must_use]
    pub fn handle(&self) -> TelemetryHandle {
        TelemetryHandle {
            receiver: self.sender.subscribe(),
        }
    }

    #[must_use]
    pub fn connection(&self) -> ConnectionStatus {
        self.sender.borrow().connection
    }

    /// Apply one feed event to the shared state.
    pub fn apply(&self, event: FeedEvent) {
        match event {
            FeedEvent::StatusChanged(status) => self.on_status_change(&status),
            FeedEvent::Update(update) => self.on_update(&update),
            FeedEvent::Subscribed { items, fields } => {
                info!(items, fields, "Subscription successfully established");
            }
            FeedEvent::EndOfSnapshot { item } => info!(item = %item, "End of snapshot"),
            FeedEvent::ClearSnapshot { item } => info!(item = %item, "Snapshot cleared"),
            FeedEvent::Unsubscribed => info!("Subscription closed"),
            FeedEvent::SubscriptionError { code, message } => {
                error!(code, message = %message, "Subscription error");
            }
            FeedEvent::ServerError { code, message } => {
                error!(code, message = %message, "Feed server error");
            }
        }
    }

    fn on_status_change(&self, status: &str) {
        info!(status = %status, "Feed connection status changed");
        let Some(connection) = ConnectionStatus::from_transport(status) else {
            return;
        };
        self.sender.send_if_modified(|snapshot| {
            let changed = snapshot.connection != connection;
            snapshot.connection = connection;
            changed
        });
    }

    fn on_update(&self, update: &ItemUpdate) {
        if update.item != self.item {
            debug!(item = %update.item, "Ignoring update for untracked item");
            return;
        }

        let timestamp = update.value(TIMESTAMP_FIELD).map(str::to_owned);
        let status_class = update.value(STATUS_CLASS_FIELD).map(str::to_owned);

        let Some(raw) = update.value(VALUE_FIELD) else {
            debug!(item = %update.item, "Update carries no value");
            return;
        };

        let level = match parse_level(raw) {
            Ok(level) => level,
            Err(reason) => {
                warn!(raw = %raw, reason, "Dropping frame with unparseable value");
                return;
            }
        };

        let mut reading = TankReading::new(level);
        reading.feed_timestamp = timestamp;
        reading.status_class = status_class;

        if !reading.is_nominal() {
            warn!(
                status_class = reading.status_class.as_deref().unwrap_or_default(),
                "Received update with non-default status"
            );
        }

        info!(
            level,
            timestamp = reading.feed_timestamp.as_deref().unwrap_or_default(),
            snapshot = update.snapshot,
            "Received urine tank update"
        );

        self.sender.send_modify(|snapshot| snapshot.reading = Some(reading));
    }
}

fn parse_level(raw: &str) -> std::result::Result<f64, &'static str> {
    let value: f64 = raw.trim().parse().map_err(|_| "not a number")?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err("not finite")
    }
}
