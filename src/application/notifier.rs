//! Periodic level notifier.
//!
//! Every tick compares the tracked level against the level of the last
//! broadcast and, when the change meets the threshold, fans a message out to
//! every subscriber. Delivery failures are isolated per subscriber and never
//! stop the ledger from advancing.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::application::message;
use crate::application::state::TelemetryHandle;
use crate::application::subscription::SubscriberRegistry;
use crate::domain::LevelChange;
use crate::port::Messenger;

/// Delay before the first tick after start.
pub const FIRST_TICK_DELAY: Duration = Duration::from_secs(1);

/// Level recorded at the last sent notification.
#[derive(Debug, Default)]
pub struct BroadcastLedger {
    last: RwLock<f64>,
}

impl BroadcastLedger {
    #[must_use]
    pub fn new(initial: f64) -> Self {
        Self {
            last: RwLock::new(initial),
        }
    }

    #[must_use]
    pub fn last(&self) -> f64 {
        *self.last.read()
    }

    fn record(&self, level: f64) {
        *self.last.write() = level;
    }
}

/// What a single tick decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No level received yet.
    NoData,
    /// Change too small to broadcast.
    BelowThreshold { delta: f64 },
    /// Notification sent; the ledger now holds the current level.
    Broadcast {
        delta: f64,
        delivered: usize,
        failed: usize,
    },
}

pub struct LevelNotifier {
    telemetry: TelemetryHandle,
    subscribers: Arc<SubscriberRegistry>,
    messenger: Arc<dyn Messenger>,
    ledger: Arc<BroadcastLedger>,
    threshold: f64,
}

impl LevelNotifier {
    #[must_use]
    pub fn new(
        telemetry: TelemetryHandle,
        subscribers: Arc<SubscriberRegistry>,
        messenger: Arc<dyn Messenger>,
        ledger: Arc<BroadcastLedger>,
        threshold: f64,
    ) -> Self {
        Self {
            telemetry,
            subscribers,
            messenger,
            ledger,
            threshold,
        }
    }

    /// Run one comparison and broadcast if needed.
    pub async fn tick(&self) -> TickOutcome {
        let Some(current) = self.telemetry.current_value() else {
            debug!("Skipping tick, no level available yet");
            return TickOutcome::NoData;
        };

        let change = LevelChange::new(self.ledger.last(), current);
        if !change.meets(self.threshold) {
            return TickOutcome::BelowThreshold {
                delta: change.delta(),
            };
        }

        let text = message::level_update(&change);
        let recipients = self.subscribers.list();
        info!(
            subscribers = recipients.len(),
            previous = change.previous,
            current = change.current,
            "Sending level update"
        );

        let mut delivered = 0;
        let mut failed = 0;
        for chat_id in recipients {
            match self.messenger.send(chat_id, &text).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    failed += 1;
                    error!(chat_id = chat_id.get(), error = %e, "Failed to send level update");
                }
            }
        }

        self.ledger.record(current);

        TickOutcome::Broadcast {
            delta: change.delta(),
            delivered,
            failed,
        }
    }

    /// Tick every `period` until shutdown is signalled.
    pub async fn run(self, period: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = interval_at(Instant::now() + FIRST_TICK_DELAY, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            period_secs = period.as_secs(),
            threshold = self.threshold,
            "Level notifier started"
        );

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let outcome = self.tick().await;
                    debug!(?outcome, "Notifier tick");
                }
            }
        }

        info!("Level notifier stopped");
    }
}
