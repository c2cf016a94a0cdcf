//! Keeps one feed session alive and applies its events.
//!
//! The supervisor owns the [`TelemetryTracker`], making it the only writer
//! of telemetry state. Each attempt must reach a connected, subscribed
//! session within the connect timeout; failed attempts and dropped sessions
//! are retried with exponential backoff until shutdown.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use super::backoff::Backoff;
use crate::application::TelemetryTracker;
use crate::error::{Error, Result};
use crate::infrastructure::config::feed::FeedConfig;
use crate::infrastructure::shutdown::wait_for_shutdown;
use crate::port::{FeedEvent, SubscriptionRequest, TelemetryFeed};

const DISCONNECTED: &str = "DISCONNECTED";

/// How a session ended.
enum SessionEnd {
    Dropped,
    Shutdown,
}

pub struct FeedSupervisor<F: TelemetryFeed> {
    feed: F,
    tracker: TelemetryTracker,
    subscription: SubscriptionRequest,
    connect_timeout: Duration,
    backoff: Backoff,
}

impl<F: TelemetryFeed> FeedSupervisor<F> {
    #[must_use]
    pub fn new(feed: F, tracker: TelemetryTracker, config: &FeedConfig) -> Self {
        Self {
            feed,
            tracker,
            subscription: config.subscription(),
            connect_timeout: config.connect_timeout(),
            backoff: Backoff::new(config.reconnection.clone()),
        }
    }

    /// Connect and subscribe, bounded by the connect timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectTimeout`] when the session is not ready in
    /// time, or the feed's own error.
    pub async fn establish(&mut self) -> Result<()> {
        let limit = self.connect_timeout;
        let attempt = async {
            self.feed.connect().await?;
            self.feed.subscribe(&self.subscription).await
        };

        match timeout(limit, attempt).await {
            Ok(result) => result,
            Err(_) => Err(Error::ConnectTimeout {
                secs: limit.as_secs(),
            }),
        }
    }

    /// Run sessions until shutdown is signalled.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!(
            item = %self.subscription.item,
            timeout_secs = self.connect_timeout.as_secs(),
            "Feed supervisor started"
        );

        let result = loop {
            let established = tokio::select! {
                result = self.establish() => result,
                () = wait_for_shutdown(&mut shutdown) => break Ok(()),
            };

            match established {
                Ok(()) => {
                    self.backoff.reset();
                    if let SessionEnd::Shutdown = self.pump(&mut shutdown).await {
                        break Ok(());
                    }
                    warn!("Feed session ended, reconnecting");
                }
                Err(e) if e.is_retryable() => {
                    warn!(
                        error = %e,
                        attempt = self.backoff.consecutive_failures() + 1,
                        "Feed connection attempt failed"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Feed connection failed permanently");
                    break Err(e);
                }
            }

            self.feed.close().await;
            self.mark_disconnected();

            let delay = self.backoff.next_delay();
            info!(delay_ms = delay.as_millis() as u64, "Reconnecting after delay");
            tokio::select! {
                () = sleep(delay) => {}
                () = wait_for_shutdown(&mut shutdown) => break Ok(()),
            }
        };

        self.feed.close().await;
        self.mark_disconnected();
        info!("Feed supervisor stopped");
        result
    }

    /// Apply events until the session ends or shutdown is signalled.
    async fn pump(&mut self, shutdown: &mut watch::Receiver<bool>) -> SessionEnd {
        loop {
            tokio::select! {
                event = self.feed.next_event() => match event {
                    Some(event) => self.tracker.apply(event),
                    None => return SessionEnd::Dropped,
                },
                () = wait_for_shutdown(shutdown) => return SessionEnd::Shutdown,
            }
        }
    }

    fn mark_disconnected(&self) {
        if self.tracker.connection().is_connected() {
            self.tracker
                .apply(FeedEvent::StatusChanged(DISCONNECTED.into()));
        }
    }
}
