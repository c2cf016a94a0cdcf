//! Mock [`TelemetryFeed`] for testing.
//!
//! [`ScriptedFeed`] pops pre-loaded connect/subscribe results and sessions.
//! Each successful `connect()` starts the next scripted session; a session's
//! events are delivered in order and the session ends (`None`) when they run
//! out, unless the feed is marked idle, in which case it stays open forever.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::port::{FeedEvent, ItemUpdate, SubscriptionRequest, TelemetryFeed};

/// Connection behaviour for one `connect()` call.
pub enum ConnectScript {
    /// Resolve with this result.
    Outcome(Result<()>),
    /// Never resolve (simulates a server that never confirms the session).
    Hang,
}

pub struct ScriptedFeed {
    connects: VecDeque<ConnectScript>,
    subscribe_results: VecDeque<Result<()>>,
    sessions: VecDeque<Vec<FeedEvent>>,
    current: VecDeque<FeedEvent>,
    idle_when_drained: bool,
    connect_count: Arc<AtomicU32>,
    subscribe_count: Arc<AtomicU32>,
    close_count: Arc<AtomicU32>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self {
            connects: VecDeque::new(),
            subscribe_results: VecDeque::new(),
            sessions: VecDeque::new(),
            current: VecDeque::new(),
            idle_when_drained: false,
            connect_count: Arc::new(AtomicU32::new(0)),
            subscribe_count: Arc::new(AtomicU32::new(0)),
            close_count: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn with_connects(mut self, connects: Vec<ConnectScript>) -> Self {
        self.connects = connects.into();
        self
    }

    pub fn with_subscribe_results(mut self, results: Vec<Result<()>>) -> Self {
        self.subscribe_results = results.into();
        self
    }

    /// Add one session's events, delivered after the next successful connect.
    pub fn with_session(mut self, events: Vec<FeedEvent>) -> Self {
        self.sessions.push_back(events);
        self
    }

    /// Keep the last session open once its events are drained.
    pub fn idle_when_drained(mut self) -> Self {
        self.idle_when_drained = true;
        self
    }

    /// Shared counters for asserting connect/subscribe/close call counts.
    pub fn counts(&self) -> (Arc<AtomicU32>, Arc<AtomicU32>, Arc<AtomicU32>) {
        (
            Arc::clone(&self.connect_count),
            Arc::clone(&self.subscribe_count),
            Arc::clone(&self.close_count),
        )
    }
}

impl Default for ScriptedFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetryFeed for ScriptedFeed {
    async fn connect(&mut self) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        match self.connects.pop_front().unwrap_or(ConnectScript::Outcome(Ok(()))) {
            ConnectScript::Hang => std::future::pending().await,
            ConnectScript::Outcome(result) => {
                result?;
                let mut session: VecDeque<_> = self.sessions.pop_front().unwrap_or_default().into();
                session.push_front(FeedEvent::StatusChanged("CONNECTED:WS-STREAMING".into()));
                self.current = session;
                Ok(())
            }
        }
    }

    async fn subscribe(&mut self, _request: &SubscriptionRequest) -> Result<()> {
        self.subscribe_count.fetch_add(1, Ordering::SeqCst);
        self.subscribe_results.pop_front().unwrap_or(Ok(()))
    }

    async fn next_event(&mut self) -> Option<FeedEvent> {
        if let Some(event) = self.current.pop_front() {
            return Some(event);
        }
        if self.idle_when_drained && self.sessions.is_empty() {
            return std::future::pending().await;
        }
        None
    }

    async fn close(&mut self) {
        self.close_count.fetch_add(1, Ordering::SeqCst);
        self.current.clear();
    }
}

/// Build a `Value`-only update event for `item`.
pub fn level_event(item: &str, level: &str) -> FeedEvent {
    FeedEvent::Update(ItemUpdate::new(
        item,
        false,
        vec![("Value".into(), Some(level.into()))],
    ))
}
