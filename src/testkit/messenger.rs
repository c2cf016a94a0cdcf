//! Recording [`Messenger`] for notification assertions.

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::SubscriberId;
use crate::error::{Error, Result};
use crate::port::Messenger;

/// Thread-safe message collector. Sends to ids marked failing return an
/// error and are not recorded.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(SubscriberId, String)>>,
    failing: Mutex<HashSet<SubscriberId>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_for(&self, id: SubscriberId) {
        self.failing.lock().insert(id);
    }

    /// Successfully sent messages, in send order.
    pub fn sent(&self) -> Vec<(SubscriberId, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send(&self, to: SubscriberId, text: &str) -> Result<()> {
        if self.failing.lock().contains(&to) {
            return Err(Error::Connection(format!("chat {to} unreachable")));
        }
        self.sent.lock().push((to, text.to_string()));
        Ok(())
    }
}
