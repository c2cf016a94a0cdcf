//! In-memory [`SubscriberStore`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::domain::SubscriberId;
use crate::error::{Error, Result, StoreError};
use crate::port::SubscriberStore;

#[derive(Default)]
pub struct MemoryStore {
    contents: Mutex<HashSet<SubscriberId>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn with(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            contents: Mutex::new(ids.into_iter().map(SubscriberId::new).collect()),
            ..Self::default()
        }
    }

    pub fn contents(&self) -> HashSet<SubscriberId> {
        self.contents.lock().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

impl SubscriberStore for MemoryStore {
    fn load(&self) -> Result<HashSet<SubscriberId>> {
        Ok(self.contents.lock().clone())
    }

    fn save(&self, subscribers: &HashSet<SubscriberId>) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Store(StoreError::Write(std::io::Error::other(
                "disk full",
            ))));
        }
        *self.contents.lock() = subscribers.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
