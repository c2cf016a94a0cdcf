//! Subscriber registry.
//!
//! Keeps the in-memory subscriber set and its persisted copy in step. Each
//! mutation runs load-mutate-save under one lock, and the in-memory set is
//! only committed after the store accepted the new content.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

use crate::domain::SubscriberId;
use crate::error::Result;
use crate::port::SubscriberStore;

/// Result of a subscribe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Added,
    AlreadySubscribed,
}

/// Result of an unsubscribe request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsubscribeOutcome {
    Removed,
    NotSubscribed,
}

/// Subscriber set backed by a [`SubscriberStore`].
///
/// Mutations save while holding the lock so writes never interleave. Saves
/// are blocking file writes; async callers run commands on the blocking pool.
pub struct SubscriberRegistry {
    store: Arc<dyn SubscriberStore>,
    subscribers: Mutex<HashSet<SubscriberId>>,
}

impl SubscriberRegistry {
    /// Build the registry from the store's current content.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read or parsed.
    pub fn load(store: Arc<dyn SubscriberStore>) -> Result<Self> {
        let subscribers = store.load()?;
        info!(subscribers = subscribers.len(), "Loaded subscribers");
        Ok(Self {
            store,
            subscribers: Mutex::new(subscribers),
        })
    }

    /// Add a subscriber and persist the set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write; the set is unchanged.
    pub fn subscribe(&self, id: SubscriberId) -> Result<SubscribeOutcome> {
        let mut subscribers = self.subscribers.lock();
        if subscribers.contains(&id) {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }

        let mut next = subscribers.clone();
        next.insert(id);
        self.store.save(&next)?;
        *subscribers = next;

        info!(chat_id = id.get(), total = subscribers.len(), "Subscriber added");
        Ok(SubscribeOutcome::Added)
    }

    /// Remove a subscriber and persist the set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store rejects the write; the set is unchanged.
    pub fn unsubscribe(&self, id: SubscriberId) -> Result<UnsubscribeOutcome> {
        let mut subscribers = self.subscribers.lock();
        if !subscribers.contains(&id) {
            return Ok(UnsubscribeOutcome::NotSubscribed);
        }

        let mut next = subscribers.clone();
        next.remove(&id);
        self.store.save(&next)?;
        *subscribers = next;

        info!(chat_id = id.get(), total = subscribers.len(), "Subscriber removed");
        Ok(UnsubscribeOutcome::Removed)
    }

    #[must_use]
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().contains(&id)
    }

    /// Current subscribers in ascending id order.
    #[must_use]
    pub fn list(&self) -> Vec<SubscriberId> {
        let mut ids: Vec<_> = self.subscribers.lock().iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::store::MemoryStore;

    fn registry(store: &Arc<MemoryStore>) -> SubscriberRegistry {
        SubscriberRegistry::load(Arc::clone(store) as Arc<dyn SubscriberStore>).unwrap()
    }

    #[test]
    fn subscribe_persists() {
        let store = Arc::new(MemoryStore::default());
        let registry = registry(&store);

        let outcome = registry.subscribe(SubscriberId::new(111)).unwrap();

        assert_eq!(outcome, SubscribeOutcome::Added);
        assert!(store.contents().contains(&SubscriberId::new(111)));
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn subscribe_twice_is_idempotent() {
        let store = Arc::new(MemoryStore::default());
        let registry = registry(&store);

        registry.subscribe(SubscriberId::new(7)).unwrap();
        let outcome = registry.subscribe(SubscriberId::new(7)).unwrap();

        assert_eq!(outcome, SubscribeOutcome::AlreadySubscribed);
        assert_eq!(registry.len(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn unsubscribe_absent_is_idempotent() {
        let store = Arc::new(MemoryStore::default());
        let registry = registry(&store);

        let outcome = registry.unsubscribe(SubscriberId::new(9)).unwrap();

        assert_eq!(outcome, UnsubscribeOutcome::NotSubscribed);
        assert!(registry.is_empty());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn unsubscribe_removes_and_persists() {
        let store = Arc::new(MemoryStore::with([1, 2, 3]));
        let registry = registry(&store);

        let outcome = registry.unsubscribe(SubscriberId::new(2)).unwrap();

        assert_eq!(outcome, UnsubscribeOutcome::Removed);
        assert_eq!(registry.list(), vec![SubscriberId::new(1), SubscriberId::new(3)]);
        assert_eq!(store.contents().len(), 2);
    }

    #[test]
    fn failed_save_leaves_set_unchanged() {
        let store = Arc::new(MemoryStore::default());
        let registry = registry(&store);
        store.fail_saves(true);

        assert!(registry.subscribe(SubscriberId::new(5)).is_err());
        assert!(!registry.contains(SubscriberId::new(5)));
    }

    #[test]
    fn persisted_set_tracks_memory_after_any_sequence() {
        let store = Arc::new(MemoryStore::default());
        let registry = registry(&store);

        for id in [1, 2, 3, 2, 4] {
            registry.subscribe(SubscriberId::new(id)).unwrap();
        }
        for id in [3, 9, 1] {
            registry.unsubscribe(SubscriberId::new(id)).unwrap();
        }

        let persisted: Vec<_> = {
            let mut ids: Vec<_> = store.contents().into_iter().collect();
            ids.sort_unstable();
            ids
        };
        assert_eq!(persisted, registry.list());
    }
}
