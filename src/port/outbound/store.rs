//! Persistence port for the subscriber set.

use std::collections::HashSet;

use crate::domain::SubscriberId;
use crate::error::Result;

/// Storage for the set of chat ids that want notifications.
///
/// Implementations replace the full content on every `save`.
pub trait SubscriberStore: Send + Sync {
    /// Load the persisted set. A missing backing resource is an empty set.
    fn load(&self) -> Result<HashSet<SubscriberId>>;

    /// Overwrite the persisted set.
    fn save(&self, subscribers: &HashSet<SubscriberId>) -> Result<()>;
}
