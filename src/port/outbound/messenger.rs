//! Outbound chat delivery port.

use async_trait::async_trait;

use crate::domain::SubscriberId;
use crate::error::Result;

/// Sends a plain text message to one chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, to: SubscriberId, text: &str) -> Result<()>;
}
