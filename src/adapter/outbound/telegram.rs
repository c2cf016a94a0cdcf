//! Telegram delivery of outbound messages.

use async_trait::async_trait;
use teloxide::prelude::*;

use crate::domain::SubscriberId;
use crate::error::Result;
use crate::port::Messenger;

/// Sends plain-text messages through the Bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, to: SubscriberId, text: &str) -> Result<()> {
        self.bot.send_message(ChatId(to.get()), text).await?;
        Ok(())
    }
}
