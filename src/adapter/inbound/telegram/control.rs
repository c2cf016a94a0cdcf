//! Command execution against the shared application state.

use std::sync::Arc;

use tracing::{error, info};

use super::command::{command_help, BotCommand};
use crate::application::{
    message, BroadcastLedger, SubscribeOutcome, SubscriberRegistry, TelemetryHandle,
    UnsubscribeOutcome,
};
use crate::domain::SubscriberId;

/// Executes chat commands. Cheap to clone; all state is shared.
#[derive(Clone)]
pub struct TelegramControl {
    subscribers: Arc<SubscriberRegistry>,
    telemetry: TelemetryHandle,
    ledger: Arc<BroadcastLedger>,
}

impl TelegramControl {
    #[must_use]
    pub fn new(
        subscribers: Arc<SubscriberRegistry>,
        telemetry: TelemetryHandle,
        ledger: Arc<BroadcastLedger>,
    ) -> Self {
        Self {
            subscribers,
            telemetry,
            ledger,
        }
    }

    /// Run `command` for `chat` and return the reply text.
    pub fn execute(&self, command: BotCommand, chat: SubscriberId) -> String {
        info!(chat_id = chat.get(), ?command, "Handling command");
        match command {
            BotCommand::Start => self.start(chat),
            BotCommand::Stop => self.stop(chat),
            BotCommand::Status => message::status(&self.telemetry.snapshot()),
            BotCommand::Test => {
                message::diagnostic(&self.telemetry.snapshot(), Some(self.ledger.last()))
            }
            BotCommand::Help => command_help().to_string(),
        }
    }

    fn start(&self, chat: SubscriberId) -> String {
        match self.subscribers.subscribe(chat) {
            Ok(SubscribeOutcome::Added) => message::WELCOME.to_string(),
            Ok(SubscribeOutcome::AlreadySubscribed) => message::ALREADY_SUBSCRIBED.to_string(),
            Err(e) => {
                error!(chat_id = chat.get(), error = %e, "Failed to persist subscription");
                message::SUBSCRIPTION_UNAVAILABLE.to_string()
            }
        }
    }

    fn stop(&self, chat: SubscriberId) -> String {
        match self.subscribers.unsubscribe(chat) {
            Ok(UnsubscribeOutcome::Removed) => message::UNSUBSCRIBED.to_string(),
            Ok(UnsubscribeOutcome::NotSubscribed) => message::NOT_SUBSCRIBED.to_string(),
            Err(e) => {
                error!(chat_id = chat.get(), error = %e, "Failed to persist unsubscription");
                message::SUBSCRIPTION_UNAVAILABLE.to_string()
            }
        }
    }
}
