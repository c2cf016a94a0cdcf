//! Long-polling listener for chat commands.

use teloxide::prelude::*;
use teloxide::types::BotCommand as MenuCommand;
use tokio::sync::watch;
use tracing::{error, info, warn};

use super::command::bot_commands;
use super::control::TelegramControl;
use super::router::command_response_for_message;
use crate::domain::SubscriberId;
use crate::infrastructure::shutdown::{drain_on_shutdown, Drained};

/// Receive chat messages and reply to commands until shutdown is signalled.
pub async fn run_listener(bot: Bot, control: TelegramControl, mut shutdown: watch::Receiver<bool>) {
    // Register commands with Telegram so they appear in the "/" menu
    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    let handler = Update::filter_message().endpoint(handle_message);
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![control])
        .default_handler(|_| async {})
        .build();

    info!("Telegram command listener started");

    let token = dispatcher.shutdown_token();
    let stop = || match token.shutdown() {
        Ok(stopping) => {
            info!("Waiting for in-flight command replies");
            Some(stopping)
        }
        Err(_) => None,
    };

    match drain_on_shutdown(dispatcher.dispatch(), stop, &mut shutdown).await {
        Drained::Finished => warn!("Telegram dispatcher exited"),
        Drained::Stopped => info!("Telegram command listener stopped"),
    }
}

async fn handle_message(bot: Bot, msg: Message, control: TelegramControl) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat = SubscriberId::new(msg.chat.id.0);
    let text = text.to_owned();
    // /start and /stop write the subscriber file.
    let response = match tokio::task::spawn_blocking(move || {
        command_response_for_message(&text, chat, &control)
    })
    .await
    {
        Ok(response) => response,
        Err(e) => {
            error!(chat_id = chat.get(), error = %e, "Command handler failed");
            return Ok(());
        }
    };

    if let Some(response) = response {
        if let Err(e) = bot.send_message(msg.chat.id, response).await {
            error!(chat_id = chat.get(), error = %e, "Failed to send command response");
        }
    }

    Ok(())
}

/// Register bot commands with Telegram for the "/" menu.
pub async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<MenuCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| MenuCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
