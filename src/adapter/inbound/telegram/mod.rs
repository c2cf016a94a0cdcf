//! Telegram chat command surface.
//!
//! Parses `/start`, `/stop`, `/status`, `/test` and `/help` and replies in
//! the originating chat.

mod command;
mod control;
mod listener;
mod router;

pub use command::{bot_commands, command_help, parse_command, BotCommand, CommandParseError};
pub use control::TelegramControl;
pub use listener::{register_bot_commands, run_listener};
pub use router::command_response_for_message;
