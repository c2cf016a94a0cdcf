//! Maps an incoming chat message to a reply.

use super::command::{command_help, parse_command, CommandParseError};
use super::control::TelegramControl;
use crate::domain::SubscriberId;

/// Process a message and return a response if it is a command.
///
/// Returns `None` for messages that are not commands. Unknown commands get
/// an error line followed by the help text.
pub fn command_response_for_message(
    text: &str,
    chat: SubscriberId,
    control: &TelegramControl,
) -> Option<String> {
    match parse_command(text) {
        Ok(command) => Some(control.execute(command, chat)),
        Err(CommandParseError::NotACommand) => None,
        Err(err) => Some(format!("Invalid command: {err}\n\n{}", command_help())),
    }
}
