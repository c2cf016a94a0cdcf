//! Chat command parsing.

/// Supported chat commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Stop,
    Status,
    Test,
    Help,
}

/// Parse error for chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandParseError {
    NotACommand,
    UnknownCommand(String),
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "message is not a command"),
            Self::UnknownCommand(cmd) => write!(f, "unknown command `{cmd}`"),
        }
    }
}

impl std::error::Error for CommandParseError {}

/// Parse a chat message into a bot command.
///
/// Trailing arguments are ignored and a `@botname` suffix is accepted.
pub fn parse_command(text: &str) -> Result<BotCommand, CommandParseError> {
    let Some(raw_command) = text.split_whitespace().next() else {
        return Err(CommandParseError::NotACommand);
    };
    if !raw_command.starts_with('/') {
        return Err(CommandParseError::NotACommand);
    }

    let command = raw_command
        .split_once('@')
        .map_or(raw_command, |(head, _)| head);

    match command {
        "/start" => Ok(BotCommand::Start),
        "/stop" => Ok(BotCommand::Stop),
        "/status" => Ok(BotCommand::Status),
        "/test" => Ok(BotCommand::Test),
        "/help" => Ok(BotCommand::Help),
        other => Err(CommandParseError::UnknownCommand(other.to_string())),
    }
}

/// Help text returned by `/help` and after an unknown command.
#[must_use]
pub const fn command_help() -> &'static str {
    "📋 Commands\n\n\
    /start - 🚀 Subscribe to tank level updates\n\
    /stop - 🔕 Unsubscribe\n\
    /status - 📊 Connection status and current level\n\
    /test - 🔍 Feed diagnostics\n\
    /help - 📋 Show all commands"
}

/// Bot commands for Telegram menu registration.
///
/// Returns tuples of (command, description) for `set_my_commands`.
#[must_use]
pub fn bot_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        ("start", "Subscribe to tank level updates"),
        ("stop", "Unsubscribe from updates"),
        ("status", "Connection status and current level"),
        ("test", "Feed diagnostics"),
        ("help", "Show all commands"),
    ]
}
