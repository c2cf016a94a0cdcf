use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::{Config, TOKEN_VAR};

/// Validate configuration without starting the bot.
pub fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(args.config.as_ref())?;

    output::section("Configuration Check");
    match &args.config {
        Some(path) => output::field("Config", path.display()),
        None => output::field("Config", "defaults"),
    }
    output::success("Configuration is valid");

    output::section("Summary");
    output::field("Feed", &config.feed.url);
    output::field("Adapter set", &config.feed.adapter_set);
    output::field("Item", &config.feed.item);
    output::field("Fields", config.feed.fields.join(", "));
    output::field(
        "Timeout",
        format!("{}s", config.feed.connect_timeout_secs),
    );
    output::field(
        "Interval",
        format!("{}s", config.telegram.check_interval_secs),
    );
    output::field(
        "Threshold",
        format!("{}%", config.telegram.min_change_threshold),
    );
    output::field("Subscribers", config.storage.subscribers_file.display());

    if config.telegram.token.is_some() {
        output::success("Telegram token detected");
    } else {
        output::warning(&format!("Telegram token not configured (set {TOKEN_VAR} to run)"));
    }

    output::success("Configuration check complete");
    Ok(())
}
