//! Handler for the `run` command.

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::runtime;

/// Execute the run command.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(args.config.as_ref())?;
    config.require_token()?;

    if !output::is_quiet() || output::is_json() {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Feed", &config.feed.url);
        output::field("Item", &config.feed.item);
        output::field("Subscribers", config.storage.subscribers_file.display());
        output::field(
            "Interval",
            format!("{}s", config.telegram.check_interval_secs),
        );
        output::field(
            "Threshold",
            format!("{}%", config.telegram.min_change_threshold),
        );
    }

    config.init_logging();
    runtime::run(config).await
}
