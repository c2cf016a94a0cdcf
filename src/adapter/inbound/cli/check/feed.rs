//! Live feed check: connect, wait for the first level, disconnect.

use tokio::sync::watch;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::application::TelemetryTracker;
use crate::error::{Error, Result};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::feed::FeedSupervisor;
use crate::infrastructure::runtime::build_feed;

/// Connect to the telemetry feed and print the first tank level.
pub async fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(args.config.as_ref())?;
    let limit = config.feed.connect_timeout();

    output::section("Feed Check");
    output::field("Feed", &config.feed.url);
    output::field("Item", &config.feed.item);
    output::action("Connecting", &config.feed.adapter_set);

    let (tracker, mut telemetry) = TelemetryTracker::new(config.feed.item.clone());
    let supervisor = FeedSupervisor::new(build_feed(&config.feed), tracker, &config.feed);
    let (stop_tx, stop_rx) = watch::channel(false);
    let task = tokio::spawn(supervisor.run(stop_rx));

    let level = telemetry.wait_for_value(limit).await;
    let connection = telemetry.connection();

    let _ = stop_tx.send(true);
    if let Ok(Err(e)) = task.await {
        output::error(&e.to_string());
    }

    output::field("Connection", connection);
    match level {
        Some(level) => {
            output::field("Level", format!("{level:.1}%"));
            output::success("Feed check complete");
            Ok(())
        }
        None => {
            output::hint("check network access to the feed endpoint");
            Err(Error::ConnectTimeout {
                secs: limit.as_secs(),
            })
        }
    }
}
