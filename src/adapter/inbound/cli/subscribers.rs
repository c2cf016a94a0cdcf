//! Handler for the `subscribers` command.

use serde_json::json;

use crate::adapter::inbound::cli::command::ConfigPathArg;
use crate::adapter::inbound::cli::output;
use crate::adapter::outbound::file::FileSubscriberStore;
use crate::domain::SubscriberId;
use crate::error::Result;
use crate::infrastructure::config::settings::Config;
use crate::port::SubscriberStore;

/// Print persisted subscriber ids in ascending order.
pub fn execute(args: &ConfigPathArg) -> Result<()> {
    let config = Config::load(args.config.as_ref())?;
    let store = FileSubscriberStore::new(config.storage.subscribers_file.clone());

    let mut ids: Vec<SubscriberId> = store.load()?.into_iter().collect();
    ids.sort_unstable();

    if output::is_json() {
        output::json_output(json!({
            "file": store.path().display().to_string(),
            "subscribers": ids,
        }));
        return Ok(());
    }

    output::section("Subscribers");
    output::field("File", store.path().display());
    output::field("Count", ids.len());
    for id in &ids {
        println!("  {id}");
    }
    Ok(())
}
