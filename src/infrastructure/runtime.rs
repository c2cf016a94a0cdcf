//! Runtime lifecycle: wires the services and runs them until shutdown.

use std::sync::Arc;

use teloxide::Bot;
use tokio::sync::watch;
use tracing::info;

use crate::adapter::inbound::telegram::{run_listener, TelegramControl};
use crate::adapter::outbound::file::FileSubscriberStore;
use crate::adapter::outbound::lightstreamer::{LightstreamerFeed, LightstreamerSettings};
use crate::adapter::outbound::telegram::TelegramMessenger;
use crate::application::{BroadcastLedger, LevelNotifier, SubscriberRegistry, TelemetryTracker};
use crate::error::Result;
use crate::infrastructure::config::feed::FeedConfig;
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::feed::FeedSupervisor;
use crate::infrastructure::shutdown::wait_for_shutdown;
use crate::port::{Messenger, SubscriberStore};

/// Run until Ctrl+C.
pub async fn run(config: Config) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received");
        }
        let _ = shutdown_tx.send(true);
    });
    run_with_shutdown(config, shutdown_rx).await
}

/// Build the Lightstreamer adapter for `config`.
#[must_use]
pub fn build_feed(config: &FeedConfig) -> LightstreamerFeed {
    LightstreamerFeed::new(LightstreamerSettings {
        url: config.url.clone(),
        adapter_set: config.adapter_set.clone(),
        client_id: config.client_id.clone(),
    })
}

/// Run with externally controlled shutdown signal.
///
/// # Errors
///
/// Fails fast when the bot token is missing or the subscriber file cannot
/// be loaded; later returns the feed supervisor's permanent error, if any.
pub async fn run_with_shutdown(config: Config, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    let token = config.require_token()?.to_owned();
    info!(
        interval_secs = config.telegram.check_interval_secs,
        threshold = config.telegram.min_change_threshold,
        subscribers_file = %config.storage.subscribers_file.display(),
        "Starting tankwatch"
    );

    let store: Arc<dyn SubscriberStore> =
        Arc::new(FileSubscriberStore::new(config.storage.subscribers_file.clone()));
    let registry = Arc::new(SubscriberRegistry::load(store)?);

    let (tracker, telemetry) = TelemetryTracker::new(config.feed.item.clone());
    let ledger = Arc::new(BroadcastLedger::default());

    let bot = Bot::new(token);
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(bot.clone()));

    let notifier = LevelNotifier::new(
        telemetry.clone(),
        Arc::clone(&registry),
        messenger,
        Arc::clone(&ledger),
        config.telegram.min_change_threshold,
    );
    let control = TelegramControl::new(registry, telemetry, ledger);
    let supervisor = FeedSupervisor::new(build_feed(&config.feed), tracker, &config.feed);

    let (stop_tx, stop_rx) = watch::channel(false);
    let feed_task = async {
        let result = supervisor.run(stop_rx.clone()).await;
        if result.is_err() {
            let _ = stop_tx.send(true);
        }
        result
    };
    let services = async {
        tokio::join!(
            feed_task,
            notifier.run(config.telegram.check_interval(), stop_rx.clone()),
            run_listener(bot, control, stop_rx.clone()),
        )
    };
    tokio::pin!(services);

    tokio::select! {
        (feed_result, (), ()) = &mut services => return feed_result,
        () = wait_for_shutdown(&mut shutdown) => {
            info!("Shutdown signal received");
            let _ = stop_tx.send(true);
        }
    }

    let (feed_result, (), ()) = services.await;
    info!("tankwatch stopped");
    feed_result
}
