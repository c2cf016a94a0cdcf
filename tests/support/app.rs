//! Application wiring over test doubles and a real subscriber file.

use std::path::PathBuf;
use std::sync::Arc;

use tankwatch::adapter::inbound::telegram::TelegramControl;
use tankwatch::adapter::outbound::file::FileSubscriberStore;
use tankwatch::application::{
    BroadcastLedger, LevelNotifier, SubscriberRegistry, TelemetryHandle, TelemetryTracker,
};
use tankwatch::port::{Messenger, SubscriberStore};
use tankwatch::testkit::messenger::RecordingMessenger;
use tempfile::TempDir;

pub const ITEM: &str = "NODE3000005";

/// Everything the bot wires together, minus the network.
pub struct TestApp {
    pub dir: TempDir,
    pub subscribers_file: PathBuf,
    pub registry: Arc<SubscriberRegistry>,
    pub telemetry: TelemetryHandle,
    pub ledger: Arc<BroadcastLedger>,
    pub messenger: Arc<RecordingMessenger>,
    pub control: TelegramControl,
    pub notifier: LevelNotifier,
    /// Taken by tests that hand it to a feed supervisor.
    pub tracker: Option<TelemetryTracker>,
}

impl TestApp {
    pub fn new(threshold: f64) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let subscribers_file = dir.path().join("data").join("subscribers.txt");
        Self::with_file(dir, subscribers_file, threshold)
    }

    pub fn with_file(dir: TempDir, subscribers_file: PathBuf, threshold: f64) -> Self {
        let store: Arc<dyn SubscriberStore> =
            Arc::new(FileSubscriberStore::new(subscribers_file.clone()));
        let registry = Arc::new(SubscriberRegistry::load(store).expect("load subscribers"));
        let (tracker, telemetry) = TelemetryTracker::new(ITEM);
        let ledger = Arc::new(BroadcastLedger::default());
        let messenger = Arc::new(RecordingMessenger::new());

        let notifier = LevelNotifier::new(
            telemetry.clone(),
            Arc::clone(&registry),
            Arc::clone(&messenger) as Arc<dyn Messenger>,
            Arc::clone(&ledger),
            threshold,
        );
        let control =
            TelegramControl::new(Arc::clone(&registry), telemetry.clone(), Arc::clone(&ledger));

        Self {
            dir,
            subscribers_file,
            registry,
            telemetry,
            ledger,
            messenger,
            control,
            notifier,
            tracker: Some(tracker),
        }
    }

    pub fn tracker(&self) -> &TelemetryTracker {
        self.tracker.as_ref().expect("tracker already taken")
    }
}
