//! End-to-end flows: chat commands, feed updates and broadcasts.

use std::time::Duration;

use tankwatch::adapter::inbound::telegram::command_response_for_message;
use tankwatch::application::TickOutcome;
use tankwatch::domain::SubscriberId;
use tankwatch::infrastructure::config::feed::FeedConfig;
use tankwatch::infrastructure::feed::FeedSupervisor;
use tankwatch::port::FeedEvent;
use tankwatch::testkit::feed::{level_event, ScriptedFeed};
use tokio::sync::watch;

mod support;
use support::app::{TestApp, ITEM};

fn reply(app: &TestApp, chat: i64, text: &str) -> String {
    command_response_for_message(text, SubscriberId::new(chat), &app.control)
        .expect("command reply")
}

#[tokio::test(start_paused = true)]
async fn start_then_feed_then_status() {
    let mut app = TestApp::new(0.5);

    let welcome = reply(&app, 111, "/start");
    assert!(welcome.starts_with("Welcome to ISS Urine Tank Tracker!"));
    assert_eq!(
        std::fs::read_to_string(&app.subscribers_file).unwrap().trim(),
        "111"
    );

    let feed = ScriptedFeed::new()
        .with_session(vec![level_event(ITEM, "42.0")])
        .idle_when_drained();
    let tracker = app.tracker.take().unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let supervisor = FeedSupervisor::new(feed, tracker, &FeedConfig::default());
    let task = tokio::spawn(supervisor.run(shutdown_rx));

    let mut telemetry = app.telemetry.clone();
    assert_eq!(
        telemetry.wait_for_value(Duration::from_secs(5)).await,
        Some(42.0)
    );

    assert_eq!(
        reply(&app, 111, "/status"),
        "Connection Status: Connected\nCurrent ISS Urine Tank Level: 42.0%"
    );

    shutdown_tx.send(true).unwrap();
    task.await.unwrap().unwrap();

    assert!(reply(&app, 111, "/status").starts_with("Connection Status: Disconnected"));
}

#[tokio::test]
async fn status_before_first_frame() {
    let app = TestApp::new(0.5);
    assert_eq!(
        reply(&app, 1, "/status"),
        "Connection Status: Disconnected\nUnable to fetch current urine tank level."
    );
    let diagnostic = reply(&app, 1, "/test");
    assert!(diagnostic.contains("Current Value: None"));
    assert!(diagnostic.ends_with("Last Sample: None"));
}

#[tokio::test]
async fn broadcast_goes_to_every_subscriber() {
    let app = TestApp::new(0.5);
    reply(&app, 1, "/start");
    reply(&app, 2, "/start");
    reply(&app, 3, "/start");
    reply(&app, 2, "/stop");

    app.tracker().apply(level_event(ITEM, "40.5"));
    let outcome = app.notifier.tick().await;

    assert!(matches!(
        outcome,
        TickOutcome::Broadcast {
            delivered: 2,
            failed: 0,
            ..
        }
    ));
    let recipients: Vec<_> = app.messenger.sent().into_iter().map(|(id, _)| id).collect();
    assert_eq!(recipients, vec![SubscriberId::new(1), SubscriberId::new(3)]);
    assert_eq!(
        app.messenger.sent()[0].1,
        "🚽 ISS Urine Tank Update!\nPrevious level: 0.0%\nCurrent level: 40.5%\nChange: +40.5%"
    );
    let diagnostic = reply(&app, 1, "/test");
    assert!(diagnostic.contains("Last Update Value: 40.5%"));
    // level_event carries no TimeStamp or Status.Class
    assert!(diagnostic.contains("Last Sample: ? (class ?, received "));
}

#[tokio::test]
async fn sequence_with_half_percent_threshold() {
    let app = TestApp::new(0.5);
    reply(&app, 9, "/start");

    // Seed the ledger at 10.0.
    app.tracker().apply(level_event(ITEM, "10.0"));
    app.notifier.tick().await;
    assert_eq!(app.messenger.sent().len(), 1);

    app.tracker().apply(level_event(ITEM, "10.2"));
    assert!(matches!(
        app.notifier.tick().await,
        TickOutcome::BelowThreshold { .. }
    ));

    app.tracker().apply(level_event(ITEM, "10.9"));
    app.notifier.tick().await;

    let sent = app.messenger.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[1].1.contains("Previous level: 10.0%"));
    assert!(sent[1].1.contains("Current level: 10.9%"));
    assert!(sent[1].1.contains("Change: +0.9%"));
}

#[tokio::test]
async fn failed_delivery_does_not_block_others() {
    let app = TestApp::new(0.5);
    for chat in [1, 2, 3] {
        reply(&app, chat, "/start");
    }
    app.messenger.fail_for(SubscriberId::new(1));

    app.tracker().apply(level_event(ITEM, "55.0"));
    app.notifier.tick().await;

    assert_eq!(app.messenger.sent().len(), 2);
    assert!((app.ledger.last() - 55.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn feed_errors_leave_value_untouched() {
    let app = TestApp::new(0.5);
    app.tracker().apply(level_event(ITEM, "30.0"));
    app.tracker().apply(FeedEvent::ServerError {
        code: 8,
        message: "configured maximum server load reached".into(),
    });
    app.tracker().apply(level_event(ITEM, "garbage"));

    assert_eq!(app.telemetry.current_value(), Some(30.0));
}

#[tokio::test]
async fn subscribers_persist_across_app_restart() {
    let app = TestApp::new(0.5);
    reply(&app, 77, "/start");

    let TestApp {
        dir,
        subscribers_file,
        ..
    } = app;
    let restarted = TestApp::with_file(dir, subscribers_file, 0.5);

    assert!(restarted.registry.contains(SubscriberId::new(77)));
    assert_eq!(reply(&restarted, 77, "/start"), "You're already subscribed!");
}
