//! Chat message texts.
//!
//! Plain text only. Levels render with one decimal place and deltas with an
//! explicit sign.

use crate::application::state::TelemetrySnapshot;
use crate::domain::{LevelChange, TankReading};

pub const WELCOME: &str = "Welcome to ISS Urine Tank Tracker! 🚀🚽\n\
    You will receive notifications when the urine tank level changes.";
pub const ALREADY_SUBSCRIBED: &str = "You're already subscribed!";
pub const UNSUBSCRIBED: &str = "You've been unsubscribed from notifications.";
pub const NOT_SUBSCRIBED: &str = "You weren't subscribed!";
pub const SUBSCRIPTION_UNAVAILABLE: &str = "Unable to update your subscription right now.";
pub const LEVEL_UNAVAILABLE: &str = "Unable to fetch current urine tank level.";

/// Broadcast text for a level change.
#[must_use]
pub fn level_update(change: &LevelChange) -> String {
    format!(
        "🚽 ISS Urine Tank Update!\n\
        Previous level: {:.1}%\n\
        Current level: {:.1}%\n\
        Change: {:+.1}%",
        change.previous,
        change.current,
        change.delta()
    )
}

/// Reply to `/status`.
#[must_use]
pub fn status(snapshot: &TelemetrySnapshot) -> String {
    match snapshot.current_value() {
        Some(level) => format!(
            "Connection Status: {}\nCurrent ISS Urine Tank Level: {level:.1}%",
            snapshot.connection
        ),
        None => format!(
            "Connection Status: {}\n{LEVEL_UNAVAILABLE}",
            snapshot.connection
        ),
    }
}

/// Reply to `/test`.
#[must_use]
pub fn diagnostic(snapshot: &TelemetrySnapshot, last_broadcast: Option<f64>) -> String {
    format!(
        "🔍 Connection Test:\n\
        Connection Status: {}\n\
        Current Value: {}\n\
        Last Update Value: {}\n\
        Last Sample: {}",
        snapshot.connection,
        percent_or_none(snapshot.current_value()),
        percent_or_none(last_broadcast),
        sample_or_none(snapshot.reading.as_ref())
    )
}

fn percent_or_none(value: Option<f64>) -> String {
    value.map_or_else(|| "None".to_string(), |v| format!("{v:.1}%"))
}

// Feed timestamp and class as sent, plus when the sample arrived here.
fn sample_or_none(reading: Option<&TankReading>) -> String {
    let Some(reading) = reading else {
        return "None".to_string();
    };
    format!(
        "{} (class {}, received {} UTC)",
        reading.feed_timestamp.as_deref().unwrap_or("?"),
        reading.status_class.as_deref().unwrap_or("?"),
        reading.received_at.format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConnectionStatus;
    use chrono::{TimeZone, Utc};

    fn snapshot(level: Option<f64>, connection: ConnectionStatus) -> TelemetrySnapshot {
        TelemetrySnapshot {
            reading: level.map(TankReading::new),
            connection,
        }
    }

    #[test]
    fn level_update_shows_signed_delta() {
        let text = level_update(&LevelChange::new(40.0, 40.5));
        assert_eq!(
            text,
            "🚽 ISS Urine Tank Update!\nPrevious level: 40.0%\nCurrent level: 40.5%\nChange: +0.5%"
        );
    }

    #[test]
    fn level_update_negative_delta() {
        let text = level_update(&LevelChange::new(55.0, 12.3));
        assert!(text.ends_with("Change: -42.7%"));
    }

    #[test]
    fn status_with_value() {
        let text = status(&snapshot(Some(42.0), ConnectionStatus::Connected));
        assert_eq!(
            text,
            "Connection Status: Connected\nCurrent ISS Urine Tank Level: 42.0%"
        );
    }

    #[test]
    fn status_without_value() {
        let text = status(&snapshot(None, ConnectionStatus::Disconnected));
        assert_eq!(
            text,
            "Connection Status: Disconnected\nUnable to fetch current urine tank level."
        );
    }

    #[test]
    fn diagnostic_renders_none() {
        let text = diagnostic(&snapshot(None, ConnectionStatus::Disconnected), None);
        assert!(text.contains("Current Value: None"));
        assert!(text.contains("Last Update Value: None"));
        assert!(text.ends_with("Last Sample: None"));
    }

    #[test]
    fn diagnostic_renders_values() {
        let text = diagnostic(&snapshot(Some(12.34), ConnectionStatus::Connected), Some(0.0));
        assert!(text.starts_with("🔍 Connection Test:"));
        assert!(text.contains("Connection Status: Connected"));
        assert!(text.contains("Current Value: 12.3%"));
        assert!(text.contains("Last Update Value: 0.0%"));
    }

    #[test]
    fn diagnostic_shows_sample_metadata() {
        let reading = TankReading {
            level: 42.0,
            feed_timestamp: Some("7040.5".into()),
            status_class: Some("24".into()),
            received_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        };
        let snapshot = TelemetrySnapshot {
            reading: Some(reading),
            connection: ConnectionStatus::Connected,
        };

        let text = diagnostic(&snapshot, Some(41.0));

        assert_eq!(
            text,
            "🔍 Connection Test:\nConnection Status: Connected\nCurrent Value: 42.0%\n\
             Last Update Value: 41.0%\n\
             Last Sample: 7040.5 (class 24, received 2024-05-01 12:30:00 UTC)"
        );
    }
}
