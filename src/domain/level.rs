//! Tank level readings and change detection.

use chrono::{DateTime, Utc};

/// `Status.Class` reported by the feed for a nominal telemetry sample.
pub const NOMINAL_STATUS_CLASS: &str = "24";

/// One accepted tank level sample.
#[derive(Debug, Clone, PartialEq)]
pub struct TankReading {
    /// Fill level in percent. Not range-checked.
    pub level: f64,
    /// Raw `TimeStamp` field as sent by the feed.
    pub feed_timestamp: Option<String>,
    /// Raw `Status.Class` field as sent by the feed.
    pub status_class: Option<String>,
    /// Local time the sample was accepted.
    pub received_at: DateTime<Utc>,
}

impl TankReading {
    #[must_use]
    pub fn new(level: f64) -> Self {
        Self {
            level,
            feed_timestamp: None,
            status_class: None,
            received_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_nominal(&self) -> bool {
        self.status_class
            .as_deref()
            .map_or(true, |class| class == NOMINAL_STATUS_CLASS)
    }
}

/// Difference between the last broadcast level and the current one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelChange {
    pub previous: f64,
    pub current: f64,
}

impl LevelChange {
    #[must_use]
    pub const fn new(previous: f64, current: f64) -> Self {
        Self { previous, current }
    }

    /// Signed change, `current - previous`.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.current - self.previous
    }

    /// Whether the change is large enough to broadcast.
    ///
    /// Floating-point noise right at the boundary is tolerated, so a change
    /// that renders as exactly the threshold always fires.
    #[must_use]
    pub fn meets(&self, threshold: f64) -> bool {
        let delta = self.delta().abs();
        delta >= threshold || (threshold - delta) < f64::EPSILON * 64.0 * threshold.max(1.0)
    }
}
