//! Exponential reconnection backoff with jitter.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::infrastructure::config::feed::ReconnectionConfig;

/// Tracks the delay before the next reconnection attempt.
#[derive(Debug, Clone)]
pub struct Backoff {
    config: ReconnectionConfig,
    current_delay_ms: u64,
    consecutive_failures: u32,
}

impl Backoff {
    #[must_use]
    pub fn new(config: ReconnectionConfig) -> Self {
        let initial_delay = config.initial_delay_ms;
        Self {
            config,
            current_delay_ms: initial_delay,
            consecutive_failures: 0,
        }
    }

    /// Reset after a session was established.
    pub fn reset(&mut self) {
        self.consecutive_failures = 0;
        self.current_delay_ms = self.config.initial_delay_ms;
    }

    /// Attempts since the last reset.
    #[must_use]
    pub const fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Delay for this attempt (base plus up to 20% jitter); grows the base
    /// for the next one, capped at `max_delay_ms`.
    pub fn next_delay(&mut self) -> Duration {
        let base_delay = Duration::from_millis(self.current_delay_ms);
        let delay = base_delay + Duration::from_millis(jitter_ms(base_delay));

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let next_delay = (self.current_delay_ms as f64 * self.config.backoff_multiplier) as u64;
        self.current_delay_ms = next_delay.min(self.config.max_delay_ms);
        self.consecutive_failures += 1;

        delay
    }
}

fn jitter_ms(base_delay: Duration) -> u64 {
    #[allow(clippy::cast_possible_truncation)]
    let jitter_range_ms = (base_delay.as_millis() as u64) / 5;
    if jitter_range_ms == 0 {
        return 0;
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % (jitter_range_ms + 1)
}
