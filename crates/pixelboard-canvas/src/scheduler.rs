//! Broadcast Scheduler
//!
//! Leading-edge rate limiter for update notifications. There is no trailing
//! timer: a change that lands inside a closed window is only announced by the
//! next change that lands after it.

use std::time::{Duration, Instant};

/// Decides whether a mutation may trigger a broadcast
#[derive(Debug, Clone)]
pub struct BroadcastScheduler {
    min_interval: Duration,
    last_sent: Instant,
}

impl BroadcastScheduler {
    /// Create a scheduler whose clock starts at `now`
    #[must_use]
    pub fn new(min_interval: Duration, now: Instant) -> Self {
        Self {
            min_interval,
            last_sent: now,
        }
    }

    /// Returns `true` and restarts the clock if at least `min_interval`
    /// has passed since the last broadcast.
    pub fn should_broadcast(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_sent) >= self.min_interval {
            self.last_sent = now;
            true
        } else {
            false
        }
    }

    /// Minimum gap between broadcasts
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// When the last broadcast went out
    #[must_use]
    pub fn last_sent(&self) -> Instant {
        self.last_sent
    }
}
