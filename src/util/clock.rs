//! Time source abstraction.
//!
//! Every time-window comparison in the booking engine reads the clock it was
//! built with, so tests can drive the 30-minute cutoff and the 5-minute
//! acceptance window with a [`ManualClock`] instead of sleeping.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Milliseconds since the Unix epoch.
pub type TimestampMs = u128;

/// One minute in milliseconds.
pub const MINUTE_MS: TimestampMs = 60 * 1000;

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_ms() -> TimestampMs {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> TimestampMs;
}

/// Wall clock backed by [`SystemTime`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> TimestampMs {
        now_ms()
    }
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<TimestampMs>,
}

impl ManualClock {
    /// Create a clock frozen at `start_ms`.
    pub fn new(start_ms: TimestampMs) -> Self {
        Self {
            now: Mutex::new(start_ms),
        }
    }

    /// Move the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by.as_millis();
    }

    /// Jump to an absolute time.
    pub fn set(&self, at_ms: TimestampMs) {
        *self.now.lock() = at_ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> TimestampMs {
        *self.now.lock()
    }
}
