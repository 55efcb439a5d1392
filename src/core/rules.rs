//! Time-window rules shared by the booking components.

use std::time::Duration;

use crate::util::clock::TimestampMs;

/// Time-window limits enforced by enrollment and promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRules {
    /// How long before class start enroll and cancel stop being accepted.
    pub enrollment_cutoff: Duration,
    /// How long a notified waiter has to accept a freed seat.
    pub acceptance_window: Duration,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            enrollment_cutoff: Duration::from_secs(30 * 60),
            acceptance_window: Duration::from_secs(5 * 60),
        }
    }
}

impl BookingRules {
    /// True while `now_ms` is at or before `starts_at_ms - enrollment_cutoff`.
    pub fn enrollment_open(&self, starts_at_ms: TimestampMs, now_ms: TimestampMs) -> bool {
        now_ms <= starts_at_ms.saturating_sub(self.enrollment_cutoff.as_millis())
    }

    /// True while no more than `acceptance_window` has elapsed since `notified_at_ms`.
    pub fn within_acceptance(&self, notified_at_ms: TimestampMs, now_ms: TimestampMs) -> bool {
        now_ms.saturating_sub(notified_at_ms) <= self.acceptance_window.as_millis()
    }

    /// Last instant an accept succeeds for an entry notified at `notified_at_ms`.
    pub fn accept_deadline(&self, notified_at_ms: TimestampMs) -> TimestampMs {
        notified_at_ms + self.acceptance_window.as_millis()
    }

    /// Cutoff in whole minutes, for user-facing messages.
    pub const fn cutoff_minutes(&self) -> u64 {
        self.enrollment_cutoff.as_secs() / 60
    }
}
