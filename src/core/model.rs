//! Booking records persisted by the session store.
//!
//! Sessions, enrollments and waitlist entries are independent rows linked by
//! string references. Nothing here holds another record by value, so each
//! row can be loaded and mutated on its own.

use serde::{Deserialize, Serialize};

use crate::util::clock::TimestampMs;
use crate::util::ids::{new_entry_id, EntryId, SessionId, UserId};

/// Kind of fitness class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassType {
    /// High-intensity functional training.
    Crossfit,
    /// Full body conditioning.
    Workbody,
    /// Dance/rhythm class.
    Ritmo,
    /// Guided machine circuit.
    Machinefit,
}

/// Workout-of-the-day focus, only meaningful for [`ClassType::Crossfit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WodType {
    /// Upper body.
    Upper,
    /// Lower body.
    Lower,
    /// Whole body.
    Allbody,
}

/// One scheduled class occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSession {
    /// Session identifier.
    pub id: SessionId,
    /// Class kind.
    pub class_type: ClassType,
    /// Workout focus for crossfit sessions.
    pub wod: Option<WodType>,
    /// Teacher reference.
    pub teacher_id: String,
    /// Site (gym location) reference.
    pub site_id: String,
    /// Scheduled start, milliseconds since epoch.
    pub starts_at_ms: TimestampMs,
    /// Class length in minutes.
    pub duration_minutes: u32,
    /// Maximum concurrent enrollments.
    pub capacity: u32,
}

impl ClassSession {
    /// Default class length used by the schedule seeder.
    pub const DEFAULT_DURATION_MINUTES: u32 = 90;
    /// Default seat count used by the schedule seeder.
    pub const DEFAULT_CAPACITY: u32 = 25;

    /// Build a session with a generated id and default duration/capacity.
    pub fn new(
        class_type: ClassType,
        teacher_id: impl Into<String>,
        site_id: impl Into<String>,
        starts_at_ms: TimestampMs,
    ) -> Self {
        Self {
            id: new_entry_id(),
            class_type,
            wod: None,
            teacher_id: teacher_id.into(),
            site_id: site_id.into(),
            starts_at_ms,
            duration_minutes: Self::DEFAULT_DURATION_MINUTES,
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Override the session id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<SessionId>) -> Self {
        self.id = id.into();
        self
    }

    /// Override the seat count.
    #[must_use]
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Override the class length.
    #[must_use]
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Set the workout focus. Ignored for non-crossfit classes.
    #[must_use]
    pub fn with_wod(mut self, wod: WodType) -> Self {
        if self.class_type == ClassType::Crossfit {
            self.wod = Some(wod);
        }
        self
    }

    /// Scheduled end, milliseconds since epoch.
    pub fn ends_at_ms(&self) -> TimestampMs {
        self.starts_at_ms + TimestampMs::from(self.duration_minutes) * crate::util::clock::MINUTE_MS
    }

    /// Check record invariants before it is written.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.is_empty() {
            return Err("id must not be empty".into());
        }
        if self.capacity == 0 {
            return Err("capacity must be greater than 0".into());
        }
        if self.wod.is_some() && self.class_type != ClassType::Crossfit {
            return Err("wod is only valid for crossfit sessions".into());
        }
        Ok(())
    }
}

/// A confirmed seat held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Row identifier.
    pub id: EntryId,
    /// Session reference.
    pub session_id: SessionId,
    /// User reference.
    pub user_id: UserId,
    /// Creation time.
    pub created_at_ms: TimestampMs,
}

impl Enrollment {
    /// New enrollment row with a generated id.
    pub fn new(session_id: impl Into<SessionId>, user_id: impl Into<UserId>, now_ms: TimestampMs) -> Self {
        Self {
            id: new_entry_id(),
            session_id: session_id.into(),
            user_id: user_id.into(),
            created_at_ms: now_ms,
        }
    }
}

/// A user waiting for a seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    /// Row identifier.
    pub id: EntryId,
    /// Session reference.
    pub session_id: SessionId,
    /// User reference.
    pub user_id: UserId,
    /// Time the user (re)joined the queue.
    pub enqueued_at_ms: TimestampMs,
    /// Time the user was offered a freed seat; `None` until promoted.
    pub notified_at_ms: Option<TimestampMs>,
}

impl WaitlistEntry {
    /// New, not yet notified entry with a generated id.
    pub fn new(session_id: impl Into<SessionId>, user_id: impl Into<UserId>, now_ms: TimestampMs) -> Self {
        Self {
            id: new_entry_id(),
            session_id: session_id.into(),
            user_id: user_id.into(),
            enqueued_at_ms: now_ms,
            notified_at_ms: None,
        }
    }

    /// True once the entry has been promoted.
    pub const fn is_notified(&self) -> bool {
        self.notified_at_ms.is_some()
    }
}

/// Outcome of an atomic capped seat insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatClaim {
    /// Row inserted; the user now holds a seat.
    Claimed,
    /// The user already held a seat; nothing inserted.
    AlreadyHeld,
    /// No seat left; nothing inserted.
    Full,
}

/// Booking state of one user in one session, derived from which rows exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Participation {
    /// No enrollment and no waitlist entry.
    NotEnrolled,
    /// Holds a confirmed seat.
    Enrolled,
    /// Queued and not yet offered a seat.
    Waiting {
        /// 1-based FIFO position among all entries for the session.
        position: usize,
    },
    /// Offered a seat and still inside the acceptance window.
    Notified {
        /// Last instant an accept succeeds.
        accept_until_ms: TimestampMs,
    },
    /// Offered a seat but the window passed; purged on the next accept or sweep.
    Expired,
}
