//! Session store abstraction.

use async_trait::async_trait;

use crate::core::{BookingError, ClassSession, Enrollment, SeatClaim, WaitlistEntry};
use crate::util::clock::TimestampMs;

/// Durable storage for sessions, enrollments and waitlist entries.
///
/// Every method is a potential I/O suspension point. Implementations must make
/// each single call atomic; in particular [`SessionStore::insert_enrollment_capped`]
/// counts and inserts as one unit so concurrent callers cannot overbook.
/// Backend failures surface as [`BookingError::StorageUnavailable`].
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Insert or replace a session by id.
    async fn upsert_session(&self, session: ClassSession) -> Result<(), BookingError>;

    /// Point lookup of a session.
    async fn get_session(&self, session_id: &str) -> Result<Option<ClassSession>, BookingError>;

    /// Sessions of a site starting within `[from_ms, to_ms]`, ascending by start.
    async fn list_sessions_in_range(
        &self,
        site_id: &str,
        from_ms: TimestampMs,
        to_ms: TimestampMs,
    ) -> Result<Vec<ClassSession>, BookingError>;

    /// Number of enrollments held in a session.
    async fn count_enrollments(&self, session_id: &str) -> Result<usize, BookingError>;

    /// All enrollments of a session, oldest first.
    async fn list_enrollments(&self, session_id: &str) -> Result<Vec<Enrollment>, BookingError>;

    /// Enrollment of one user in one session.
    async fn find_enrollment(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<Enrollment>, BookingError>;

    /// Insert `enrollment` only if its user holds no seat yet and fewer than
    /// `capacity` seats are taken.
    async fn insert_enrollment_capped(
        &self,
        enrollment: Enrollment,
        capacity: u32,
    ) -> Result<SeatClaim, BookingError>;

    /// Delete the enrollment of a user. Returns whether a row was removed.
    async fn delete_enrollment(&self, session_id: &str, user_id: &str) -> Result<bool, BookingError>;

    /// Insert a waitlist entry, replacing any entry for the same session and user.
    async fn upsert_waitlist_entry(&self, entry: WaitlistEntry) -> Result<(), BookingError>;

    /// Delete the waitlist entry of a user. Returns whether a row was removed.
    async fn delete_waitlist_entry(&self, session_id: &str, user_id: &str)
        -> Result<bool, BookingError>;

    /// Delete a waitlist entry by row id. Returns whether a row was removed.
    async fn delete_waitlist_entry_by_id(&self, entry_id: &str) -> Result<bool, BookingError>;

    /// Waitlist of a session in FIFO order (enqueue time, then insertion order).
    async fn list_waitlist(&self, session_id: &str) -> Result<Vec<WaitlistEntry>, BookingError>;

    /// Oldest entry of a session that has not been notified yet.
    async fn first_unnotified(&self, session_id: &str) -> Result<Option<WaitlistEntry>, BookingError>;

    /// Set the notification timestamp of an entry. Returns whether the entry exists.
    async fn set_notified(&self, entry_id: &str, at_ms: TimestampMs) -> Result<bool, BookingError>;

    /// Waitlist entry of one user in one session.
    async fn find_waitlist_entry(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<WaitlistEntry>, BookingError>;

    /// Notified entries across all sessions whose notification happened strictly before `cutoff_ms`.
    async fn list_notified_before(&self, cutoff_ms: TimestampMs)
        -> Result<Vec<WaitlistEntry>, BookingError>;
}
