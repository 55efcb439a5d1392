//! In-memory session store.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{BookingError, ClassSession, Enrollment, SeatClaim, SessionStore, WaitlistEntry};
use crate::util::clock::TimestampMs;

/// Row tables shared by the in-memory and file backends.
///
/// Enrollments and waitlist entries are kept in insertion order; waitlist
/// reads stable-sort by enqueue time so equal timestamps stay FIFO.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct Tables {
    sessions: HashMap<String, ClassSession>,
    enrollments: Vec<Enrollment>,
    waitlist: Vec<WaitlistEntry>,
}

impl Tables {
    pub(crate) fn upsert_session(&mut self, session: ClassSession) {
        self.sessions.insert(session.id.clone(), session);
    }

    pub(crate) fn get_session(&self, session_id: &str) -> Option<ClassSession> {
        self.sessions.get(session_id).cloned()
    }

    pub(crate) fn sessions_in_range(
        &self,
        site_id: &str,
        from_ms: TimestampMs,
        to_ms: TimestampMs,
    ) -> Vec<ClassSession> {
        let mut found: Vec<ClassSession> = self
            .sessions
            .values()
            .filter(|s| s.site_id == site_id && (from_ms..=to_ms).contains(&s.starts_at_ms))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.starts_at_ms.cmp(&b.starts_at_ms).then_with(|| a.id.cmp(&b.id)));
        found
    }

    pub(crate) fn count_enrollments(&self, session_id: &str) -> usize {
        self.enrollments.iter().filter(|e| e.session_id == session_id).count()
    }

    pub(crate) fn enrollments_of(&self, session_id: &str) -> Vec<Enrollment> {
        self.enrollments
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect()
    }

    pub(crate) fn find_enrollment(&self, session_id: &str, user_id: &str) -> Option<Enrollment> {
        self.enrollments
            .iter()
            .find(|e| e.session_id == session_id && e.user_id == user_id)
            .cloned()
    }

    pub(crate) fn insert_enrollment_capped(&mut self, enrollment: Enrollment, capacity: u32) -> SeatClaim {
        if self
            .find_enrollment(&enrollment.session_id, &enrollment.user_id)
            .is_some()
        {
            return SeatClaim::AlreadyHeld;
        }
        if self.count_enrollments(&enrollment.session_id) >= capacity as usize {
            return SeatClaim::Full;
        }
        self.enrollments.push(enrollment);
        SeatClaim::Claimed
    }

    pub(crate) fn delete_enrollment(&mut self, session_id: &str, user_id: &str) -> bool {
        let before = self.enrollments.len();
        self.enrollments
            .retain(|e| !(e.session_id == session_id && e.user_id == user_id));
        before != self.enrollments.len()
    }

    pub(crate) fn upsert_waitlist_entry(&mut self, entry: WaitlistEntry) {
        self.delete_waitlist_entry(&entry.session_id, &entry.user_id);
        self.waitlist.push(entry);
    }

    pub(crate) fn delete_waitlist_entry(&mut self, session_id: &str, user_id: &str) -> bool {
        let before = self.waitlist.len();
        self.waitlist
            .retain(|e| !(e.session_id == session_id && e.user_id == user_id));
        before != self.waitlist.len()
    }

    pub(crate) fn delete_waitlist_entry_by_id(&mut self, entry_id: &str) -> bool {
        let before = self.waitlist.len();
        self.waitlist.retain(|e| e.id != entry_id);
        before != self.waitlist.len()
    }

    pub(crate) fn waitlist_of(&self, session_id: &str) -> Vec<WaitlistEntry> {
        let mut entries: Vec<WaitlistEntry> = self
            .waitlist
            .iter()
            .filter(|e| e.session_id == session_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.enqueued_at_ms);
        entries
    }

    pub(crate) fn first_unnotified(&self, session_id: &str) -> Option<WaitlistEntry> {
        self.waitlist
            .iter()
            .filter(|e| e.session_id == session_id && e.notified_at_ms.is_none())
            .min_by_key(|e| e.enqueued_at_ms)
            .cloned()
    }

    pub(crate) fn set_notified(&mut self, entry_id: &str, at_ms: TimestampMs) -> bool {
        match self.waitlist.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) => {
                entry.notified_at_ms = Some(at_ms);
                true
            }
            None => false,
        }
    }

    pub(crate) fn find_waitlist_entry(&self, session_id: &str, user_id: &str) -> Option<WaitlistEntry> {
        self.waitlist
            .iter()
            .find(|e| e.session_id == session_id && e.user_id == user_id)
            .cloned()
    }

    pub(crate) fn notified_before(&self, cutoff_ms: TimestampMs) -> Vec<WaitlistEntry> {
        self.waitlist
            .iter()
            .filter(|e| e.notified_at_ms.is_some_and(|at| at < cutoff_ms))
            .cloned()
            .collect()
    }
}

/// Session store kept entirely in process memory.
///
/// Each trait call takes the table lock once, so single calls, including the
/// capped enrollment insert, are atomic.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    tables: Mutex<Tables>,
}

impl InMemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn upsert_session(&self, session: ClassSession) -> Result<(), BookingError> {
        self.tables.lock().upsert_session(session);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> Result<Option<ClassSession>, BookingError> {
        Ok(self.tables.lock().get_session(session_id))
    }

    async fn list_sessions_in_range(
        &self,
        site_id: &str,
        from_ms: TimestampMs,
        to_ms: TimestampMs,
    ) -> Result<Vec<ClassSession>, BookingError> {
        Ok(self.tables.lock().sessions_in_range(site_id, from_ms, to_ms))
    }

    async fn count_enrollments(&self, session_id: &str) -> Result<usize, BookingError> {
        Ok(self.tables.lock().count_enrollments(session_id))
    }

    async fn list_enrollments(&self, session_id: &str) -> Result<Vec<Enrollment>, BookingError> {
        Ok(self.tables.lock().enrollments_of(session_id))
    }

    async fn find_enrollment(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<Enrollment>, BookingError> {
        Ok(self.tables.lock().find_enrollment(session_id, user_id))
    }

    async fn insert_enrollment_capped(
        &self,
        enrollment: Enrollment,
        capacity: u32,
    ) -> Result<SeatClaim, BookingError> {
        Ok(self.tables.lock().insert_enrollment_capped(enrollment, capacity))
    }

    async fn delete_enrollment(&self, session_id: &str, user_id: &str) -> Result<bool, BookingError> {
        Ok(self.tables.lock().delete_enrollment(session_id, user_id))
    }

    async fn upsert_waitlist_entry(&self, entry: WaitlistEntry) -> Result<(), BookingError> {
        self.tables.lock().upsert_waitlist_entry(entry);
        Ok(())
    }

    async fn delete_waitlist_entry(&self, session_id: &str, user_id: &str) -> Result<bool, BookingError> {
        Ok(self.tables.lock().delete_waitlist_entry(session_id, user_id))
    }

    async fn delete_waitlist_entry_by_id(&self, entry_id: &str) -> Result<bool, BookingError> {
        Ok(self.tables.lock().delete_waitlist_entry_by_id(entry_id))
    }

    async fn list_waitlist(&self, session_id: &str) -> Result<Vec<WaitlistEntry>, BookingError> {
        Ok(self.tables.lock().waitlist_of(session_id))
    }

    async fn first_unnotified(&self, session_id: &str) -> Result<Option<WaitlistEntry>, BookingError> {
        Ok(self.tables.lock().first_unnotified(session_id))
    }

    async fn set_notified(&self, entry_id: &str, at_ms: TimestampMs) -> Result<bool, BookingError> {
        Ok(self.tables.lock().set_notified(entry_id, at_ms))
    }

    async fn find_waitlist_entry(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<WaitlistEntry>, BookingError> {
        Ok(self.tables.lock().find_waitlist_entry(session_id, user_id))
    }

    async fn list_notified_before(&self, cutoff_ms: TimestampMs) -> Result<Vec<WaitlistEntry>, BookingError> {
        Ok(self.tables.lock().notified_before(cutoff_ms))
    }
}
