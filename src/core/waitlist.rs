//! FIFO waitlist per session.

use std::sync::Arc;

use crate::core::{BookingError, SessionStore, WaitlistEntry};
use crate::util::clock::{Clock, TimestampMs};

/// FIFO admission and lookup over the waitlist rows of the store.
pub struct WaitlistQueue<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized> Clone for WaitlistQueue<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: SessionStore + ?Sized> WaitlistQueue<S> {
    /// Create a queue over `store`, stamping entries with `clock`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Queue `user_id` for `session_id`.
    ///
    /// Re-joining replaces the previous entry, so the user moves to the back
    /// of the queue and any pending notification is dropped.
    pub async fn join(&self, session_id: &str, user_id: &str) -> Result<WaitlistEntry, BookingError> {
        let entry = WaitlistEntry::new(session_id, user_id, self.clock.now_ms());
        self.store.upsert_waitlist_entry(entry.clone()).await?;
        tracing::info!(session = session_id, user = user_id, entry = %entry.id, "joined waitlist");
        Ok(entry)
    }

    /// Remove `user_id` from the queue. Absent entries are not an error.
    pub async fn leave(&self, session_id: &str, user_id: &str) -> Result<bool, BookingError> {
        let removed = self.store.delete_waitlist_entry(session_id, user_id).await?;
        if removed {
            tracing::info!(session = session_id, user = user_id, "left waitlist");
        }
        Ok(removed)
    }

    /// Oldest entry that has not been offered a seat yet.
    pub async fn peek_next_unnotified(
        &self,
        session_id: &str,
    ) -> Result<Option<WaitlistEntry>, BookingError> {
        self.store.first_unnotified(session_id).await
    }

    /// Stamp the entry as notified at `at_ms`. A second call overwrites the first.
    pub async fn mark_notified(&self, entry_id: &str, at_ms: TimestampMs) -> Result<bool, BookingError> {
        self.store.set_notified(entry_id, at_ms).await
    }

    /// Entry of one user, if queued.
    pub async fn get_entry(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<WaitlistEntry>, BookingError> {
        self.store.find_waitlist_entry(session_id, user_id).await
    }

    /// Delete an entry by row id.
    pub async fn remove(&self, entry_id: &str) -> Result<bool, BookingError> {
        self.store.delete_waitlist_entry_by_id(entry_id).await
    }

    /// All entries of the session in FIFO order.
    pub async fn list(&self, session_id: &str) -> Result<Vec<WaitlistEntry>, BookingError> {
        self.store.list_waitlist(session_id).await
    }
}
