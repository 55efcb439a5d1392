//! Seat accounting for a session.

use std::sync::Arc;

use crate::core::{BookingError, ClassSession, Enrollment, SeatClaim, SessionStore};

/// Answers how many seats are taken and gates new confirmed enrollments.
///
/// Counts are always read from the store; nothing is cached, so several
/// instances over one store never drift apart.
pub struct CapacityManager<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for CapacityManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: SessionStore + ?Sized> CapacityManager<S> {
    /// Create a manager over `store`.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Number of enrollments held in the session.
    pub async fn count(&self, session_id: &str) -> Result<usize, BookingError> {
        self.store.count_enrollments(session_id).await
    }

    /// True while the session has at least one free seat.
    pub async fn has_room(&self, session: &ClassSession) -> Result<bool, BookingError> {
        let taken = self.count(&session.id).await?;
        Ok(taken < session.capacity as usize)
    }

    /// Seats still free, never negative.
    pub async fn seats_left(&self, session: &ClassSession) -> Result<usize, BookingError> {
        let taken = self.count(&session.id).await?;
        Ok((session.capacity as usize).saturating_sub(taken))
    }

    /// Atomically seat `user_id` if the session has room.
    ///
    /// A user who already holds a seat keeps it and no second row is written.
    pub async fn claim_seat(
        &self,
        session: &ClassSession,
        user_id: &str,
        now_ms: crate::util::clock::TimestampMs,
    ) -> Result<SeatClaim, BookingError> {
        let claim = self
            .store
            .insert_enrollment_capped(Enrollment::new(&session.id, user_id, now_ms), session.capacity)
            .await?;
        tracing::debug!(session = %session.id, user = user_id, ?claim, "seat claim");
        Ok(claim)
    }
}
