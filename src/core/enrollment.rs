//! Time-window gate for enroll and cancel.

use std::sync::Arc;

use crate::core::{
    BookingError, BookingRules, CapacityManager, ClassSession, Enrollment, PromotionProtocol,
    SeatClaim, SessionStore, WaitlistEntry,
};
use crate::util::clock::Clock;

/// Result of a successful cancel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOutcome {
    /// Whether an enrollment row was actually removed.
    pub released: bool,
    /// Waiter offered the freed seat; the caller delivers the notice.
    pub promoted: Option<WaitlistEntry>,
}

/// Enforces the pre-class cutoff and transitions enrollment rows.
pub struct EnrollmentPolicy<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    rules: BookingRules,
    capacity: CapacityManager<S>,
    promotion: PromotionProtocol<S>,
}

impl<S: ?Sized> Clone for EnrollmentPolicy<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            rules: self.rules,
            capacity: self.capacity.clone(),
            promotion: self.promotion.clone(),
        }
    }
}

impl<S: SessionStore + ?Sized> EnrollmentPolicy<S> {
    /// Create the policy; cancellations hand freed seats to `promotion`.
    pub fn new(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        rules: BookingRules,
        promotion: PromotionProtocol<S>,
    ) -> Self {
        Self {
            capacity: CapacityManager::new(Arc::clone(&store)),
            store,
            clock,
            rules,
            promotion,
        }
    }

    fn ensure_window_open(&self, session: &ClassSession) -> Result<(), BookingError> {
        if self.rules.enrollment_open(session.starts_at_ms, self.clock.now_ms()) {
            Ok(())
        } else {
            Err(BookingError::WindowClosed {
                cutoff_minutes: self.rules.cutoff_minutes(),
            })
        }
    }

    /// Take a seat in `session` for `user_id`.
    ///
    /// Enrolling twice is a no-op that returns the existing row.
    pub async fn enroll(&self, session: &ClassSession, user_id: &str) -> Result<Enrollment, BookingError> {
        self.enroll_with_claim(session, user_id).await.map(|(enrollment, _)| enrollment)
    }

    /// Same as [`EnrollmentPolicy::enroll`], also reporting whether a new seat was taken.
    ///
    /// A fresh seat drops the user's waitlist entry, so a user is never both
    /// enrolled and queued for the same session.
    pub async fn enroll_with_claim(
        &self,
        session: &ClassSession,
        user_id: &str,
    ) -> Result<(Enrollment, SeatClaim), BookingError> {
        if let Err(err) = self.ensure_window_open(session) {
            tracing::warn!(session = %session.id, user = user_id, "enroll rejected: window closed");
            return Err(err);
        }

        let now = self.clock.now_ms();
        let claim = self.capacity.claim_seat(session, user_id, now).await?;
        match claim {
            SeatClaim::Full => {
                tracing::warn!(session = %session.id, user = user_id, "enroll rejected: session full");
                Err(BookingError::SessionFull)
            }
            SeatClaim::Claimed | SeatClaim::AlreadyHeld => {
                if claim == SeatClaim::Claimed
                    && self.store.delete_waitlist_entry(&session.id, user_id).await?
                {
                    tracing::debug!(session = %session.id, user = user_id, "waitlist entry dropped on enroll");
                }
                let enrollment = self
                    .store
                    .find_enrollment(&session.id, user_id)
                    .await?
                    .unwrap_or_else(|| Enrollment::new(&session.id, user_id, now));
                tracing::info!(session = %session.id, user = user_id, ?claim, "enrolled");
                Ok((enrollment, claim))
            }
        }
    }

    /// Give up the seat of `user_id` and offer it to the next waiter.
    ///
    /// Cancelling without an enrollment succeeds and promotes nobody.
    pub async fn cancel(&self, session: &ClassSession, user_id: &str) -> Result<CancelOutcome, BookingError> {
        if let Err(err) = self.ensure_window_open(session) {
            tracing::warn!(session = %session.id, user = user_id, "cancel rejected: window closed");
            return Err(err);
        }

        let released = self.store.delete_enrollment(&session.id, user_id).await?;
        if !released {
            tracing::debug!(session = %session.id, user = user_id, "cancel without enrollment");
            return Ok(CancelOutcome {
                released,
                promoted: None,
            });
        }
        tracing::info!(session = %session.id, user = user_id, "enrollment cancelled");

        let promoted = self.promotion.notify_next(&session.id).await?;
        Ok(CancelOutcome { released, promoted })
    }
}
