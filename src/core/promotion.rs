//! Seat hand-off from a freed seat to the head of the waitlist.
//!
//! Promotion only starts the acceptance clock; it never reserves the seat.
//! Until the notified waiter accepts, a direct enroll can still take the
//! freed seat, and the waiter then gets [`BookingError::SessionFull`].
//! Expiry is evaluated lazily in [`PromotionProtocol::accept_spot`];
//! [`PromotionProtocol::sweep_expired_notifications`] is the optional
//! proactive path driven by the runtime sweeper.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::core::{
    BookingError, BookingRules, CapacityManager, ClassSession, Enrollment, SeatClaim, SessionStore,
    WaitlistEntry, WaitlistQueue,
};
use crate::util::clock::Clock;

/// Result of one expiry sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Notified entries purged because their window passed.
    pub expired: Vec<WaitlistEntry>,
    /// Entries newly notified to replace them; callers deliver these.
    pub promoted: Vec<WaitlistEntry>,
}

/// Orchestrates notification of the next waiter and validates acceptance.
pub struct PromotionProtocol<S: ?Sized> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    rules: BookingRules,
    waitlist: WaitlistQueue<S>,
    capacity: CapacityManager<S>,
}

impl<S: ?Sized> Clone for PromotionProtocol<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            rules: self.rules,
            waitlist: self.waitlist.clone(),
            capacity: self.capacity.clone(),
        }
    }
}

impl<S: SessionStore + ?Sized> PromotionProtocol<S> {
    /// Create the protocol over shared store and clock.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, rules: BookingRules) -> Self {
        Self {
            waitlist: WaitlistQueue::new(Arc::clone(&store), Arc::clone(&clock)),
            capacity: CapacityManager::new(Arc::clone(&store)),
            store,
            clock,
            rules,
        }
    }

    /// Rules this protocol enforces.
    pub const fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// Offer the freed seat to the oldest unnotified waiter.
    ///
    /// Returns the stamped entry so the caller can deliver the notice, or
    /// `None` when nobody is waiting. Entries of users who already hold a
    /// seat are purged and skipped.
    pub async fn notify_next(&self, session_id: &str) -> Result<Option<WaitlistEntry>, BookingError> {
        let mut entry = loop {
            let Some(entry) = self.waitlist.peek_next_unnotified(session_id).await? else {
                tracing::debug!(session = session_id, "no waiter to notify");
                return Ok(None);
            };
            if self.store.find_enrollment(session_id, &entry.user_id).await?.is_none() {
                break entry;
            }
            self.waitlist.remove(&entry.id).await?;
            tracing::debug!(session = session_id, user = %entry.user_id, "skipped waiter already enrolled");
        };
        let now = self.clock.now_ms();
        self.waitlist.mark_notified(&entry.id, now).await?;
        entry.notified_at_ms = Some(now);
        tracing::info!(
            session = session_id,
            user = %entry.user_id,
            accept_until_ms = %self.rules.accept_deadline(now),
            "waiter notified of free seat"
        );
        Ok(Some(entry))
    }

    /// Claim the seat offered to `user_id`.
    ///
    /// Checks run in a fixed order: entry exists, entry notified, window not
    /// passed (an expired entry is deleted before failing), then capacity.
    pub async fn accept_spot(
        &self,
        session: &ClassSession,
        user_id: &str,
    ) -> Result<Enrollment, BookingError> {
        let entry = self
            .waitlist
            .get_entry(&session.id, user_id)
            .await?
            .ok_or(BookingError::NotWaitlisted)?;
        let notified_at = entry.notified_at_ms.ok_or(BookingError::NotNotified)?;

        let now = self.clock.now_ms();
        if !self.rules.within_acceptance(notified_at, now) {
            self.waitlist.remove(&entry.id).await?;
            tracing::warn!(
                session = %session.id,
                user = user_id,
                elapsed_ms = %now.saturating_sub(notified_at),
                "acceptance window expired, entry purged"
            );
            return Err(BookingError::AcceptanceExpired);
        }

        match self.capacity.claim_seat(session, user_id, now).await? {
            SeatClaim::Full => {
                tracing::warn!(session = %session.id, user = user_id, "offered seat already taken");
                Err(BookingError::SessionFull)
            }
            SeatClaim::Claimed | SeatClaim::AlreadyHeld => {
                self.waitlist.remove(&entry.id).await?;
                let enrollment = self
                    .store
                    .find_enrollment(&session.id, user_id)
                    .await?
                    .unwrap_or_else(|| Enrollment::new(&session.id, user_id, now));
                tracing::info!(session = %session.id, user = user_id, "waiter accepted seat");
                Ok(enrollment)
            }
        }
    }

    /// Purge every notified entry whose window has passed and offer each
    /// uncovered free seat of an affected session to the next waiter.
    pub async fn sweep_expired_notifications(&self) -> Result<SweepReport, BookingError> {
        let now = self.clock.now_ms();
        let cutoff = now.saturating_sub(self.rules.acceptance_window.as_millis());
        let stale = self.store.list_notified_before(cutoff).await?;

        let mut report = SweepReport::default();
        let mut sessions = BTreeSet::new();
        for entry in stale {
            // An accept may have consumed the entry since the listing.
            if self.waitlist.remove(&entry.id).await? {
                tracing::warn!(session = %entry.session_id, user = %entry.user_id, "notification expired");
                sessions.insert(entry.session_id.clone());
                report.expired.push(entry);
            }
        }

        for session_id in sessions {
            let Some(session) = self.store.get_session(&session_id).await? else {
                continue;
            };
            // One offer per free seat not already covered by a live offer.
            let free = self.capacity.seats_left(&session).await?;
            let pending = self
                .waitlist
                .list(&session_id)
                .await?
                .iter()
                .filter(|e| e.notified_at_ms.is_some_and(|at| self.rules.within_acceptance(at, now)))
                .count();
            for _ in pending..free {
                let Some(next) = self.notify_next(&session_id).await? else {
                    break;
                };
                report.promoted.push(next);
            }
        }

        if !report.expired.is_empty() {
            tracing::info!(
                expired = report.expired.len(),
                promoted = report.promoted.len(),
                "expiry sweep finished"
            );
        }
        Ok(report)
    }
}
