//! Booking facade composed from the individual components.
//!
//! `BookingService` is what presentation collaborators talk to. It resolves
//! session ids, delegates every rule to the component that owns it, delivers
//! promotion notices after the protocol call returns and feeds the audit
//! trail. The store, gateway and clock are injected by the composition root.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::{
    build_audit_event, AuditAction, AuditSink, BookingError, BookingRules, CancelOutcome,
    CapacityManager, ClassSession, Enrollment, EnrollmentPolicy, NotificationGateway, Participation,
    PromotionProtocol, SeatClaim, SessionStore, SweepReport, WaitlistEntry, WaitlistQueue,
};
use crate::util::clock::{Clock, TimestampMs};

/// Text of the "seat released" notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeTemplate {
    /// Notice headline.
    pub title: String,
    /// Notice body.
    pub message: String,
}

impl Default for NoticeTemplate {
    fn default() -> Self {
        Self {
            title: "A seat opened up".into(),
            message: "A seat was released in your class. Accept it within 5 minutes.".into(),
        }
    }
}

/// Session with its live occupancy, as shown on a class detail screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionOverview {
    /// The session record.
    pub session: ClassSession,
    /// Seats taken.
    pub enrolled: usize,
    /// Seats still free.
    pub seats_left: usize,
    /// Entries on the waitlist.
    pub waitlist_len: usize,
}

/// Entry point for every booking operation.
pub struct BookingService<S: ?Sized, N> {
    store: Arc<S>,
    gateway: Arc<N>,
    clock: Arc<dyn Clock>,
    rules: BookingRules,
    capacity: CapacityManager<S>,
    waitlist: WaitlistQueue<S>,
    promotion: PromotionProtocol<S>,
    policy: EnrollmentPolicy<S>,
    notice: NoticeTemplate,
    audit: Option<Arc<Mutex<Box<dyn AuditSink>>>>,
}

impl<S: ?Sized, N> Clone for BookingService<S, N> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            gateway: Arc::clone(&self.gateway),
            clock: Arc::clone(&self.clock),
            rules: self.rules,
            capacity: self.capacity.clone(),
            waitlist: self.waitlist.clone(),
            promotion: self.promotion.clone(),
            policy: self.policy.clone(),
            notice: self.notice.clone(),
            audit: self.audit.clone(),
        }
    }
}

impl<S, N> BookingService<S, N>
where
    S: SessionStore + ?Sized,
    N: NotificationGateway,
{
    /// Wire the components over one store, gateway and clock.
    pub fn new(store: Arc<S>, gateway: Arc<N>, clock: Arc<dyn Clock>, rules: BookingRules) -> Self {
        let promotion = PromotionProtocol::new(Arc::clone(&store), Arc::clone(&clock), rules);
        let policy = EnrollmentPolicy::new(
            Arc::clone(&store),
            Arc::clone(&clock),
            rules,
            promotion.clone(),
        );
        Self {
            capacity: CapacityManager::new(Arc::clone(&store)),
            waitlist: WaitlistQueue::new(Arc::clone(&store), Arc::clone(&clock)),
            promotion,
            policy,
            store,
            gateway,
            clock,
            rules,
            notice: NoticeTemplate::default(),
            audit: None,
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(Arc::new(Mutex::new(audit)));
        self
    }

    /// Replace the seat-released notice text.
    #[must_use]
    pub fn with_notice(mut self, notice: NoticeTemplate) -> Self {
        self.notice = notice;
        self
    }

    /// Rules in effect.
    pub const fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// Underlying store.
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Capacity component.
    pub const fn capacity(&self) -> &CapacityManager<S> {
        &self.capacity
    }

    /// Waitlist component.
    pub const fn waitlist(&self) -> &WaitlistQueue<S> {
        &self.waitlist
    }

    /// Promotion component.
    pub const fn promotion(&self) -> &PromotionProtocol<S> {
        &self.promotion
    }

    /// Enrollment component.
    pub const fn policy(&self) -> &EnrollmentPolicy<S> {
        &self.policy
    }

    // ---------------------------------------------------------------------
    // Sessions and queries
    // ---------------------------------------------------------------------

    /// Create or replace a session record.
    pub async fn upsert_session(&self, session: ClassSession) -> Result<(), BookingError> {
        session.validate().map_err(BookingError::InvalidSession)?;
        tracing::debug!(session = %session.id, site = %session.site_id, "upserting session");
        self.store.upsert_session(session).await
    }

    /// Point lookup of a session.
    pub async fn get_session(&self, session_id: &str) -> Result<Option<ClassSession>, BookingError> {
        self.store.get_session(session_id).await
    }

    async fn require_session(&self, session_id: &str) -> Result<ClassSession, BookingError> {
        self.store
            .get_session(session_id)
            .await?
            .ok_or_else(|| BookingError::SessionNotFound(session_id.to_string()))
    }

    /// Sessions of a site starting within `[from_ms, to_ms]`, earliest first.
    pub async fn list_sessions_in_range(
        &self,
        site_id: &str,
        from_ms: TimestampMs,
        to_ms: TimestampMs,
    ) -> Result<Vec<ClassSession>, BookingError> {
        if from_ms > to_ms {
            return Ok(Vec::new());
        }
        self.store.list_sessions_in_range(site_id, from_ms, to_ms).await
    }

    /// Seats taken in a session.
    pub async fn enrollment_count(&self, session_id: &str) -> Result<usize, BookingError> {
        self.capacity.count(session_id).await
    }

    /// Waitlist of a session in FIFO order.
    pub async fn list_waitlist(&self, session_id: &str) -> Result<Vec<WaitlistEntry>, BookingError> {
        self.waitlist.list(session_id).await
    }

    /// Enrollments of a session.
    pub async fn list_enrollments(&self, session_id: &str) -> Result<Vec<Enrollment>, BookingError> {
        self.store.list_enrollments(session_id).await
    }

    /// Session with occupancy figures.
    pub async fn session_overview(&self, session_id: &str) -> Result<SessionOverview, BookingError> {
        let session = self.require_session(session_id).await?;
        let enrolled = self.capacity.count(session_id).await?;
        let waitlist_len = self.waitlist.list(session_id).await?.len();
        Ok(SessionOverview {
            seats_left: (session.capacity as usize).saturating_sub(enrolled),
            session,
            enrolled,
            waitlist_len,
        })
    }

    /// Booking state of `user_id` in `session_id`.
    pub async fn participation(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Participation, BookingError> {
        if self.store.find_enrollment(session_id, user_id).await?.is_some() {
            return Ok(Participation::Enrolled);
        }
        let queue = self.waitlist.list(session_id).await?;
        let Some((idx, entry)) = queue.iter().enumerate().find(|(_, e)| e.user_id == user_id) else {
            return Ok(Participation::NotEnrolled);
        };
        Ok(match entry.notified_at_ms {
            None => Participation::Waiting { position: idx + 1 },
            Some(at) if self.rules.within_acceptance(at, self.clock.now_ms()) => {
                Participation::Notified {
                    accept_until_ms: self.rules.accept_deadline(at),
                }
            }
            Some(_) => Participation::Expired,
        })
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Take a seat directly.
    pub async fn enroll(&self, session_id: &str, user_id: &str) -> Result<Enrollment, BookingError> {
        let session = self.require_session(session_id).await?;
        let result = self.policy.enroll_with_claim(&session, user_id).await;
        match &result {
            // Re-enrolling changes nothing, so nothing is recorded.
            Ok((_, SeatClaim::AlreadyHeld)) => {}
            other => self.audit_result(session_id, user_id, AuditAction::Enroll, other),
        }
        result.map(|(enrollment, _)| enrollment)
    }

    /// Give up a seat; the next waiter, if any, is notified.
    pub async fn cancel(&self, session_id: &str, user_id: &str) -> Result<CancelOutcome, BookingError> {
        let session = self.require_session(session_id).await?;
        let result = self.policy.cancel(&session, user_id).await;
        self.audit_result(session_id, user_id, AuditAction::Cancel, &result);
        let outcome = result?;
        if let Some(entry) = &outcome.promoted {
            self.audit(&entry.session_id, &entry.user_id, AuditAction::Notify, None);
            self.deliver(entry).await;
        }
        Ok(outcome)
    }

    /// Queue for a seat. Re-joining moves the user to the back.
    pub async fn join_waitlist(&self, session_id: &str, user_id: &str) -> Result<WaitlistEntry, BookingError> {
        self.require_session(session_id).await?;
        let entry = self.waitlist.join(session_id, user_id).await?;
        self.audit(session_id, user_id, AuditAction::JoinWaitlist, None);
        Ok(entry)
    }

    /// Leave the waitlist. Leaving when not queued is a no-op.
    pub async fn leave_waitlist(&self, session_id: &str, user_id: &str) -> Result<(), BookingError> {
        if self.waitlist.leave(session_id, user_id).await? {
            self.audit(session_id, user_id, AuditAction::LeaveWaitlist, None);
        }
        Ok(())
    }

    /// Offer a free seat to the next waiter and deliver the notice.
    pub async fn notify_next(&self, session_id: &str) -> Result<Option<WaitlistEntry>, BookingError> {
        let promoted = self.promotion.notify_next(session_id).await?;
        if let Some(entry) = &promoted {
            self.audit(session_id, &entry.user_id, AuditAction::Notify, None);
            self.deliver(entry).await;
        }
        Ok(promoted)
    }

    /// Claim the seat this user was offered.
    pub async fn accept_spot(&self, session_id: &str, user_id: &str) -> Result<Enrollment, BookingError> {
        let session = self.require_session(session_id).await?;
        let result = self.promotion.accept_spot(&session, user_id).await;
        match &result {
            Err(BookingError::AcceptanceExpired) => {
                self.audit(session_id, user_id, AuditAction::Expire, None);
            }
            other => self.audit_result(session_id, user_id, AuditAction::Accept, other),
        }
        result
    }

    /// Purge lapsed offers and notify replacement waiters.
    pub async fn sweep_expired_notifications(&self) -> Result<SweepReport, BookingError> {
        let report = self.promotion.sweep_expired_notifications().await?;
        for entry in &report.expired {
            self.audit(&entry.session_id, &entry.user_id, AuditAction::Expire, None);
        }
        for entry in &report.promoted {
            self.audit(&entry.session_id, &entry.user_id, AuditAction::Notify, None);
            self.deliver(entry).await;
        }
        Ok(report)
    }

    // ---------------------------------------------------------------------
    // Side channels
    // ---------------------------------------------------------------------

    /// Fire-and-forget delivery; failures are logged, never propagated.
    async fn deliver(&self, entry: &WaitlistEntry) {
        if let Err(e) = self
            .gateway
            .notify_user(&entry.session_id, &entry.user_id, &self.notice.title, &self.notice.message)
            .await
        {
            tracing::error!(
                session = %entry.session_id,
                user = %entry.user_id,
                "failed to deliver seat notice: {}",
                e
            );
        }
    }

    fn audit_result<T>(
        &self,
        session_id: &str,
        user_id: &str,
        action: AuditAction,
        result: &Result<T, BookingError>,
    ) {
        match result {
            Ok(_) => self.audit(session_id, user_id, action, None),
            Err(e) if !e.is_retryable() => {
                self.audit(session_id, user_id, AuditAction::Reject, Some(format!("{action:?}: {e}")));
            }
            Err(_) => {}
        }
    }

    fn audit(&self, session_id: &str, user_id: &str, action: AuditAction, detail: Option<String>) {
        if let Some(sink) = &self.audit {
            sink.lock().record(build_audit_event(
                session_id,
                user_id,
                action,
                self.clock.now_ms(),
                detail,
            ));
        }
    }
}
