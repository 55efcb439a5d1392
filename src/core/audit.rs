//! Audit sink implementations.
//!
//! Provides the bounded in-memory trail used in development and tests. Hosts
//! that persist audit records implement [`AuditSink`] themselves.

use std::collections::VecDeque;

use serde::Serialize;

use crate::util::clock::TimestampMs;
use crate::util::ids::new_entry_id;

/// Booking transition recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Seat taken through direct enrollment.
    Enroll,
    /// Seat given up.
    Cancel,
    /// User queued on the waitlist.
    JoinWaitlist,
    /// User left the waitlist.
    LeaveWaitlist,
    /// Waiter offered a freed seat.
    Notify,
    /// Waiter claimed the offered seat.
    Accept,
    /// Offer lapsed and the entry was purged.
    Expire,
    /// Operation refused by a booking rule.
    Reject,
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Session the event concerns.
    pub session_id: String,
    /// Acting or affected user.
    pub user_id: String,
    /// Transition taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: TimestampMs,
    /// Additional context, e.g. the rejection reason.
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events.min(1024)),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Sink that forwards every event to `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&mut self, event: AuditEvent) {
        tracing::info!(
            target: "class_booking::audit",
            event_id = %event.event_id,
            session = %event.session_id,
            user = %event.user_id,
            action = ?event.action,
            detail = ?event.detail,
            "audit"
        );
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    session_id: impl Into<String>,
    user_id: impl Into<String>,
    action: AuditAction,
    created_at_ms: TimestampMs,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: new_entry_id(),
        session_id: session_id.into(),
        user_id: user_id.into(),
        action,
        created_at_ms,
        detail,
    }
}
