//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use class_booking::core::{
    AuditEvent, AuditSink, BookingRules, BookingService, ClassSession, ClassType,
};
use class_booking::infra::{InMemoryOutbox, InMemorySessionStore};
use class_booking::util::{ManualClock, TimestampMs, MINUTE_MS};
use parking_lot::Mutex;

/// Fixed "now" used by every fixture: 2024-01-01T08:00:00Z.
pub const T0: TimestampMs = 1_704_096_000_000;

/// Booking service over in-memory adapters with a hand-driven clock.
pub struct Fixture {
    pub service: BookingService<InMemorySessionStore, InMemoryOutbox>,
    pub clock: Arc<ManualClock>,
    pub outbox: Arc<InMemoryOutbox>,
    pub audit: Arc<Mutex<Vec<AuditEvent>>>,
}

impl Fixture {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let outbox = Arc::new(InMemoryOutbox::new());
        let audit = Arc::new(Mutex::new(Vec::new()));
        let service = BookingService::new(
            Arc::new(InMemorySessionStore::new()),
            outbox.clone(),
            clock.clone(),
            BookingRules::default(),
        )
        .with_audit(Box::new(SharedAudit(audit.clone())));
        Self {
            service,
            clock,
            outbox,
            audit,
        }
    }

    /// Create a session starting `starts_in` from now.
    pub async fn session(&self, id: &str, capacity: u32, starts_in: Duration) -> ClassSession {
        let session = ClassSession::new(ClassType::Crossfit, "t_demo", "gym", T0 + starts_in.as_millis())
            .with_id(id)
            .with_capacity(capacity);
        self.service.upsert_session(session.clone()).await.unwrap();
        session
    }

    /// Session starting in two hours, well inside the enrollment window.
    pub async fn open_session(&self, id: &str, capacity: u32) -> ClassSession {
        self.session(id, capacity, Duration::from_secs(120 * 60)).await
    }

    pub fn advance_minutes(&self, minutes: u64) {
        self.clock.advance(Duration::from_secs(minutes * 60));
    }

    pub fn audit_actions(&self) -> Vec<String> {
        self.audit
            .lock()
            .iter()
            .map(|e| serde_json::to_value(e.action).unwrap().as_str().unwrap().to_string())
            .collect()
    }
}

/// Audit sink whose events stay readable after it is boxed into the service.
pub struct SharedAudit(pub Arc<Mutex<Vec<AuditEvent>>>);

impl AuditSink for SharedAudit {
    fn record(&mut self, event: AuditEvent) {
        self.0.lock().push(event);
    }
}

pub fn minutes(n: u64) -> TimestampMs {
    TimestampMs::from(n) * MINUTE_MS
}
