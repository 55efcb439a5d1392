//! Tests for audit sink

use class_booking::core::{build_audit_event, AuditAction, AuditSink, InMemoryAuditSink, TracingAuditSink};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event("s1", "alice", AuditAction::Enroll, 1_000, Some("seat 1".to_string()));

    sink.record(event.clone());
    assert_eq!(sink.events().len(), 1);

    let events = sink.events();
    assert_eq!(events[0].event_id, event.event_id);
    assert_eq!(events[0].session_id, "s1");
    assert_eq!(events[0].action, AuditAction::Enroll);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("s1", "a", AuditAction::Enroll, 1, None));
    sink.record(build_audit_event("s1", "b", AuditAction::JoinWaitlist, 2, None));
    sink.record(build_audit_event("s1", "c", AuditAction::JoinWaitlist, 3, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].user_id, "b"); // oldest dropped
    assert_eq!(events[1].user_id, "c");
}

#[test]
fn test_zero_capacity_sink_keeps_nothing() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event("s1", "a", AuditAction::Cancel, 1, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event("s9", "bob", AuditAction::Reject, 42, Some("SessionFull".to_string()));

    assert!(!event.event_id.is_empty());
    assert_eq!(event.session_id, "s9");
    assert_eq!(event.user_id, "bob");
    assert_eq!(event.action, AuditAction::Reject);
    assert_eq!(event.created_at_ms, 42);
    assert_eq!(event.detail, Some("SessionFull".to_string()));

    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["action"], "reject");
}

#[test]
fn test_tracing_sink_accepts_events() {
    let mut sink = TracingAuditSink;
    sink.record(build_audit_event("s1", "a", AuditAction::Notify, 1, None));
}
