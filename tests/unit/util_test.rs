//! Tests for utility functions

use std::time::Duration;

use class_booking::util::{new_entry_id, now_ms, Clock, ManualClock, MINUTE_MS};

#[test]
fn test_entry_ids_are_unique() {
    let a = new_entry_id();
    let b = new_entry_id();
    assert_ne!(a, b);
    assert_eq!(a.len(), 36);
}

#[test]
fn test_manual_clock_drives_minutes() {
    let clock = ManualClock::new(0);
    clock.advance(Duration::from_secs(5 * 60));
    assert_eq!(clock.now_ms(), 5 * MINUTE_MS);
}

#[test]
fn test_now_ms_is_monotone_enough() {
    let first = now_ms();
    let second = now_ms();
    assert!(second >= first);
}

#[test]
fn test_tracing_init_is_idempotent() {
    class_booking::util::init_tracing_with_default("class_booking=debug");
    class_booking::util::init_tracing();
}
