//! Tests for the time-window rules

use std::time::Duration;

use class_booking::core::BookingRules;
use class_booking::util::MINUTE_MS;

#[test]
fn test_enrollment_cutoff_boundary() {
    let rules = BookingRules::default();
    let start = 120 * MINUTE_MS;

    assert!(rules.enrollment_open(start, start - 30 * MINUTE_MS));
    assert!(rules.enrollment_open(start, start - 30 * MINUTE_MS - 1_000));
    assert!(!rules.enrollment_open(start, start - 30 * MINUTE_MS + 1_000));
    assert!(!rules.enrollment_open(start, start + 1));
}

#[test]
fn test_session_starting_before_cutoff_span_is_closed() {
    let rules = BookingRules::default();
    assert!(!rules.enrollment_open(10 * MINUTE_MS, 0));
}

#[test]
fn test_acceptance_window_boundary() {
    let rules = BookingRules::default();
    let notified = 1_000_000;

    assert!(rules.within_acceptance(notified, notified));
    assert!(rules.within_acceptance(notified, notified + 5 * MINUTE_MS));
    assert!(!rules.within_acceptance(notified, notified + 5 * MINUTE_MS + 1));
    assert_eq!(rules.accept_deadline(notified), notified + 5 * MINUTE_MS);
}

#[test]
fn test_custom_rules() {
    let rules = BookingRules {
        enrollment_cutoff: Duration::from_secs(10 * 60),
        acceptance_window: Duration::from_secs(60),
    };
    assert_eq!(rules.cutoff_minutes(), 10);
    assert!(!rules.within_acceptance(0, 61_000));
}
