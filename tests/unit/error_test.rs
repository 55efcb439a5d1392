//! Tests for error types

use class_booking::core::{BookingError, ErrorKind};

#[test]
fn test_window_closed_message_names_cutoff() {
    let err = BookingError::WindowClosed { cutoff_minutes: 30 };
    assert_eq!(
        format!("{}", err),
        "enrollment window closed: changes are allowed until 30 minutes before class"
    );
}

#[test]
fn test_session_full_error() {
    let err = BookingError::SessionFull;
    assert_eq!(format!("{}", err), "session is full");
    assert_eq!(err.kind(), ErrorKind::SessionFull);
}

#[test]
fn test_storage_error_is_retryable() {
    let err = BookingError::storage("connection refused");
    assert_eq!(format!("{}", err), "storage unavailable: connection refused");
    assert!(err.is_retryable());
    assert!(!BookingError::NotNotified.is_retryable());
}

#[test]
fn test_error_kind_serializes_snake_case() {
    let json = serde_json::to_string(&ErrorKind::AcceptanceExpired).unwrap();
    assert_eq!(json, "\"acceptance_expired\"");
}
