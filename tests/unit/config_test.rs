//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use class_booking::config::{BookingConfig, StoreBackendConfig, SweepConfig};

#[test]
fn test_defaults_match_booking_rules() {
    let cfg = BookingConfig::default();
    assert!(cfg.validate().is_ok());
    let rules = cfg.rules();
    assert_eq!(rules.enrollment_cutoff, Duration::from_secs(30 * 60));
    assert_eq!(rules.acceptance_window, Duration::from_secs(5 * 60));
    assert_eq!(cfg.store, StoreBackendConfig::InMemory);
    assert!(!cfg.sweep.enabled);
}

#[test]
fn test_zero_acceptance_window_rejected() {
    let cfg = BookingConfig {
        acceptance_window_secs: 0,
        ..BookingConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_enabled_sweep_needs_interval() {
    let cfg = BookingConfig {
        sweep: SweepConfig {
            enabled: true,
            interval_secs: 0,
        },
        ..BookingConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_file_store_needs_path() {
    let cfg = BookingConfig {
        store: StoreBackendConfig::File {
            path: "".into(),
            stream: "bookings".into(),
        },
        ..BookingConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn test_from_json_str_applies_defaults() {
    let json = r#"{
        "enrollment_cutoff_secs": 600,
        "store": { "kind": "file", "path": "/var/lib/booking" },
        "sweep": { "enabled": true }
    }"#;

    let cfg = BookingConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.enrollment_cutoff_secs, 600);
    assert_eq!(cfg.acceptance_window_secs, 300);
    assert_eq!(
        cfg.store,
        StoreBackendConfig::File {
            path: "/var/lib/booking".into(),
            stream: "bookings".into(),
        }
    );
    assert!(cfg.sweep.enabled);
    assert_eq!(cfg.sweep.interval_secs, 30);
    assert_eq!(cfg.audit_capacity, 1024);
}

#[test]
fn test_from_json_str_rejects_invalid() {
    assert!(BookingConfig::from_json_str("{ not json").is_err());
    assert!(BookingConfig::from_json_str(r#"{ "acceptance_window_secs": 0 }"#).is_err());
}

#[test]
fn test_from_lookup_overrides() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("BOOKING_CUTOFF_SECS", "900"),
        ("BOOKING_ACCEPT_WINDOW_SECS", "120"),
        ("BOOKING_SWEEP_INTERVAL_SECS", "10"),
    ]);

    let cfg = BookingConfig::from_lookup(|k| vars.get(k).map(|v| (*v).to_string())).unwrap();
    assert_eq!(cfg.enrollment_cutoff_secs, 900);
    assert_eq!(cfg.acceptance_window_secs, 120);
    assert!(cfg.sweep.enabled);
    assert_eq!(cfg.sweep.interval_secs, 10);
    assert_eq!(cfg.store, StoreBackendConfig::InMemory);
}

#[test]
fn test_from_lookup_rejects_garbage_number() {
    let result = BookingConfig::from_lookup(|k| (k == "BOOKING_CUTOFF_SECS").then(|| "soon".to_string()));
    assert!(result.is_err());
}

#[test]
fn test_from_lookup_empty_is_default() {
    let cfg = BookingConfig::from_lookup(|_| None).unwrap();
    assert_eq!(cfg, BookingConfig::default());
}
