//! Tests for builder modules

use std::sync::Arc;

use class_booking::builders::{build_service, build_store, seed_week_if_empty, ScheduleBuilder};
use class_booking::config::{BookingConfig, StoreBackendConfig};
use class_booking::core::{BookingError, ClassType, WodType};
use class_booking::infra::{InMemoryOutbox, TracingGateway};
use class_booking::util::{ManualClock, MINUTE_MS};

const DAY_MS: u128 = 24 * 60 * MINUTE_MS;

#[test]
fn test_schedule_builder_defaults() {
    let sessions = ScheduleBuilder::new("gym", "t_demo", 6 * 60 * MINUTE_MS).build();
    assert_eq!(sessions.len(), 21);
    assert!(sessions.iter().all(|s| s.site_id == "gym" && s.teacher_id == "t_demo"));

    let crossfit: Vec<_> = sessions.iter().filter(|s| s.class_type == ClassType::Crossfit).collect();
    assert_eq!(crossfit.len(), 7);
    assert_eq!(crossfit[2].wod, Some(WodType::Allbody));
    assert_eq!(crossfit[3].starts_at_ms - crossfit[2].starts_at_ms, DAY_MS);
}

#[test]
fn test_build_service_rejects_invalid_config() {
    let cfg = BookingConfig {
        acceptance_window_secs: 0,
        ..BookingConfig::default()
    };
    let result = build_service(&cfg, Arc::new(InMemoryOutbox::new()), Arc::new(ManualClock::new(0)));
    assert!(matches!(result, Err(BookingError::InvalidConfig(_))));
}

#[test]
fn test_build_store_file_backend() {
    let dir = std::env::temp_dir().join(format!("class_booking_builder_{}", class_booking::util::new_entry_id()));
    let cfg = BookingConfig {
        store: StoreBackendConfig::File {
            path: dir.clone(),
            stream: "bookings".into(),
        },
        ..BookingConfig::default()
    };
    assert!(build_store(&cfg).is_ok());
    assert!(dir.exists());
    let _ = std::fs::remove_dir_all(dir);
}

#[tokio::test]
async fn test_seed_week_only_when_empty() {
    let anchor = 10 * DAY_MS + 6 * 60 * MINUTE_MS;
    let service = build_service(
        &BookingConfig::default(),
        Arc::new(TracingGateway),
        Arc::new(ManualClock::new(anchor - DAY_MS)),
    )
    .unwrap();

    assert_eq!(seed_week_if_empty(&service, "gym", "t_demo", anchor).await.unwrap(), 21);
    assert_eq!(seed_week_if_empty(&service, "gym", "t_demo", anchor).await.unwrap(), 0);
    assert_eq!(seed_week_if_empty(&service, "annex", "t_demo", anchor).await.unwrap(), 21);

    let week = service
        .list_sessions_in_range("gym", anchor, anchor + 7 * DAY_MS)
        .await
        .unwrap();
    assert_eq!(week.len(), 21);
    assert_eq!(week[0].class_type, ClassType::Crossfit);
    assert_eq!(week[0].starts_at_ms, anchor);
}
