//! Tests for tokio spawner utilities and response envelopes

use class_booking::core::{BookingError, ErrorKind};
use class_booking::runtime::{health, BookingResponse, Spawn, TokioSpawner};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[tokio::test]
async fn test_current_spawner_inside_runtime() {
    assert!(TokioSpawner::current().is_some());
}

#[test]
fn test_current_spawner_outside_runtime() {
    assert!(TokioSpawner::current().is_none());
}

#[test]
fn test_response_from_error() {
    let resp: BookingResponse<u32> =
        BookingResponse::from_result(Err(BookingError::WindowClosed { cutoff_minutes: 30 }));
    assert!(!resp.ok);
    assert_eq!(resp.data, None);
    let err = resp.error.unwrap();
    assert_eq!(err.kind, ErrorKind::WindowClosed);
    assert!(err.message.contains("30 minutes"));
}

#[test]
fn test_health() {
    assert!(health().ok);
}
