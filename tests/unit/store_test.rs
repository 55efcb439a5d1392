//! Tests for the session store backends

use std::sync::Arc;

use class_booking::core::{ClassSession, ClassType, Enrollment, SeatClaim, SessionStore, WaitlistEntry};
use class_booking::infra::{FileSessionStore, InMemorySessionStore};
use class_booking::util::new_entry_id;

fn session(id: &str, site: &str, start: u128) -> ClassSession {
    ClassSession::new(ClassType::Crossfit, "t_demo", site, start).with_id(id)
}

async fn exercise_range_queries(store: Arc<dyn SessionStore>) {
    store.upsert_session(session("late", "gym", 3_000)).await.unwrap();
    store.upsert_session(session("early", "gym", 1_000)).await.unwrap();
    store.upsert_session(session("mid", "gym", 2_000)).await.unwrap();
    store.upsert_session(session("other", "elsewhere", 2_000)).await.unwrap();

    let ids: Vec<_> = store
        .list_sessions_in_range("gym", 1_000, 2_000)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["early", "mid"]);

    assert!(store.list_sessions_in_range("gym", 3_001, 9_000).await.unwrap().is_empty());
}

async fn exercise_capped_insert(store: Arc<dyn SessionStore>) {
    store.upsert_session(session("s1", "gym", 1_000).with_capacity(2)).await.unwrap();

    let claim = |user: &str| Enrollment::new("s1", user, 10);
    assert_eq!(store.insert_enrollment_capped(claim("a"), 2).await.unwrap(), SeatClaim::Claimed);
    assert_eq!(store.insert_enrollment_capped(claim("a"), 2).await.unwrap(), SeatClaim::AlreadyHeld);
    assert_eq!(store.insert_enrollment_capped(claim("b"), 2).await.unwrap(), SeatClaim::Claimed);
    assert_eq!(store.insert_enrollment_capped(claim("c"), 2).await.unwrap(), SeatClaim::Full);
    assert_eq!(store.count_enrollments("s1").await.unwrap(), 2);

    assert!(store.delete_enrollment("s1", "a").await.unwrap());
    assert!(!store.delete_enrollment("s1", "a").await.unwrap());
    assert_eq!(store.count_enrollments("s1").await.unwrap(), 1);
}

async fn exercise_waitlist_rows(store: Arc<dyn SessionStore>) {
    let first = WaitlistEntry::new("s1", "a", 100);
    let second = WaitlistEntry::new("s1", "b", 100);
    store.upsert_waitlist_entry(first.clone()).await.unwrap();
    store.upsert_waitlist_entry(second.clone()).await.unwrap();

    assert_eq!(store.first_unnotified("s1").await.unwrap().unwrap().user_id, "a");
    assert!(store.set_notified(&first.id, 500).await.unwrap());
    assert_eq!(store.first_unnotified("s1").await.unwrap().unwrap().user_id, "b");

    assert!(store.list_notified_before(500).await.unwrap().is_empty());
    assert_eq!(store.list_notified_before(501).await.unwrap().len(), 1);

    assert!(store.delete_waitlist_entry_by_id(&first.id).await.unwrap());
    assert!(!store.set_notified(&first.id, 600).await.unwrap());
    assert_eq!(store.list_waitlist("s1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_in_memory_store_contract() {
    exercise_range_queries(Arc::new(InMemorySessionStore::new())).await;
    exercise_capped_insert(Arc::new(InMemorySessionStore::new())).await;
    exercise_waitlist_rows(Arc::new(InMemorySessionStore::new())).await;
}

#[tokio::test]
async fn test_file_store_contract() {
    let root = std::env::temp_dir().join(format!("class_booking_contract_{}", new_entry_id()));
    exercise_range_queries(Arc::new(FileSessionStore::open(&root, "ranges").unwrap())).await;
    exercise_capped_insert(Arc::new(FileSessionStore::open(&root, "seats").unwrap())).await;
    exercise_waitlist_rows(Arc::new(FileSessionStore::open(&root, "queue").unwrap())).await;

    let reopened = FileSessionStore::open(&root, "queue").unwrap();
    let queue = reopened.list_waitlist("s1").await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].user_id, "b");
    assert!(reopened.file_path().ends_with("queue.json"));

    let _ = std::fs::remove_dir_all(root);
}
