//! Tests for the waitlist queue

use std::sync::Arc;
use std::time::Duration;

use class_booking::core::WaitlistQueue;
use class_booking::infra::InMemorySessionStore;
use class_booking::util::ManualClock;

fn queue() -> (WaitlistQueue<InMemorySessionStore>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000));
    let queue = WaitlistQueue::new(Arc::new(InMemorySessionStore::new()), clock.clone());
    (queue, clock)
}

#[tokio::test]
async fn test_fifo_order_by_enqueue_time() {
    let (queue, clock) = queue();
    queue.join("s1", "a").await.unwrap();
    clock.advance(Duration::from_secs(1));
    queue.join("s1", "b").await.unwrap();
    clock.advance(Duration::from_secs(1));
    queue.join("s1", "c").await.unwrap();

    let users: Vec<_> = queue.list("s1").await.unwrap().into_iter().map(|e| e.user_id).collect();
    assert_eq!(users, vec!["a", "b", "c"]);
    assert_eq!(queue.peek_next_unnotified("s1").await.unwrap().unwrap().user_id, "a");
}

#[tokio::test]
async fn test_rejoin_moves_user_to_back() {
    let (queue, clock) = queue();
    queue.join("s1", "a").await.unwrap();
    clock.advance(Duration::from_secs(1));
    queue.join("s1", "b").await.unwrap();
    clock.advance(Duration::from_secs(1));
    queue.join("s1", "a").await.unwrap();

    let entries = queue.list("s1").await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].user_id, "b");
    assert_eq!(entries[1].user_id, "a");
}

#[tokio::test]
async fn test_leave_twice_is_noop() {
    let (queue, _) = queue();
    queue.join("s1", "a").await.unwrap();
    assert!(queue.leave("s1", "a").await.unwrap());
    assert!(!queue.leave("s1", "a").await.unwrap());
    assert!(queue.list("s1").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_notified_skips_entry_in_peek() {
    let (queue, _) = queue();
    let a = queue.join("s1", "a").await.unwrap();
    queue.join("s1", "b").await.unwrap();

    assert!(queue.mark_notified(&a.id, 2_000).await.unwrap());
    assert!(queue.mark_notified(&a.id, 3_000).await.unwrap());
    assert_eq!(
        queue.get_entry("s1", "a").await.unwrap().unwrap().notified_at_ms,
        Some(3_000)
    );
    assert_eq!(queue.peek_next_unnotified("s1").await.unwrap().unwrap().user_id, "b");

    assert!(queue.remove(&a.id).await.unwrap());
    assert!(queue.get_entry("s1", "a").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sessions_do_not_share_queues() {
    let (queue, _) = queue();
    queue.join("s1", "a").await.unwrap();
    queue.join("s2", "b").await.unwrap();
    assert_eq!(queue.list("s1").await.unwrap().len(), 1);
    assert_eq!(queue.peek_next_unnotified("s2").await.unwrap().unwrap().user_id, "b");
}
