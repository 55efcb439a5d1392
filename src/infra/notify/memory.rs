//! In-memory outbox gateway.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{BookingError, Notice, NotificationGateway};

/// Gateway that keeps every notice in memory, keyed by recipient.
///
/// Useful for development and for asserting deliveries in tests.
#[derive(Debug, Default)]
pub struct InMemoryOutbox {
    messages: Mutex<HashMap<String, Vec<Notice>>>,
}

impl InMemoryOutbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices delivered to `user_id`, oldest first, at most `limit`.
    pub fn fetch(&self, user_id: &str, limit: usize) -> Vec<Notice> {
        self.messages
            .lock()
            .get(user_id)
            .map(|msgs| msgs.iter().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    /// Total notices delivered.
    pub fn len(&self) -> usize {
        self.messages.lock().values().map(Vec::len).sum()
    }

    /// True when nothing was delivered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationGateway for InMemoryOutbox {
    async fn notify_user(
        &self,
        session_id: &str,
        user_id: &str,
        title: &str,
        message: &str,
    ) -> Result<(), BookingError> {
        self.messages
            .lock()
            .entry(user_id.to_string())
            .or_default()
            .push(Notice {
                session_id: session_id.to_string(),
                user_id: user_id.to_string(),
                title: title.to_string(),
                message: message.to_string(),
            });
        Ok(())
    }
}
