//! Notification gateway abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::BookingError;

/// A "seat available" message addressed to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Session the seat belongs to.
    pub session_id: String,
    /// Recipient.
    pub user_id: String,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub message: String,
}

/// Delivery channel for promotion notices.
///
/// The booking engine only emits the trigger; transport, retries and
/// delivery receipts belong to the implementation.
#[async_trait]
pub trait NotificationGateway: Send + Sync + 'static {
    /// Deliver a notice to `user_id` about `session_id`.
    async fn notify_user(
        &self,
        session_id: &str,
        user_id: &str,
        title: &str,
        message: &str,
    ) -> Result<(), BookingError>;
}
