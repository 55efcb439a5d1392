//! Gateway that only logs.

use async_trait::async_trait;

use crate::core::{BookingError, NotificationGateway};

/// Writes each notice to the log instead of delivering it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingGateway;

#[async_trait]
impl NotificationGateway for TracingGateway {
    async fn notify_user(
        &self,
        session_id: &str,
        user_id: &str,
        title: &str,
        message: &str,
    ) -> Result<(), BookingError> {
        tracing::info!(session = session_id, user = user_id, title, message, "seat notice");
        Ok(())
    }
}
