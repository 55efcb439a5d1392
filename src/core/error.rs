//! Error types for booking operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by booking components.
///
/// Business-rule variants are expected outcomes that callers render to the
/// acting user; only [`BookingError::StorageUnavailable`] signals an
/// infrastructure failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// Enroll or cancel attempted after the pre-class cutoff.
    #[error("enrollment window closed: changes are allowed until {cutoff_minutes} minutes before class")]
    WindowClosed {
        /// Cutoff in effect, in minutes before the session start.
        cutoff_minutes: u64,
    },
    /// No seat left at the time of enroll or accept.
    #[error("session is full")]
    SessionFull,
    /// Accept attempted without a waitlist entry.
    #[error("user is not on the waitlist")]
    NotWaitlisted,
    /// Accept attempted before the user was promoted.
    #[error("user has not been notified of a free seat yet")]
    NotNotified,
    /// Accept attempted after the acceptance window; the entry was purged.
    #[error("acceptance window expired, rejoin the waitlist")]
    AcceptanceExpired,
    /// Referenced session does not exist.
    #[error("session not found: {0}")]
    SessionNotFound(String),
    /// Session record rejected on write.
    #[error("invalid session: {0}")]
    InvalidSession(String),
    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Session store could not be reached or failed mid-operation.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

/// Serializable discriminant of [`BookingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`BookingError::WindowClosed`].
    WindowClosed,
    /// See [`BookingError::SessionFull`].
    SessionFull,
    /// See [`BookingError::NotWaitlisted`].
    NotWaitlisted,
    /// See [`BookingError::NotNotified`].
    NotNotified,
    /// See [`BookingError::AcceptanceExpired`].
    AcceptanceExpired,
    /// See [`BookingError::SessionNotFound`].
    SessionNotFound,
    /// See [`BookingError::InvalidSession`].
    InvalidSession,
    /// See [`BookingError::InvalidConfig`].
    InvalidConfig,
    /// See [`BookingError::StorageUnavailable`].
    StorageUnavailable,
}

impl BookingError {
    /// Discriminant used in API envelopes and audit records.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::WindowClosed { .. } => ErrorKind::WindowClosed,
            Self::SessionFull => ErrorKind::SessionFull,
            Self::NotWaitlisted => ErrorKind::NotWaitlisted,
            Self::NotNotified => ErrorKind::NotNotified,
            Self::AcceptanceExpired => ErrorKind::AcceptanceExpired,
            Self::SessionNotFound(_) => ErrorKind::SessionNotFound,
            Self::InvalidSession(_) => ErrorKind::InvalidSession,
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Self::StorageUnavailable(_) => ErrorKind::StorageUnavailable,
        }
    }

    /// True for infrastructure failures the caller may retry.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// Map any displayable backend failure into [`BookingError::StorageUnavailable`].
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable(err.to_string())
    }
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
