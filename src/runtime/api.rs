//! Response envelopes for presentation collaborators.

use serde::{Deserialize, Serialize};

use crate::core::{BookingError, ErrorKind};

/// Error part of a [`BookingResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable machine-readable kind.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: String,
}

impl From<&BookingError> for ErrorBody {
    fn from(err: &BookingError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Uniform result envelope for any booking operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingResponse<T> {
    /// True when the operation succeeded.
    pub ok: bool,
    /// Operation output on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Failure details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T> BookingResponse<T> {
    /// Successful envelope.
    pub const fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Failed envelope.
    pub fn failure(err: &BookingError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(ErrorBody::from(err)),
        }
    }

    /// Wrap the result of a service call.
    pub fn from_result(result: Result<T, BookingError>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(&e),
        }
    }
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Return a health payload.
pub const fn health() -> Health {
    Health { ok: true }
}
