//! Application error types

use pintalk_domain::{DomainError, ResponseSpec, Route};
use thiserror::Error;

use crate::ports::{StorageError, TransportError};

/// Errors surfaced to callers of the session client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// No usable response was received.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with a non-success status.
    #[error("request failed with status {}", .0.status)]
    Status(Box<ResponseSpec>),

    /// The token refresh failed; the session was torn down and the
    /// client navigated to `route`.
    #[error("session terminated, redirected to {route}")]
    SessionTerminated {
        /// Where the client navigated.
        route: Route,
    },

    /// The request body could not be serialized.
    #[error("invalid body: {0}")]
    InvalidBody(String),

    /// The token store could not be read or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// Returns the failed response for [`ClientError::Status`].
    #[must_use]
    pub fn response(&self) -> Option<&ResponseSpec> {
        match self {
            Self::Status(response) => Some(response),
            _ => None,
        }
    }

    /// Returns the HTTP status for [`ClientError::Status`].
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|r| r.status)
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
