//! HTTP client port

use async_trait::async_trait;
use pintalk_domain::{RequestSpec, ResponseSpec};
use thiserror::Error;

use crate::ClientResult;

/// Failures where no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request timed out.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The connection was refused.
    #[error("connection refused by {host}")]
    ConnectionRefused {
        /// Target host.
        host: String,
    },

    /// Any other connection failure.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A header could not be encoded.
    #[error("invalid header: {0}")]
    InvalidHeader(String),

    /// The response body could not be read.
    #[error("failed to read body: {0}")]
    Body(String),

    /// Anything else reported by the HTTP library.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// Implementations return `Ok` for every HTTP status they receive,
/// including 4xx and 5xx. `Err` means no usable response was produced.
///
/// Two implementations exist side by side: a bare client that talks to the
/// network directly, and the authenticated client that runs the middleware
/// pipeline on top of a bare client.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Executes an HTTP request and returns the response.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained, or if the
    /// implementation's middleware aborted the call.
    async fn execute(&self, request: RequestSpec) -> ClientResult<ResponseSpec>;
}
