//! Request and response middleware.
//!
//! The authenticated client runs an ordered list of request middleware
//! before dispatch and an ordered list of response middleware after it.
//! A response middleware may ask for the request to be replayed; the
//! replay goes through the bare client and skips the remaining chain.

mod bearer;
mod default_headers;
mod refresh;

use async_trait::async_trait;
use pintalk_domain::{RequestSpec, ResponseSpec};

use crate::ClientResult;

pub use bearer::BearerAuth;
pub use default_headers::DefaultHeaders;
pub use refresh::RefreshOnUnauthorized;

/// Transforms a request before it is dispatched.
#[async_trait]
pub trait RequestMiddleware: Send + Sync {
    /// Returns the request to pass to the next middleware.
    ///
    /// # Errors
    ///
    /// An error aborts the call before anything is sent.
    async fn on_request(&self, request: RequestSpec) -> ClientResult<RequestSpec>;
}

/// What to do with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAction {
    /// Hand the response to the next middleware, or to the caller.
    Continue(ResponseSpec),
    /// Send this request once more on the bare client and return its result.
    Replay(RequestSpec),
}

/// Observes a response to the request that produced it.
#[async_trait]
pub trait ResponseMiddleware: Send + Sync {
    /// Decides how the response continues.
    ///
    /// # Errors
    ///
    /// An error is returned to the caller in place of the response.
    async fn on_response(
        &self,
        request: &RequestSpec,
        response: ResponseSpec,
    ) -> ClientResult<ResponseAction>;
}
