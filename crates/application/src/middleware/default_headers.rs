//! Applies the session context defaults.

use std::sync::Arc;

use async_trait::async_trait;
use pintalk_domain::RequestSpec;

use super::RequestMiddleware;
use crate::{ClientResult, SessionContext};

/// Copies every default header the request does not already carry.
pub struct DefaultHeaders {
    session: Arc<SessionContext>,
}

impl DefaultHeaders {
    /// Creates the middleware reading defaults from `session`.
    #[must_use]
    pub const fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl RequestMiddleware for DefaultHeaders {
    async fn on_request(&self, mut request: RequestSpec) -> ClientResult<RequestSpec> {
        for header in self.session.default_headers().iter() {
            request
                .headers
                .set_if_absent(header.name.clone(), header.value.clone());
        }
        Ok(request)
    }
}
