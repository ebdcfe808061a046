//! Refresh-and-replay on 401.

use std::sync::Arc;

use async_trait::async_trait;
use pintalk_domain::{RefreshOutcome, RequestSpec, ResponseSpec, Route};
use tracing::{debug, info};

use super::{ResponseAction, ResponseMiddleware};
use crate::auth::RefreshCoordinator;
use crate::{ClientError, ClientResult};

/// Recovers from expired access tokens.
///
/// On 401 the token is refreshed once and the original request is
/// replayed with the new token. A 204 from the refresh endpoint hands the
/// original 401 back to the caller. Any other refresh failure ends the
/// session; the coordinator has already torn it down when this returns.
pub struct RefreshOnUnauthorized {
    coordinator: Arc<RefreshCoordinator>,
}

impl RefreshOnUnauthorized {
    /// Creates the middleware.
    #[must_use]
    pub const fn new(coordinator: Arc<RefreshCoordinator>) -> Self {
        Self { coordinator }
    }
}

#[async_trait]
impl ResponseMiddleware for RefreshOnUnauthorized {
    async fn on_response(
        &self,
        request: &RequestSpec,
        response: ResponseSpec,
    ) -> ClientResult<ResponseAction> {
        if !response.is_unauthorized() {
            return Ok(ResponseAction::Continue(response));
        }

        debug!(request_id = %request.id, url = %request.url, "401 received, refreshing token");
        let on_failure = Route::for_failed_refresh(&response);
        let ticket = self.coordinator.refresh(on_failure).await;

        match ticket.outcome {
            RefreshOutcome::Refreshed(token) => {
                let mut replay = request.clone();
                replay.set_bearer(&token);
                info!(request_id = %request.id, "replaying request with refreshed token");
                Ok(ResponseAction::Replay(replay))
            }
            RefreshOutcome::NoRefreshNeeded => Ok(ResponseAction::Continue(response)),
            RefreshOutcome::Failed => Err(ClientError::SessionTerminated {
                route: ticket.redirect.unwrap_or(on_failure),
            }),
        }
    }
}
