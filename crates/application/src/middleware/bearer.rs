//! Bearer token decoration.

use std::sync::Arc;

use async_trait::async_trait;
use pintalk_domain::RequestSpec;
use tracing::debug;

use super::RequestMiddleware;
use crate::ClientResult;
use crate::ports::TokenStore;

/// Sets `Authorization: Bearer <token>` from the token store.
///
/// Leaves the request untouched when no token is stored.
pub struct BearerAuth {
    store: Arc<dyn TokenStore>,
}

impl BearerAuth {
    /// Creates the middleware reading tokens from `store`.
    #[must_use]
    pub const fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RequestMiddleware for BearerAuth {
    async fn on_request(&self, mut request: RequestSpec) -> ClientResult<RequestSpec> {
        if let Some(token) = self.store.access_token().await? {
            debug!(request_id = %request.id, token = %token.preview(), "attaching bearer token");
            request.set_bearer(&token);
        }
        Ok(request)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MemoryTokenStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_no_token_no_header() {
        let middleware = BearerAuth::new(Arc::new(MemoryTokenStore::new()));
        let request = middleware
            .on_request(RequestSpec::get("users/"))
            .await
            .unwrap();
        assert_eq!(request.authorization(), None);
    }

    #[tokio::test]
    async fn test_stored_token_overrides_header() {
        let middleware = BearerAuth::new(Arc::new(MemoryTokenStore::with_access_token("tok")));
        let request = middleware
            .on_request(RequestSpec::get("users/").with_header("Authorization", "Bearer stale"))
            .await
            .unwrap();
        assert_eq!(request.authorization(), Some("Bearer tok"));
    }
}
