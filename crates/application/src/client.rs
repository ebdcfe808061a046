//! The authenticated HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use pintalk_domain::{HttpMethod, RequestSpec, ResponseSpec};
use serde::Serialize;
use tracing::debug;

use crate::auth::{RefreshCoordinator, SessionContext};
use crate::middleware::{
    BearerAuth, DefaultHeaders, RefreshOnUnauthorized, RequestMiddleware, ResponseAction,
    ResponseMiddleware,
};
use crate::ports::{HttpClient, Navigator, TokenStore};
use crate::{ClientError, ClientResult};

/// Path of the token refresh endpoint, relative to the API base URL.
pub const REFRESH_PATH: &str = "auth/token/refresh/";

/// HTTP client that decorates requests and recovers from expired tokens.
///
/// Wraps a bare [`HttpClient`]. Requests pass through the request
/// middleware in order, are sent on the bare client, and the response
/// passes through the response middleware in order. Replays requested by
/// a response middleware are sent on the bare client directly, so a
/// replayed request is never intercepted a second time.
pub struct AuthenticatedClient {
    bare: Arc<dyn HttpClient>,
    session: Arc<SessionContext>,
    request_middleware: Vec<Arc<dyn RequestMiddleware>>,
    response_middleware: Vec<Arc<dyn ResponseMiddleware>>,
}

impl AuthenticatedClient {
    /// Starts building a client over `bare` with an empty pipeline.
    #[must_use]
    pub fn builder(bare: Arc<dyn HttpClient>) -> AuthenticatedClientBuilder {
        AuthenticatedClientBuilder {
            bare,
            session: Arc::new(SessionContext::new()),
            request_middleware: Vec::new(),
            response_middleware: Vec::new(),
        }
    }

    /// Builds the standard session pipeline.
    ///
    /// Request side: session defaults, then the stored bearer token.
    /// Response side: refresh-and-replay on 401 against [`REFRESH_PATH`].
    #[must_use]
    pub fn with_session_refresh(
        bare: Arc<dyn HttpClient>,
        store: Arc<dyn TokenStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let session = Arc::new(SessionContext::json_api());
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::clone(&bare),
            Arc::clone(&store),
            Arc::clone(&session),
            navigator,
            REFRESH_PATH,
        ));

        Self::builder(bare)
            .session(Arc::clone(&session))
            .request_middleware(DefaultHeaders::new(session))
            .request_middleware(BearerAuth::new(store))
            .response_middleware(RefreshOnUnauthorized::new(coordinator))
            .build()
    }

    /// Returns the session context holding this client's default headers.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Sets the default `Authorization` header. Empty tokens are ignored.
    pub fn set_author_header(&self, token: &str) {
        self.session.set_author_header(token);
    }

    /// Removes the default `Authorization` header.
    pub fn unset_author_header(&self) {
        self.session.unset_author_header();
    }

    /// Sends a request and rejects non-2xx responses.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] for any non-2xx final response, and
    /// passes through every other pipeline error.
    pub async fn request(&self, request: RequestSpec) -> ClientResult<ResponseSpec> {
        let response = self.execute(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ClientError::Status(Box::new(response)))
        }
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedClient::request`].
    pub async fn get(&self, url: &str) -> ClientResult<ResponseSpec> {
        self.request(RequestSpec::get(url)).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`AuthenticatedClient::request`].
    pub async fn delete(&self, url: &str) -> ClientResult<ResponseSpec> {
        self.request(RequestSpec::new(HttpMethod::Delete, url)).await
    }

    /// Sends `body` as JSON with the given method.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidBody`] if `body` cannot be serialized,
    /// otherwise see [`AuthenticatedClient::request`].
    pub async fn send_json<T: Serialize + Sync>(
        &self,
        method: HttpMethod,
        url: &str,
        body: &T,
    ) -> ClientResult<ResponseSpec> {
        let request = RequestSpec::new(method, url)
            .with_json(body)
            .map_err(|e| ClientError::InvalidBody(e.to_string()))?;
        self.request(request).await
    }
}

#[async_trait]
impl HttpClient for AuthenticatedClient {
    async fn execute(&self, request: RequestSpec) -> ClientResult<ResponseSpec> {
        let mut request = request;
        for middleware in &self.request_middleware {
            request = middleware.on_request(request).await?;
        }

        debug!(request_id = %request.id, method = %request.method, url = %request.url, "dispatching request");
        let mut response = self.bare.execute(request.clone()).await?;

        for middleware in &self.response_middleware {
            match middleware.on_response(&request, response).await? {
                ResponseAction::Continue(next) => response = next,
                ResponseAction::Replay(replay) => {
                    debug!(request_id = %replay.id, url = %replay.url, "replaying request on bare client");
                    return self.bare.execute(replay).await;
                }
            }
        }

        debug!(request_id = %request.id, status = response.status, "request completed");
        Ok(response)
    }
}

/// Composes an [`AuthenticatedClient`] pipeline.
pub struct AuthenticatedClientBuilder {
    bare: Arc<dyn HttpClient>,
    session: Arc<SessionContext>,
    request_middleware: Vec<Arc<dyn RequestMiddleware>>,
    response_middleware: Vec<Arc<dyn ResponseMiddleware>>,
}

impl AuthenticatedClientBuilder {
    /// Uses an existing session context instead of a fresh one.
    #[must_use]
    pub fn session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = session;
        self
    }

    /// Appends a request middleware.
    #[must_use]
    pub fn request_middleware(mut self, middleware: impl RequestMiddleware + 'static) -> Self {
        self.request_middleware.push(Arc::new(middleware));
        self
    }

    /// Appends a response middleware.
    #[must_use]
    pub fn response_middleware(mut self, middleware: impl ResponseMiddleware + 'static) -> Self {
        self.response_middleware.push(Arc::new(middleware));
        self
    }

    /// Finishes the client.
    #[must_use]
    pub fn build(self) -> AuthenticatedClient {
        AuthenticatedClient {
            bare: self.bare,
            session: self.session,
            request_middleware: self.request_middleware,
            response_middleware: self.response_middleware,
        }
    }
}
