//! Single-flight token refresh.
//!
//! Every 401 seen by the authenticated client asks the coordinator for a
//! refresh. While one refresh is in flight, later callers join it instead
//! of issuing their own call to the refresh endpoint.
//!
//! A failed refresh tears the session down inside the shared future, so the
//! teardown runs once no matter which caller drives it to completion.

use std::sync::{Arc, Mutex, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use pintalk_domain::{RefreshOutcome, RequestSpec, Route};
use tracing::{info, warn};

use super::SessionContext;
use crate::ports::{HttpClient, Navigator, TokenStore};

type InFlight = Shared<BoxFuture<'static, RefreshTicket>>;

/// Result of a refresh, shared by every caller that joined it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    /// What the refresh endpoint answered.
    pub outcome: RefreshOutcome,
    /// Where the session was sent after a failed refresh.
    pub redirect: Option<Route>,
}

#[derive(Clone)]
struct Deps {
    bare: Arc<dyn HttpClient>,
    store: Arc<dyn TokenStore>,
    session: Arc<SessionContext>,
    navigator: Arc<dyn Navigator>,
}

/// Coordinates calls to the refresh endpoint.
///
/// The refresh request always goes through the bare client so that a
/// failing refresh can never trigger another refresh.
pub struct RefreshCoordinator {
    deps: Deps,
    endpoint: String,
    in_flight: Arc<Mutex<Option<InFlight>>>,
}

impl RefreshCoordinator {
    /// Creates a coordinator posting to `endpoint` through `bare`.
    ///
    /// `store` receives refreshed tokens. On failure the stored session and
    /// the default `Authorization` header on `session` are cleared and
    /// `navigator` is sent to the redirect route.
    pub fn new(
        bare: Arc<dyn HttpClient>,
        store: Arc<dyn TokenStore>,
        session: Arc<SessionContext>,
        navigator: Arc<dyn Navigator>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            deps: Deps {
                bare,
                store,
                session,
                navigator,
            },
            endpoint: endpoint.into(),
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns the refresh endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Refreshes the access token, or joins the refresh already in flight.
    ///
    /// `on_failure` is the redirect used if this call starts the refresh and
    /// it fails; joiners get the route chosen by the caller that started it.
    /// On success the new token has been persisted before this returns.
    pub async fn refresh(&self, on_failure: Route) -> RefreshTicket {
        let future = {
            let mut slot = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            match slot.as_ref() {
                Some(existing) => existing.clone(),
                None => {
                    let future = Self::run(
                        self.deps.clone(),
                        self.endpoint.clone(),
                        on_failure,
                        Arc::clone(&self.in_flight),
                    )
                    .boxed()
                    .shared();
                    *slot = Some(future.clone());
                    future
                }
            }
        };

        future.await
    }

    async fn run(
        deps: Deps,
        endpoint: String,
        on_failure: Route,
        in_flight: Arc<Mutex<Option<InFlight>>>,
    ) -> RefreshTicket {
        let outcome = match deps.bare.execute(RequestSpec::post(endpoint)).await {
            Ok(response) => RefreshOutcome::from_response(&response),
            Err(e) => {
                warn!(error = %e, "token refresh request failed");
                RefreshOutcome::Failed
            }
        };

        let redirect = match &outcome {
            RefreshOutcome::Refreshed(token) => {
                if let Err(e) = deps.store.set_access_token(token).await {
                    warn!(error = %e, "failed to persist refreshed access token");
                }
                info!(token = %token.preview(), "access token refreshed");
                None
            }
            RefreshOutcome::NoRefreshNeeded => {
                info!("refresh endpoint reported no refresh needed");
                None
            }
            RefreshOutcome::Failed => {
                Self::tear_down(&deps, on_failure).await;
                Some(on_failure)
            }
        };

        in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        RefreshTicket { outcome, redirect }
    }

    async fn tear_down(deps: &Deps, route: Route) {
        deps.session.unset_author_header();
        if let Err(e) = deps.store.clear_session().await {
            warn!(error = %e, "failed to clear stored session");
        }
        warn!(%route, "session terminated after failed token refresh");
        deps.navigator.navigate(route);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::MemoryTokenStore;
    use crate::ports::TransportError;
    use crate::testing::{RecordingNavigator, ScriptedClient};
    use pintalk_domain::{AccessToken, HttpMethod, ResponseSpec, StorageKey};
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    const REFRESH: &str = "auth/token/refresh/";

    struct Fixture {
        bare: Arc<ScriptedClient>,
        store: MemoryTokenStore,
        session: Arc<SessionContext>,
        navigator: Arc<RecordingNavigator>,
        coordinator: RefreshCoordinator,
    }

    fn fixture(store: MemoryTokenStore) -> Fixture {
        let bare = Arc::new(ScriptedClient::new());
        let session = Arc::new(SessionContext::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let coordinator = RefreshCoordinator::new(
            bare.clone(),
            Arc::new(store.clone()),
            Arc::clone(&session),
            navigator.clone(),
            REFRESH,
        );
        Fixture {
            bare,
            store,
            session,
            navigator,
            coordinator,
        }
    }

    #[tokio::test]
    async fn test_refresh_persists_new_token() {
        let f = fixture(MemoryTokenStore::with_access_token("old"));
        f.bare.respond(
            HttpMethod::Post,
            REFRESH,
            ResponseSpec::new(200, r#"{"access":"newTok"}"#),
        );

        let ticket = f.coordinator.refresh(Route::Login).await;

        assert_eq!(
            ticket,
            RefreshTicket {
                outcome: RefreshOutcome::Refreshed(AccessToken::new("newTok").unwrap()),
                redirect: None,
            }
        );
        assert_eq!(
            f.store.access_token().await.unwrap(),
            Some(AccessToken::new("newTok").unwrap())
        );
        assert!(f.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn test_no_content_leaves_store_untouched() {
        let f = fixture(MemoryTokenStore::with_access_token("old"));
        f.bare
            .respond(HttpMethod::Post, REFRESH, ResponseSpec::new(204, ""));

        let ticket = f.coordinator.refresh(Route::Login).await;

        assert_eq!(ticket.outcome, RefreshOutcome::NoRefreshNeeded);
        assert_eq!(ticket.redirect, None);
        assert_eq!(
            f.store.access_token().await.unwrap(),
            Some(AccessToken::new("old").unwrap())
        );
    }

    #[tokio::test]
    async fn test_failure_tears_down_session() {
        let f = fixture(MemoryTokenStore::with_access_token("old"));
        f.store.set(StorageKey::SessionId, "7").await.unwrap();
        f.session.set_author_header("old");
        f.bare.fail(
            HttpMethod::Post,
            REFRESH,
            TransportError::ConnectionFailed("reset".to_string()),
        );

        let ticket = f.coordinator.refresh(Route::NotFound).await;

        assert_eq!(ticket.outcome, RefreshOutcome::Failed);
        assert_eq!(ticket.redirect, Some(Route::NotFound));
        assert_eq!(f.store.count().await, 0);
        assert_eq!(f.session.authorization(), None);
        assert_eq!(f.navigator.routes(), vec![Route::NotFound]);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let f = fixture(MemoryTokenStore::new());
        f.bare.respond_after(
            HttpMethod::Post,
            REFRESH,
            ResponseSpec::new(500, ""),
            Duration::from_millis(50),
        );

        let (first, second) = tokio::join!(
            f.coordinator.refresh(Route::Login),
            f.coordinator.refresh(Route::NotFound)
        );

        assert_eq!(f.bare.count(HttpMethod::Post, REFRESH), 1);
        assert_eq!(first, second);
        assert_eq!(first.redirect, Some(Route::Login));
        assert_eq!(f.navigator.routes(), vec![Route::Login]);
    }

    #[tokio::test]
    async fn test_joiner_finishes_teardown_when_starter_is_dropped() {
        let f = fixture(MemoryTokenStore::with_access_token("old"));
        f.bare.respond_after(
            HttpMethod::Post,
            REFRESH,
            ResponseSpec::new(500, ""),
            Duration::from_millis(100),
        );

        let starter = tokio::time::timeout(
            Duration::from_millis(20),
            f.coordinator.refresh(Route::Login),
        );
        let joiner = async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            f.coordinator.refresh(Route::NotFound).await
        };
        let (starter, joiner) = tokio::join!(starter, joiner);

        assert!(starter.is_err());
        assert_eq!(joiner.redirect, Some(Route::Login));
        assert_eq!(f.navigator.routes(), vec![Route::Login]);
        assert_eq!(f.store.count().await, 0);
        assert_eq!(f.bare.count(HttpMethod::Post, REFRESH), 1);
    }

    #[tokio::test]
    async fn test_sequential_refreshes_each_hit_endpoint() {
        let f = fixture(MemoryTokenStore::new());
        f.bare
            .respond(HttpMethod::Post, REFRESH, ResponseSpec::new(204, ""));
        f.bare
            .respond(HttpMethod::Post, REFRESH, ResponseSpec::new(204, ""));

        f.coordinator.refresh(Route::Login).await;
        f.coordinator.refresh(Route::Login).await;
        assert_eq!(f.bare.count(HttpMethod::Post, REFRESH), 2);
    }
}
