//! Session bootstrap and teardown use case.

use std::sync::Arc;

use pintalk_domain::{AccessToken, StorageKey};
use tracing::info;

use crate::ClientResult;
use crate::auth::SessionContext;
use crate::ports::TokenStore;

/// Input for starting a session after a successful login.
#[derive(Debug, Clone)]
pub struct BeginSessionInput {
    /// The signed-in account's session identifier.
    pub session_id: String,
    /// The access token issued at login.
    pub access_token: String,
}

/// Use case owning the lifecycle of the stored session.
///
/// Login stores the identifiers and installs the default header; logout
/// removes both. The authenticated client reads the same store and
/// session context.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    session: Arc<SessionContext>,
}

impl SessionManager {
    /// Creates a new `SessionManager` use case.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>, session: Arc<SessionContext>) -> Self {
        Self { store, session }
    }

    /// Persists the login result and sets the default `Authorization` header.
    ///
    /// # Errors
    /// - Returns a domain error if the access token is empty
    /// - Returns a storage error if the store cannot be written
    pub async fn begin(&self, input: BeginSessionInput) -> ClientResult<()> {
        let token = AccessToken::new(input.access_token)?;
        self.store
            .set(StorageKey::SessionId, &input.session_id)
            .await?;
        self.store.set_access_token(&token).await?;
        self.session.set_author_header(token.as_str());
        info!(session_id = %input.session_id, token = %token.preview(), "session started");
        Ok(())
    }

    /// Removes the stored session and the default `Authorization` header.
    ///
    /// Calling this without an active session is a no-op.
    ///
    /// # Errors
    /// Returns a storage error if the store cannot be written.
    pub async fn end(&self) -> ClientResult<()> {
        self.session.unset_author_header();
        self.store.clear_session().await?;
        info!("session ended");
        Ok(())
    }

    /// Returns the stored access token.
    ///
    /// # Errors
    /// Returns a storage error if the store cannot be read.
    pub async fn current_token(&self) -> ClientResult<Option<AccessToken>> {
        Ok(self.store.access_token().await?)
    }

    /// Returns the stored session identifier.
    ///
    /// # Errors
    /// Returns a storage error if the store cannot be read.
    pub async fn session_id(&self) -> ClientResult<Option<String>> {
        Ok(self.store.get(StorageKey::SessionId).await?)
    }

    /// Returns true if an access token is stored.
    ///
    /// # Errors
    /// Returns a storage error if the store cannot be read.
    pub async fn is_authenticated(&self) -> ClientResult<bool> {
        Ok(self.current_token().await?.is_some())
    }
}
