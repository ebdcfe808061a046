//! Token store port
//!
//! Defines the interface for the client-local persistent session storage.

use async_trait::async_trait;
use pintalk_domain::{AccessToken, StorageKey};

/// Errors that can occur during token store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value storage for session state.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError>;

    /// Deletes `key`. Deleting a missing key is not an error.
    async fn remove(&self, key: StorageKey) -> Result<(), StorageError>;

    /// Reads the stored access token.
    ///
    /// An empty stored string counts as no token.
    async fn access_token(&self) -> Result<Option<AccessToken>, StorageError> {
        Ok(self
            .get(StorageKey::AccessToken)
            .await?
            .and_then(|raw| AccessToken::new(raw).ok()))
    }

    /// Stores the access token.
    async fn set_access_token(&self, token: &AccessToken) -> Result<(), StorageError> {
        self.set(StorageKey::AccessToken, token.as_str()).await
    }

    /// Deletes the session id and the access token.
    async fn clear_session(&self) -> Result<(), StorageError> {
        for key in StorageKey::ALL {
            self.remove(key).await?;
        }
        Ok(())
    }
}
