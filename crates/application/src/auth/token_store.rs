//! In-memory token storage.
//!
//! Used for ephemeral sessions and as the store behind tests. Persistent
//! storage lives in the infrastructure crate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use pintalk_domain::StorageKey;
use tokio::sync::RwLock;

use crate::ports::{StorageError, TokenStore};

/// Thread-safe in-memory token store.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    values: Arc<RwLock<HashMap<StorageKey, String>>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding an access token.
    #[must_use]
    pub fn with_access_token(token: impl Into<String>) -> Self {
        let mut values = HashMap::new();
        values.insert(StorageKey::AccessToken, token.into());
        Self {
            values: Arc::new(RwLock::new(values)),
        }
    }

    /// Get count of stored values.
    pub async fn count(&self) -> usize {
        self.values.read().await.len()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().await.get(&key).cloned())
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        self.values.write().await.insert(key, value.to_string());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.values.write().await.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryTokenStore::new();
        store.set(StorageKey::SessionId, "42").await.unwrap();
        assert_eq!(
            store.get(StorageKey::SessionId).await.unwrap().as_deref(),
            Some("42")
        );

        store.remove(StorageKey::SessionId).await.unwrap();
        assert_eq!(store.get(StorageKey::SessionId).await.unwrap(), None);
        store.remove(StorageKey::SessionId).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_access_token_reads_as_none() {
        let store = MemoryTokenStore::with_access_token("");
        assert_eq!(store.access_token().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_session_removes_both_keys() {
        let store = MemoryTokenStore::with_access_token("tok");
        store.set(StorageKey::SessionId, "7").await.unwrap();

        store.clear_session().await.unwrap();
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryTokenStore::new();
        let other = store.clone();
        store.set(StorageKey::AccessToken, "tok").await.unwrap();
        assert_eq!(
            other.access_token().await.unwrap().map(|t| t.as_str().to_string()),
            Some("tok".to_string())
        );
    }
}
