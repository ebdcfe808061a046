//! File-based token store.
//!
//! The session is kept in a small JSON file, `.pintalk/session.json` by
//! default:
//! ```json
//! {
//!   "access_token": "eyJhbGciOi...",
//!   "pintalk_id": "42"
//! }
//! ```
//! The file should not be committed or shared; it holds a live credential.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pintalk_application::{StorageError, TokenStore};
use pintalk_domain::StorageKey;
use tokio::sync::Mutex;

type SessionFile = BTreeMap<String, String>;

/// Token store persisted to a JSON file.
///
/// Every operation reads the file, so several processes sharing a file see
/// each other's writes. Writes go to a temporary file that is then renamed
/// over the original.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the session file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<SessionFile, StorageError> {
        match tokio::fs::read(&self.path).await {
            Ok(content) => serde_json::from_slice(&content)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionFile::new()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }

    async fn save(&self, values: &SessionFile) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut content = serde_json::to_vec_pretty(values)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        content.push(b'\n');

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &content).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn update(
        &self,
        apply: impl FnOnce(&mut SessionFile) -> bool + Send,
    ) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.load().await?;
        if apply(&mut values) {
            self.save(&values).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: StorageKey) -> Result<Option<String>, StorageError> {
        Ok(self.load().await?.remove(key.as_str()))
    }

    async fn set(&self, key: StorageKey, value: &str) -> Result<(), StorageError> {
        let value = value.to_string();
        self.update(move |values| {
            values.insert(key.as_str().to_string(), value);
            true
        })
        .await
    }

    async fn remove(&self, key: StorageKey) -> Result<(), StorageError> {
        self.update(|values| values.remove(key.as_str()).is_some())
            .await
    }

    async fn clear_session(&self) -> Result<(), StorageError> {
        self.update(|values| {
            let before = values.len();
            for key in StorageKey::ALL {
                values.remove(key.as_str());
            }
            before != values.len()
        })
        .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session.json"));

        assert_eq!(store.access_token().await.unwrap(), None);
        store.remove(StorageKey::AccessToken).await.unwrap();
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_values_survive_a_new_instance() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileTokenStore::new(&path);
        store.set(StorageKey::AccessToken, "tok").await.unwrap();
        store.set(StorageKey::SessionId, "42").await.unwrap();

        let reopened = FileTokenStore::new(&path);
        assert_eq!(
            reopened.get(StorageKey::SessionId).await.unwrap().as_deref(),
            Some("42")
        );
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n  \"access_token\": \"tok\",\n  \"pintalk_id\": \"42\"\n}\n"
        );
    }

    #[tokio::test]
    async fn test_clear_session_keeps_unrelated_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(
            &path,
            r#"{"access_token":"tok","pintalk_id":"42","theme":"dark"}"#,
        )
        .unwrap();

        let store = FileTokenStore::new(&path);
        store.clear_session().await.unwrap();

        let remaining: SessionFile =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining.get("theme").map(String::as_str), Some("dark"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{oops").unwrap();

        let store = FileTokenStore::new(&path);
        assert!(matches!(
            store.get(StorageKey::AccessToken).await,
            Err(StorageError::Serialization(_))
        ));
    }
}
