//! Local key/value store for client state that should survive restarts

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no record stored under '{0}'")]
    NotFound(String),

    #[error("a record already exists under '{0}'")]
    AlreadyExists(String),

    #[error("store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("record could not be encoded: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Blob store with the read / create / update lifecycle the playlist expects
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn read(&self, key: &str) -> Result<Value, StoreError>;

    /// Fails with [`StoreError::AlreadyExists`] if the key is taken
    async fn create(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Overwrites the record, creating it if needed (last write wins)
    async fn update(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// One JSON file per key inside a data directory
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }

    async fn write(&self, path: &Path, value: &Value) -> Result<(), StoreError> {
        if !tokio::fs::try_exists(&self.dir).await? {
            tokio::fs::create_dir_all(&self.dir).await?;
        }

        let content = serde_json::to_vec_pretty(value)?;
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, path).await?;
        Ok(())
    }
}

#[async_trait]
impl LocalStore for JsonFileStore {
    async fn read(&self, key: &str) -> Result<Value, StoreError> {
        let path = self.path_for(key);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_slice(&content)?)
    }

    async fn create(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if tokio::fs::try_exists(&path).await? {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        self.write(&path, &value).await
    }

    async fn update(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.path_for(key);
        self.write(&path, &value).await
    }
}

/// In-process store; nothing outlives the session
#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn read(&self, key: &str) -> Result<Value, StoreError> {
        let records = self.records.read().await;
        records
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn create(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(key) {
            return Err(StoreError::AlreadyExists(key.to_string()));
        }
        records.insert(key.to_string(), value);
        Ok(())
    }

    async fn update(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    /// Store with nothing in it that refuses every write
    pub(crate) struct FailingStore;

    #[async_trait]
    impl LocalStore for FailingStore {
        async fn read(&self, key: &str) -> Result<Value, StoreError> {
            Err(StoreError::NotFound(key.to_string()))
        }

        async fn create(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Io(io::Error::other("disk full")))
        }

        async fn update(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
            Err(StoreError::Io(io::Error::other("disk full")))
        }
    }

    #[tokio::test]
    async fn test_file_store_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("data"));

        assert!(matches!(store.read("playlist").await, Err(StoreError::NotFound(_))));

        store.create("playlist", json!({ "position": -1 })).await.unwrap();
        assert_eq!(store.read("playlist").await.unwrap()["position"], -1);

        assert!(matches!(
            store.create("playlist", json!({})).await,
            Err(StoreError::AlreadyExists(_))
        ));

        store.update("playlist", json!({ "position": 2 })).await.unwrap();
        assert_eq!(store.read("playlist").await.unwrap()["position"], 2);
        assert!(store.dir().join("playlist.json").exists());
        assert!(!store.dir().join("playlist.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_store_survives_new_instance() {
        let temp_dir = TempDir::new().unwrap();
        {
            let store = JsonFileStore::new(temp_dir.path());
            store.update("playlist", json!({ "id": "playlist" })).await.unwrap();
        }
        let store = JsonFileStore::new(temp_dir.path());
        assert_eq!(store.read("playlist").await.unwrap()["id"], "playlist");
    }

    #[tokio::test]
    async fn test_file_store_rejects_corrupt_record() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("playlist.json"), "{ not json").unwrap();
        let store = JsonFileStore::new(temp_dir.path());
        assert!(matches!(store.read("playlist").await, Err(StoreError::Serialize(_))));
    }

    #[tokio::test]
    async fn test_memory_store_lifecycle() {
        let store = MemoryStore::new();
        assert!(matches!(store.read("k").await, Err(StoreError::NotFound(_))));
        store.create("k", json!(1)).await.unwrap();
        assert!(matches!(store.create("k", json!(2)).await, Err(StoreError::AlreadyExists(_))));
        store.update("k", json!(3)).await.unwrap();
        assert_eq!(store.read("k").await.unwrap(), json!(3));
    }
}
