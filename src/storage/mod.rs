//! Persisted key-value store abstraction
//!
//! The engine consumes a small key-value surface for credentials, rate
//! limiter state, the rate tier, and the preferred-provider flag. Two
//! backends are provided: an in-memory map for tests and embedding, and a
//! single-document JSON file for real persistence across process restarts.

use crate::error::{GlossaError, GlossaResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::RwLock;

/// Async key-value store interface
#[async_trait]
pub trait KvStore: Send + Sync + std::fmt::Debug {
    /// Get a value by key
    async fn get(&self, key: &str) -> GlossaResult<Option<Value>>;

    /// Set a value under a key
    async fn set(&self, key: &str, value: Value) -> GlossaResult<()>;

    /// Remove a key
    async fn remove(&self, key: &str) -> GlossaResult<()>;
}

/// In-memory key-value store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> GlossaResult<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> GlossaResult<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> GlossaResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Key-value store persisted as a single JSON document on disk
///
/// The whole document is read and rewritten on every mutation. There is no
/// cross-process lock: two processes writing through the same file can each
/// observe state the other is about to overwrite. Callers that need stronger
/// guarantees must serialize access themselves.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Guards read-modify-write cycles within this process.
    write_lock: Arc<RwLock<()>>,
}

impl JsonFileStore {
    /// Create a store backed by the given file path
    ///
    /// The file and its parent directory are created lazily on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Arc::new(RwLock::new(())),
        }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_document(&self) -> GlossaResult<HashMap<String, Value>> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                GlossaError::storage(format!(
                    "corrupt store file {}: {}",
                    self.path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(GlossaError::storage(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn save_document(&self, document: &HashMap<String, Value>) -> GlossaResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                GlossaError::storage(format!(
                    "failed to create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        let serialized = serde_json::to_string_pretty(document)?;
        fs::write(&self.path, serialized).await.map_err(|e| {
            GlossaError::storage(format!("failed to write {}: {}", self.path.display(), e))
        })
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    async fn get(&self, key: &str) -> GlossaResult<Option<Value>> {
        let _guard = self.write_lock.read().await;
        let document = self.load_document().await?;
        Ok(document.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> GlossaResult<()> {
        let _guard = self.write_lock.write().await;
        let mut document = self.load_document().await?;
        document.insert(key.to_string(), value);
        self.save_document(&document).await
    }

    async fn remove(&self, key: &str) -> GlossaResult<()> {
        let _guard = self.write_lock.write().await;
        let mut document = self.load_document().await?;
        if document.remove(key).is_some() {
            self.save_document(&document).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());

        store.set("k", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!({"a": 1})));

        store.remove("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("glossa").join("store.json");

        let store = JsonFileStore::new(&path);
        assert!(store.get("k").await.unwrap().is_none());

        store.set("k", json!("value")).await.unwrap();
        store.set("n", json!(42)).await.unwrap();

        // A second store over the same file sees the persisted document.
        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("k").await.unwrap(), Some(json!("value")));
        assert_eq!(reopened.get("n").await.unwrap(), Some(json!(42)));
    }

    #[tokio::test]
    async fn file_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::new(&path);
        store.set("k", json!(1)).await.unwrap();
        store.remove("k").await.unwrap();

        let reopened = JsonFileStore::new(&path);
        assert!(reopened.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_reports_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        let err = store.get("k").await.unwrap_err();
        assert!(matches!(err, GlossaError::Storage { .. }));
    }
}
