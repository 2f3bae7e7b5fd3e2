// src/store/file.rs

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{StorageBackend, StoreError};

/// Single-file JSON store. The whole key-value map lives in memory behind an
/// RwLock and is rewritten to disk on every mutation, so each logical
/// operation is a complete read-modify-write cycle and no two mutations
/// interleave.
pub struct FileBackend {
    path: PathBuf,
    map: RwLock<HashMap<String, Value>>,
}

impl FileBackend {
    /// Opens (or creates) the store file and loads its contents.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let map = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            map: RwLock::new(map),
        })
    }

    async fn persist(&self, map: &HashMap<String, Value>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.map.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut map = self.map.write().await;
        map.insert(key.to_string(), value);
        self.persist(&map).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.map.write().await;
        map.remove(key);
        self.persist(&map).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let backend = FileBackend::open(&path).await.unwrap();
        backend
            .set("greeting", Value::String("hello".into()))
            .await
            .unwrap();
        drop(backend);

        let reopened = FileBackend::open(&path).await.unwrap();
        let value = reopened.get("greeting").await.unwrap();
        assert_eq!(value, Some(Value::String("hello".into())));
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/store.json");

        let backend = FileBackend::open(&path).await.unwrap();
        backend.set("k", Value::Bool(true)).await.unwrap();

        assert!(path.exists());
    }
}
