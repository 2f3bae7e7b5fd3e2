// src/store/mod.rs

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Storage keys. The layout mirrors the browser profile this service
/// replaces, so dumps of the store file stay recognizable.
pub mod keys {
    pub const USERS: &str = "users";
    pub const ACTIVE_USER: &str = "user";
    pub const ASSESSMENTS: &str = "assessments";
    pub const LAST_ASSESSMENT: &str = "lastAssessment";
    pub const CHAT_MESSAGES: &str = "chatMessages";
    pub const USER_SUBSCRIPTION: &str = "userSubscription";
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Key-value persistence collaborator. Values are JSON-encoded blobs;
/// each key is read and written whole, like localStorage entries.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Cloneable handle over a `StorageBackend`.
///
/// Every value that passes through the handle is mirrored in memory. If the
/// primary backend ever fails (disk full, permissions revoked mid-run), the
/// handle logs a warning once and serves the rest of the process lifetime
/// from the mirror instead of surfacing errors to every caller.
#[derive(Clone)]
pub struct Store {
    primary: Arc<dyn StorageBackend>,
    mirror: Arc<MemoryBackend>,
    degraded: Arc<AtomicBool>,
    updates: Arc<Mutex<()>>,
}

impl Store {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            primary: Arc::new(backend),
            mirror: Arc::new(MemoryBackend::new()),
            degraded: Arc::new(AtomicBool::new(false)),
            updates: Arc::new(Mutex::new(())),
        }
    }

    /// A store with no durable backend at all. Used by tests and as the
    /// fallback when the store file cannot be opened at startup.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Serializes logical read-modify-write cycles across the whole store.
    ///
    /// The backend locks only guard individual `get`/`set` calls; a caller
    /// that reads a key, decides, and writes back must hold this guard for
    /// the whole cycle, or two concurrent cycles can both read the old
    /// value and one append is lost (e.g. two registrations passing the
    /// duplicate-email check together).
    pub async fn lock_updates(&self) -> OwnedMutexGuard<()> {
        self.updates.clone().lock_owned().await
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let raw = if self.is_degraded() {
            self.mirror.get(key).await?
        } else {
            match self.primary.get(key).await {
                Ok(value) => {
                    if let Some(v) = &value {
                        self.mirror.set(key, v.clone()).await?;
                    }
                    value
                }
                Err(e) => {
                    self.degrade("read", key, &e);
                    self.mirror.get(key).await?
                }
            }
        };

        raw.map(serde_json::from_value)
            .transpose()
            .map_err(StoreError::from)
    }

    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_value(value)?;
        // Mirror first so a primary failure never loses the write.
        self.mirror.set(key, raw.clone()).await?;

        if !self.is_degraded() {
            if let Err(e) = self.primary.set(key, raw).await {
                self.degrade("write", key, &e);
            }
        }
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.mirror.remove(key).await?;

        if !self.is_degraded() {
            if let Err(e) = self.primary.remove(key).await {
                self.degrade("remove", key, &e);
            }
        }
        Ok(())
    }

    fn degrade(&self, op: &str, key: &str, err: &StoreError) {
        if !self.degraded.swap(true, Ordering::Relaxed) {
            tracing::warn!(
                "Storage {} of '{}' failed ({}); continuing in-memory only for this run",
                op,
                key,
                err
            );
        }
    }
}
