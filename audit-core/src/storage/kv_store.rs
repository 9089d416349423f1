//! src/storage/kv_store.rs
//! ============================================================================
//! # KeyValueStore: string blobs under string keys
//!
//! The checklist persists a handful of JSON blobs (records, view state, ...)
//! side by side, the way a browser's local storage would hold them.
//! [`MemoryStore`] backs tests and embedders; [`DirStore`] keeps one file
//! per key in a data directory and writes atomically (temp file + rename).

use async_trait::async_trait;
use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs as TokioFs, sync::RwLock};
use tracing::{debug, trace};

use crate::error::AppError;

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    async fn remove(&self, key: &str) -> Result<(), AppError>;
}

/* =========================== MemoryStore ============================ */

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/* ============================= DirStore ============================= */

/// One `<key>.json` file per key inside `root`.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        TokioFs::create_dir_all(&root)
            .await
            .map_err(|e| AppError::storage_io(&root, e))?;
        debug!("storage opened at {}", root.display());
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(AppError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for DirStore {
    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.key_path(key)?;
        match TokioFs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::storage_io(path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.key_path(key)?;
        let temp = path.with_extension("json.tmp");

        TokioFs::write(&temp, value)
            .await
            .map_err(|e| AppError::storage_io(&temp, e))?;
        TokioFs::rename(&temp, &path)
            .await
            .map_err(|e| AppError::storage_io(&path, e))?;

        trace!(key, bytes = value.len(), "storage key written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), AppError> {
        let path = self.key_path(key)?;
        match TokioFs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage_io(path, e)),
        }
    }
}
