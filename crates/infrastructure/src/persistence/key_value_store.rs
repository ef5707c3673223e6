//! Key-value stores for session state.
//!
//! [`FileKeyValueStore`] keeps every key in one JSON document:
//! ```json
//! {
//!   "accessToken": "eyJ...",
//!   "currentUser": "{\"email\":\"hr@acme.vn\"}",
//!   "refreshToken": "eyJ..."
//! }
//! ```
//! The document is loaded once, cached, and rewritten in full after each
//! batch of changes.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hrm_application::ports::{
    FileSystem, FileSystemError, KeyValueStore, StorageError, StorageWrite,
};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// File name of the session document inside the state directory.
pub const SESSION_FILE: &str = "session.json";

type Document = BTreeMap<String, String>;

fn apply(document: &mut Document, changes: &[StorageWrite<'_>]) {
    for change in changes {
        match *change {
            StorageWrite::Set(key, value) => {
                document.insert(key.to_string(), value.to_string());
            }
            StorageWrite::Remove(key) => {
                document.remove(key);
            }
        }
    }
}

/// File-backed key-value store.
#[derive(Debug)]
pub struct FileKeyValueStore<F> {
    fs: F,
    path: PathBuf,
    cache: Mutex<Option<Document>>,
}

impl<F: FileSystem> FileKeyValueStore<F> {
    /// Creates a store writing `session.json` under `state_dir`.
    pub fn new(fs: F, state_dir: &Path) -> Self {
        Self::at_path(fs, state_dir.join(SESSION_FILE))
    }

    /// Creates a store writing to an exact file.
    pub fn at_path(fs: F, path: PathBuf) -> Self {
        Self {
            fs,
            path,
            cache: Mutex::new(None),
        }
    }

    /// Path of the session document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Document, StorageError> {
        match self.fs.read_file(&self.path).await {
            Ok(bytes) => {
                from_json_bytes(&bytes).map_err(|e| StorageError::Serialization(e.to_string()))
            }
            Err(FileSystemError::NotFound(_)) => Ok(Document::new()),
            Err(e) => Err(StorageError::Io(e.into())),
        }
    }
}

#[async_trait]
impl<F: FileSystem> KeyValueStore for FileKeyValueStore<F> {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.read_document().await?);
        }
        Ok(cache.as_ref().and_then(|document| document.get(key).cloned()))
    }

    async fn write(&self, changes: &[StorageWrite<'_>]) -> Result<(), StorageError> {
        let mut cache = self.cache.lock().await;
        let mut document = match cache.take() {
            Some(document) => document,
            None => self.read_document().await?,
        };
        apply(&mut document, changes);

        if document.is_empty() {
            if self.fs.exists(&self.path).await {
                match self.fs.remove_file(&self.path).await {
                    Ok(()) | Err(FileSystemError::NotFound(_)) => {}
                    Err(e) => return Err(StorageError::Io(e.into())),
                }
            }
        } else {
            let bytes = to_json_stable_bytes(&document)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            self.fs
                .write_file(&self.path, &bytes)
                .await
                .map_err(|e| StorageError::Io(e.into()))?;
        }

        debug!(path = %self.path.display(), keys = document.len(), "session document saved");
        *cache = Some(document);
        Ok(())
    }
}

/// Key-value store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: RwLock<Document>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn write(&self, changes: &[StorageWrite<'_>]) -> Result<(), StorageError> {
        apply(&mut *self.values.write().await, changes);
        Ok(())
    }
}
