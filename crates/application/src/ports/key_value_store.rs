//! Durable key-value storage port
//!
//! Session state is kept as string values under a few fixed keys.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while reading or writing stored values.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// One change applied by [`KeyValueStore::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageWrite<'a> {
    /// Stores `value` under `key`.
    Set(&'a str, &'a str),
    /// Deletes `key`; deleting a missing key is not an error.
    Remove(&'a str),
}

/// Port for string-valued storage that survives restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Applies all `changes` as one unit.
    ///
    /// Readers never observe a partially applied batch.
    async fn write(&self, changes: &[StorageWrite<'_>]) -> Result<(), StorageError>;

    /// Stores a single value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write(&[StorageWrite::Set(key, value)]).await
    }

    /// Deletes a single value.
    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.write(&[StorageWrite::Remove(key)]).await
    }
}
