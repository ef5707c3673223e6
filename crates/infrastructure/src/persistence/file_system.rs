//! Real file system implementation.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hrm_application::ports::{FileSystem, FileSystemError};
use tokio::fs;

/// Real file system implementation using `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileSystem;

impl TokioFileSystem {
    /// Creates a new `TokioFileSystem`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn classify(path: &Path, e: std::io::Error) -> FileSystemError {
    match e.kind() {
        ErrorKind::NotFound => FileSystemError::NotFound(path.to_path_buf()),
        ErrorKind::PermissionDenied => FileSystemError::PermissionDenied(path.to_path_buf()),
        _ => FileSystemError::Io(e),
    }
}

/// Sibling path the new contents are staged in before the rename.
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

impl FileSystem for TokioFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FileSystemError> {
        fs::read(path).await.map_err(|e| classify(path, e))
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), FileSystemError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| classify(parent, e))?;
        }
        let staging = staging_path(path);
        fs::write(&staging, contents)
            .await
            .map_err(|e| classify(&staging, e))?;
        fs::rename(&staging, path)
            .await
            .map_err(|e| classify(path, e))
    }

    async fn remove_file(&self, path: &Path) -> Result<(), FileSystemError> {
        fs::remove_file(path).await.map_err(|e| classify(path, e))
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::metadata(path).await.is_ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parents_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let fs = TokioFileSystem::new();

        fs.write_file(&path, b"one").await.unwrap();
        fs.write_file(&path, b"two").await.unwrap();

        assert_eq!(fs.read_file(&path).await.unwrap(), b"two");
        assert!(!fs.exists(&staging_path(&path)).await);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let fs = TokioFileSystem::new();

        let error = fs.read_file(&dir.path().join("absent")).await.unwrap_err();

        assert!(matches!(error, FileSystemError::NotFound(_)));
    }
}
