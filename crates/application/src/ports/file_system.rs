//! File system port

use std::future::Future;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised by file system operations.
#[derive(Debug, Error)]
pub enum FileSystemError {
    /// The path does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Access to the path was denied.
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<FileSystemError> for std::io::Error {
    fn from(e: FileSystemError) -> Self {
        match e {
            FileSystemError::Io(io_err) => io_err,
            FileSystemError::NotFound(path) => {
                Self::new(std::io::ErrorKind::NotFound, path.display().to_string())
            }
            FileSystemError::PermissionDenied(path) => {
                Self::new(std::io::ErrorKind::PermissionDenied, path.display().to_string())
            }
        }
    }
}

/// Port for the file operations the persistence adapters need.
pub trait FileSystem: Send + Sync {
    /// Reads a whole file.
    fn read_file(&self, path: &Path)
    -> impl Future<Output = Result<Vec<u8>, FileSystemError>> + Send;

    /// Replaces the contents of a file, creating parent directories.
    ///
    /// The new contents become visible all at once.
    fn write_file(
        &self,
        path: &Path,
        contents: &[u8],
    ) -> impl Future<Output = Result<(), FileSystemError>> + Send;

    /// Deletes a file.
    fn remove_file(&self, path: &Path) -> impl Future<Output = Result<(), FileSystemError>> + Send;

    /// Returns true if the path exists.
    fn exists(&self, path: &Path) -> impl Future<Output = bool> + Send;
}
