//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod file_system;
mod http_client;
mod key_value_store;
mod notifier;
mod session_api;

pub use file_system::{FileSystem, FileSystemError};
pub use http_client::{HttpClient, HttpClientError, HttpFuture};
pub use key_value_store::{KeyValueStore, StorageError, StorageWrite};
pub use notifier::Notifier;
pub use session_api::SessionApi;
