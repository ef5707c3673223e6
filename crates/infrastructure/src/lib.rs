//! HRM Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus the client configuration.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod serialization;

pub use adapters::{HttpSessionApi, ReqwestHttpClient, TracingNotifier};
pub use config::{ClientConfig, ConfigError};
pub use persistence::{FileKeyValueStore, MemoryKeyValueStore, SESSION_FILE, TokioFileSystem};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
