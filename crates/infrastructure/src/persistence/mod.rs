//! Persistence adapters.

mod file_system;
mod key_value_store;

pub use file_system::TokioFileSystem;
pub use key_value_store::{FileKeyValueStore, MemoryKeyValueStore, SESSION_FILE};
