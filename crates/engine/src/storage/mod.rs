//! Durable key/value storage abstraction.
//!
//! The engine persists the progress blob through this trait: browser-style
//! persistent storage in production (file backed here), an in-memory map
//! in tests. Values are opaque strings; the store layer decides the
//! serialization format.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::InMemoryStore;

use thiserror::Error;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Abstract durable storage for string blobs.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
