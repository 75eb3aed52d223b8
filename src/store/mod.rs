//! Local store: durable key-value persistence for JSON documents.
//!
//! DESIGN
//! ======
//! Every component that persists state goes through the `LocalStore` trait
//! rather than touching the filesystem directly. Production uses
//! `FileStore` (one JSON file per key); tests use `MemoryStore`.
//!
//! Calls are async even though both backends complete immediately, so a
//! networked backend can replace them without changing call sites.
//!
//! TRADE-OFFS
//! ==========
//! There are no transactions. Writes are last-write-wins per key; callers
//! that need read-modify-write atomicity serialize it themselves (see the
//! pet repository).

pub mod file;
#[cfg(test)]
pub mod memory;

pub use file::FileStore;
#[cfg(test)]
pub use memory::MemoryStore;

use serde_json::Value;

/// Key holding the pet store document.
pub const PETS_KEY: &str = "pet-health:pets";

/// Key holding the remembered login session.
pub const SESSION_KEY: &str = "healthyPaws_user";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt document at key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Async key-value facade. Values are whole JSON documents.
#[async_trait::async_trait]
pub trait LocalStore: Send + Sync {
    /// Read the document stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend fails or the stored bytes are
    /// not valid JSON.
    async fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend fails.
    async fn write(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Delete the document stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backend fails.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
