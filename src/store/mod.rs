//! Durable device-local key-value storage for the session record.
//!
//! DESIGN
//! ======
//! The session manager only needs string get/set/remove, so the seam is a
//! small async trait. `MemoryStore` backs tests and ephemeral runs;
//! `FileStore` keeps every key in one JSON object on disk for the CLI.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key holding the JSON-serialized user profile.
pub const USER_KEY: &str = "@Auth:user";
/// Key holding the raw bearer token.
pub const TOKEN_KEY: &str = "@Auth:token";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage file is corrupt: {0}")]
    Corrupt(String),
}

/// Async string key-value store.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read `key`, returning `None` when it was never set or was removed.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the backing storage cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
