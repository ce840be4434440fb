//! Storage traits
//!
//! Client state is persisted behind a small key-value interface so the
//! medium can be swapped (SQLite on disk, in-memory for tests).

use crate::error::Result;

/// String key-value persistence
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
