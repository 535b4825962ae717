//! Key-value persistence used by the scheduler and the content cache
//!
//! This module provides:
//! - The `KeyValueStore` trait (get/set/has/remove over JSON values)
//! - An in-memory store with an optional byte quota
//! - A file-backed store (one JSON file per key)

pub mod errors;
mod file_store;
mod memory;

use serde_json::Value;

pub use errors::{Result, StorageError};
pub use file_store::FileStore;
pub use memory::MemoryStore;

/// String-keyed storage of JSON documents.
///
/// Implementations must reject a write that exceeds their capacity with
/// `StorageError::StorageFull` and leave the previous value in place.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value under `key`
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// List all keys currently stored
    fn keys(&self) -> Result<Vec<String>>;

    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove every key
    fn clear(&self) -> Result<()> {
        for key in self.keys()? {
            self.remove(&key)?;
        }
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }

    fn has(&self, key: &str) -> Result<bool> {
        (**self).has(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// Bytes a key/value pair occupies when counted against a quota
pub(crate) fn entry_size(key: &str, serialized: &str) -> u64 {
    (key.len() + serialized.len()) as u64
}
