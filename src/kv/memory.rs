//! In-memory key-value store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use super::errors::{Result, StorageError};
use super::{entry_size, KeyValueStore};

/// Key-value store held in memory.
///
/// Values are kept serialized so the quota accounting matches what a
/// string-based backing store (browser local storage) would see.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once keys + values exceed `quota_bytes`
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Store a raw string under `key`, bypassing JSON serialization
    pub fn set_raw(&self, key: &str, raw: impl Into<String>) {
        self.entries().insert(key.to_string(), raw.into());
    }

    /// Bytes currently used by all entries
    #[cfg(test)]
    pub(crate) fn used_bytes(&self) -> u64 {
        self.entries()
            .iter()
            .map(|(k, v)| entry_size(k, v))
            .sum()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still structurally valid
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        match self.entries().get(key) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let serialized = serde_json::to_string(value)?;
        let mut entries = self.entries();

        if let Some(quota) = self.quota_bytes {
            let others: u64 = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_size(k, v))
                .sum();
            let required = entry_size(key, &serialized);
            let available = quota.saturating_sub(others);
            if required > available {
                return Err(StorageError::StorageFull {
                    key: key.to_string(),
                    required,
                    available,
                });
            }
        }

        entries.insert(key.to_string(), serialized);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self.entries().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn clear(&self) -> Result<()> {
        self.entries().clear();
        Ok(())
    }
}
