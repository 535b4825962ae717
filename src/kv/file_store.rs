//! File-backed key-value store
//!
//! Directory layout:
//! ```text
//! {data_dir}/store/
//! └── {url-encoded key}.json   # One JSON document per key
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::errors::{Result, StorageError};
use super::{entry_size, KeyValueStore};

/// Key-value store keeping one JSON file per key
pub struct FileStore {
    store_dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileStore {
    /// Open (and create if needed) a store under `data_dir`
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        let store_dir = data_dir.join("store");
        fs::create_dir_all(&store_dir)?;

        Ok(Self {
            store_dir,
            quota_bytes: None,
        })
    }

    /// Reject writes once the stored keys + values exceed `quota_bytes`
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("lingo"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Directory holding the key files
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Get the file path for a key
    fn key_path(&self, key: &str) -> PathBuf {
        self.store_dir
            .join(format!("{}.json", urlencoding::encode(key)))
    }

    /// Bytes used by every key except `skip`
    fn used_bytes_except(&self, skip: &str) -> Result<u64> {
        let mut used = 0;
        for key in self.keys()? {
            if key == skip {
                continue;
            }
            let len = fs::metadata(self.key_path(&key))?.len();
            used += key.len() as u64 + len;
        }
        Ok(used)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.key_path(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Write using atomic replace (write to .tmp then rename)
    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let serialized = serde_json::to_string(value)?;

        if let Some(quota) = self.quota_bytes {
            let required = entry_size(key, &serialized);
            let available = quota.saturating_sub(self.used_bytes_except(key)?);
            if required > available {
                return Err(StorageError::StorageFull {
                    key: key.to_string(),
                    required,
                    available,
                });
            }
        }

        let path = self.key_path(key);
        let tmp_path = path.with_extension("json.tmp");
        if let Err(e) = fs::write(&tmp_path, &serialized).and_then(|()| fs::rename(&tmp_path, &path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(write_error(key, &serialized, e));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> Result<Vec<String>> {
        if !self.store_dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.store_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                match urlencoding::decode(stem) {
                    Ok(key) => keys.push(key.into_owned()),
                    Err(e) => log::warn!("Skipping undecodable store file {:?}: {}", path, e),
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}

/// Map a failed write, reporting a full disk as `StorageFull`
fn write_error(key: &str, serialized: &str, e: std::io::Error) -> StorageError {
    if e.kind() == ErrorKind::StorageFull {
        StorageError::StorageFull {
            key: key.to_string(),
            required: entry_size(key, serialized),
            available: 0,
        }
    } else {
        e.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_set_and_get() {
        let (store, _temp) = create_test_store();

        store.set("srs-records", &json!({"hola": {"interval": 1}})).unwrap();
        let value = store.get("srs-records").unwrap().unwrap();
        assert_eq!(value["hola"]["interval"], 1);
    }

    #[test]
    fn test_missing_key_is_none() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.get("nothing").unwrap(), None);
        assert!(!store.has("nothing").unwrap());
    }

    #[test]
    fn test_keys_with_separators_round_trip() {
        let (store, _temp) = create_test_store();

        store.set("content:es:food/drinks", &json!([])).unwrap();
        store.set("srs-records", &json!({})).unwrap();

        assert_eq!(
            store.keys().unwrap(),
            vec!["content:es:food/drinks".to_string(), "srs-records".to_string()]
        );
        assert!(store.has("content:es:food/drinks").unwrap());
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let (store, _temp) = create_test_store();
        fs::write(store.key_path("broken"), "{\"a\": ").unwrap();

        assert!(matches!(store.get("broken"), Err(StorageError::Json(_))));
    }

    #[test]
    fn test_quota_rejects_write_and_keeps_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().to_path_buf())
            .unwrap()
            .with_quota(Some(32));

        store.set("k", &json!("small")).unwrap();
        let err = store
            .set("k", &json!("a value that cannot possibly fit in the quota"))
            .unwrap_err();

        assert!(err.is_storage_full());
        assert_eq!(store.get("k").unwrap(), Some(json!("small")));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let (store, _temp) = create_test_store();
        // A non-empty directory in place of the key file makes the rename fail
        let target = store.key_path("k");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("inner"), "x").unwrap();

        let err = store.set("k", &json!(1)).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
        assert!(!target.with_extension("json.tmp").exists());
        assert!(target.is_dir());
    }

    #[test]
    fn test_disk_full_maps_to_storage_full() {
        let err = write_error("k", "\"v\"", std::io::Error::from(ErrorKind::StorageFull));
        assert!(matches!(
            err,
            StorageError::StorageFull { ref key, required: 4, available: 0 } if key == "k"
        ));

        let err = write_error("k", "1", std::io::Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_remove_and_clear() {
        let (store, _temp) = create_test_store();

        store.set("a", &json!(1)).unwrap();
        store.set("b", &json!(2)).unwrap();
        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["b".to_string()]);

        store.clear().unwrap();
        assert!(store.keys().unwrap().is_empty());
    }
}
