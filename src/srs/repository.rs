//! Persistence of scheduling records
//!
//! All records live in one JSON object under a single store key:
//! ```text
//! "srs-records" -> { "<item id>": { "interval": 6, "easeFactor": 2.6, ... }, ... }
//! ```
//! Every update rewrites the whole object.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use super::algorithm::calculate_next_review;
use super::models::{ItemStatus, ReviewStats, SchedulingRecord, MIN_EASE_FACTOR};
use crate::kv::{KeyValueStore, Result, StorageError};

/// Store key holding the record mapping unless configured otherwise
pub const DEFAULT_RECORDS_KEY: &str = "srs-records";

pub type RecordMap = BTreeMap<String, SchedulingRecord>;

/// Reads and writes scheduling records through a key-value store
pub struct SrsRepository<S> {
    store: S,
    records_key: String,
    /// Serializes the load-modify-store sequence of updates
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> SrsRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_RECORDS_KEY)
    }

    pub fn with_key(store: S, records_key: impl Into<String>) -> Self {
        Self {
            store,
            records_key: records_key.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn records_key(&self) -> &str {
        &self.records_key
    }

    /// Load every stored record.
    ///
    /// Unreadable or malformed data is treated as absent: a broken mapping
    /// yields an empty map and a broken entry is skipped.
    pub fn load_records(&self) -> RecordMap {
        self.read_records().unwrap_or_else(|e| {
            log::warn!("Failed to read scheduling records, starting empty: {}", e);
            RecordMap::new()
        })
    }

    /// Load every stored record for a rewrite of the mapping.
    ///
    /// Only a missing or corrupt document reads as empty. Any other read
    /// failure is returned so the rewrite cannot drop records it never saw.
    fn read_records(&self) -> Result<RecordMap> {
        let value = match self.store.get(&self.records_key) {
            Ok(Some(value)) => value,
            Ok(None) => return Ok(RecordMap::new()),
            Err(StorageError::Json(e)) => {
                log::warn!("Scheduling records under '{}' are corrupt, ignoring: {}", self.records_key, e);
                return Ok(RecordMap::new());
            }
            Err(e) => return Err(e),
        };

        let Value::Object(entries) = value else {
            log::warn!("Scheduling records under '{}' are not an object, ignoring", self.records_key);
            return Ok(RecordMap::new());
        };

        let mut records = RecordMap::new();
        for (item_id, raw) in entries {
            match serde_json::from_value::<SchedulingRecord>(raw) {
                Ok(mut record) => {
                    if record.ease_factor < MIN_EASE_FACTOR {
                        log::debug!("Raising stored ease {} of '{}' to the floor", record.ease_factor, item_id);
                        record.ease_factor = MIN_EASE_FACTOR;
                    }
                    records.insert(item_id, record);
                }
                Err(e) => log::warn!("Skipping malformed scheduling record '{}': {}", item_id, e),
            }
        }
        Ok(records)
    }

    /// Get the record for an item, or the default record if it has none
    pub fn get_record(&self, item_id: &str) -> SchedulingRecord {
        self.load_records()
            .get(item_id)
            .copied()
            .unwrap_or_default()
    }

    /// Grade an item and persist the resulting record.
    ///
    /// A failed read or write is returned unchanged and leaves the stored
    /// mapping as it was.
    pub fn update_record(&self, item_id: &str, quality: i32, now_ms: i64) -> Result<SchedulingRecord> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut records = self.read_records()?;
        let current = records.get(item_id).copied().unwrap_or_default();
        let next = calculate_next_review(&current, quality, now_ms);
        records.insert(item_id.to_string(), next);

        self.save_records(&records)?;
        log::debug!(
            "Graded '{}' q={}: interval {} -> {}, ease {:.2}",
            item_id,
            quality,
            current.interval,
            next.interval,
            next.ease_factor
        );

        Ok(next)
    }

    fn save_records(&self, records: &RecordMap) -> Result<()> {
        let value = serde_json::to_value(records)?;
        self.store.set(&self.records_key, &value)
    }

    /// Get review statistics for a set of items
    pub fn stats<'a, I>(&self, item_ids: I, now_ms: i64) -> ReviewStats
    where
        I: IntoIterator<Item = &'a str>,
    {
        let records = self.load_records();
        let mut stats = ReviewStats::default();

        for item_id in item_ids {
            let record = records.get(item_id).copied().unwrap_or_default();
            stats.total_items += 1;

            match record.status() {
                ItemStatus::New => stats.new_items += 1,
                ItemStatus::Lapsed => stats.lapsed_items += 1,
                ItemStatus::Learning => stats.learning_items += 1,
                ItemStatus::Mature => stats.mature_items += 1,
            }

            if record.is_due(now_ms) {
                stats.due_items += 1;
            }
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::{FileStore, MemoryStore};
    use crate::srs::models::ONE_DAY_MS;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::TempDir;

    const NOW: i64 = 1_700_000_000_000;

    /// Memory store whose next `get` fails with an I/O error
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        fail_next_get: AtomicBool,
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<Value>> {
            if self.fail_next_get.swap(false, Ordering::SeqCst) {
                return Err(std::io::Error::new(std::io::ErrorKind::Other, "disk unplugged").into());
            }
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &Value) -> Result<()> {
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>> {
            self.inner.keys()
        }
    }

    #[test]
    fn test_unknown_item_gets_default_record() {
        let repo = SrsRepository::new(MemoryStore::new());
        assert_eq!(repo.get_record("hola"), SchedulingRecord::default());
        // Reading does not create anything
        assert!(!repo.store().has(DEFAULT_RECORDS_KEY).unwrap());
    }

    #[test]
    fn test_get_record_is_idempotent() {
        let repo = SrsRepository::new(MemoryStore::new());
        repo.update_record("hola", 4, NOW).unwrap();

        let first = repo.get_record("hola");
        let second = repo.get_record("hola");
        assert_eq!(first, second);
        assert_eq!(first.ease_factor.to_bits(), second.ease_factor.to_bits());
    }

    #[test]
    fn test_update_round_trips() {
        let repo = SrsRepository::new(MemoryStore::new());

        let updated = repo.update_record("hola", 5, NOW).unwrap();
        assert_eq!(repo.get_record("hola"), updated);
        assert_eq!(updated.next_review_at, NOW + ONE_DAY_MS);

        let again = repo.update_record("hola", 5, NOW + ONE_DAY_MS).unwrap();
        assert_eq!(again.interval, 6);
        assert_eq!(repo.get_record("hola"), again);
    }

    #[test]
    fn test_updates_keep_other_items() {
        let repo = SrsRepository::new(MemoryStore::new());
        let a = repo.update_record("a", 5, NOW).unwrap();
        repo.update_record("b", 1, NOW).unwrap();

        assert_eq!(repo.get_record("a"), a);
        assert_eq!(repo.load_records().len(), 2);
    }

    #[test]
    fn test_mapping_is_one_document_under_the_key() {
        let repo = SrsRepository::with_key(MemoryStore::new(), "custom-key");
        repo.update_record("hola", 3, NOW).unwrap();

        let stored = repo.store().get("custom-key").unwrap().unwrap();
        assert_eq!(stored["hola"]["interval"], 1);
        assert_eq!(stored["hola"]["repetitionCount"], 1);
        assert_eq!(repo.store().keys().unwrap(), vec!["custom-key".to_string()]);
    }

    #[test]
    fn test_storage_full_is_surfaced_and_nothing_changes() {
        let repo = SrsRepository::new(MemoryStore::with_quota(120));
        let first = repo.update_record("a", 5, NOW).unwrap();

        let err = repo
            .update_record("an-item-with-a-rather-long-identifier", 5, NOW)
            .unwrap_err();
        assert!(matches!(err, StorageError::StorageFull { .. }));

        assert_eq!(repo.get_record("a"), first);
        assert_eq!(
            repo.get_record("an-item-with-a-rather-long-identifier"),
            SchedulingRecord::default()
        );
    }

    #[test]
    fn test_corrupt_store_reads_as_empty() {
        let store = MemoryStore::new();
        store.set_raw(DEFAULT_RECORDS_KEY, "{\"hola\": {\"interval\"");
        let repo = SrsRepository::new(store);

        assert_eq!(repo.get_record("hola"), SchedulingRecord::default());

        // The next update overwrites the broken document
        let updated = repo.update_record("hola", 5, NOW).unwrap();
        assert_eq!(repo.get_record("hola"), updated);
    }

    #[test]
    fn test_read_failure_aborts_update_and_keeps_history() {
        let repo = SrsRepository::new(FlakyStore::default());
        for id in ["a", "b", "c"] {
            repo.update_record(id, 5, NOW).unwrap();
        }

        repo.store().fail_next_get.store(true, Ordering::SeqCst);
        let err = repo.update_record("d", 5, NOW).unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));

        let ids: Vec<String> = repo.load_records().into_keys().collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        // Once the store reads again the update goes through
        repo.update_record("d", 5, NOW).unwrap();
        assert_eq!(repo.load_records().len(), 4);
    }

    #[test]
    fn test_read_failure_is_lenient_for_lookups() {
        let repo = SrsRepository::new(FlakyStore::default());
        repo.update_record("a", 5, NOW).unwrap();

        repo.store().fail_next_get.store(true, Ordering::SeqCst);
        assert_eq!(repo.get_record("a"), SchedulingRecord::default());
        assert_eq!(repo.get_record("a").repetition_count, 1);
    }

    #[test]
    fn test_non_object_mapping_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(DEFAULT_RECORDS_KEY, &json!([1, 2, 3])).unwrap();
        let repo = SrsRepository::new(store);
        assert!(repo.load_records().is_empty());
    }

    #[test]
    fn test_malformed_entry_is_skipped() {
        let store = MemoryStore::new();
        store
            .set(
                DEFAULT_RECORDS_KEY,
                &json!({
                    "good": {"interval": 6, "easeFactor": 2.6, "nextReviewAt": 5, "repetitionCount": 2},
                    "bad": {"interval": "six"},
                    "low": {"interval": 1, "easeFactor": 0.5, "nextReviewAt": 5, "repetitionCount": 1}
                }),
            )
            .unwrap();
        let repo = SrsRepository::new(store);

        let records = repo.load_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records["good"].interval, 6);
        assert_eq!(records["low"].ease_factor, MIN_EASE_FACTOR);
        assert_eq!(repo.get_record("bad"), SchedulingRecord::default());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();

        let updated = {
            let repo = SrsRepository::new(FileStore::new(temp_dir.path().to_path_buf()).unwrap());
            repo.update_record("hola", 4, NOW).unwrap()
        };

        let repo = SrsRepository::new(FileStore::new(temp_dir.path().to_path_buf()).unwrap());
        assert_eq!(repo.get_record("hola"), updated);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        use std::sync::Arc;

        let repo = Arc::new(SrsRepository::new(MemoryStore::new()));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                std::thread::spawn(move || {
                    for j in 0..10 {
                        repo.update_record(&format!("item-{}-{}", i, j), 4, NOW).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(repo.load_records().len(), 80);
    }

    #[test]
    fn test_stats() {
        let repo = SrsRepository::new(MemoryStore::new());
        repo.update_record("learning", 5, NOW).unwrap();
        repo.update_record("mature", 5, NOW).unwrap();
        repo.update_record("mature", 5, NOW).unwrap();
        repo.update_record("lapsed", 1, NOW).unwrap();

        let ids = ["new", "learning", "mature", "lapsed"];
        let stats = repo.stats(ids, NOW);
        assert_eq!(
            stats,
            ReviewStats {
                total_items: 4,
                new_items: 1,
                lapsed_items: 1,
                learning_items: 1,
                mature_items: 1,
                due_items: 1,
            }
        );

        // One day later the learning and lapsed items are due as well
        let stats = repo.stats(ids, NOW + ONE_DAY_MS);
        assert_eq!(stats.due_items, 3);
    }
}
