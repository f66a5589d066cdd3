//! Prediction history store tests
//!
//! Covers ordering, capacity eviction, deletion, corruption handling and the
//! quota prune-and-retry path.

use std::cell::Cell;

use proptest::prelude::*;
use shared::history::{HistoryConfig, HistoryStore, MAX_ENTRIES, STORAGE_VERSION};
use shared::storage::{keys, KeyValueStorage, MemoryStorage, StorageError};
use shared::{Coordinates, NewPrediction, SoilParams, WeatherParams};

fn prediction(farm: &str) -> NewPrediction {
    NewPrediction {
        farm_name: farm.to_string(),
        farm_coordinates: Coordinates::new(28.4595, 77.0266),
        farm_area: None,
        soil_params: SoilParams::default(),
        weather_params: WeatherParams::default(),
        prediction: serde_json::json!({"crop": "Maize", "confidence": 88.4}),
    }
}

thread_local! {
    static TICK: Cell<i64> = const { Cell::new(0) };
}

/// Monotonic test clock: each call is one millisecond later
fn ticking_clock() -> i64 {
    TICK.with(|t| {
        t.set(t.get() + 1);
        t.get()
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_save_then_list_returns_new_record_first() {
        let store = HistoryStore::new(MemoryStorage::new()).with_clock(ticking_clock);
        store.save(prediction("North Field"));
        let latest = store.save(prediction("South Orchard"));

        let listed = store.list();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0], latest);
        assert!(latest.id.starts_with("pred_"));
    }

    #[test]
    fn test_capacity_drops_oldest() {
        let store = HistoryStore::new(MemoryStorage::new()).with_clock(ticking_clock);
        let first = store.save(prediction("Farm 0"));
        for i in 1..=MAX_ENTRIES {
            store.save(prediction(&format!("Farm {i}")));
        }

        let listed = store.list();
        assert_eq!(listed.len(), MAX_ENTRIES);
        assert!(store.get_by_id(&first.id).is_none());
        assert_eq!(listed[0].farm_name, format!("Farm {MAX_ENTRIES}"));
    }

    #[test]
    fn test_delete_missing_id_leaves_store_unchanged() {
        let storage = MemoryStorage::new();
        let store = HistoryStore::new(&storage);
        store.save(prediction("River Plot"));
        let before = storage.get(keys::PREDICTION_HISTORY).unwrap();

        assert!(!store.delete_by_id("pred_0_missing"));
        assert_eq!(storage.get(keys::PREDICTION_HISTORY).unwrap(), before);
    }

    #[test]
    fn test_delete_existing_id() {
        let store = HistoryStore::new(MemoryStorage::new());
        let saved = store.save(prediction("River Plot"));
        assert!(store.delete_by_id(&saved.id));
        assert!(store.get_by_id(&saved.id).is_none());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_clear_then_list_is_empty() {
        let storage = MemoryStorage::new();
        let store = HistoryStore::new(&storage);
        store.save(prediction("North Field"));
        store.clear();

        assert!(store.list().is_empty());
        let raw = storage.get(keys::PREDICTION_HISTORY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], STORAGE_VERSION);
        assert_eq!(value["predictions"], serde_json::json!([]));
    }

    #[test]
    fn test_truncated_json_reads_as_empty() {
        let storage = MemoryStorage::new();
        let store = HistoryStore::new(&storage);
        store.save(prediction("North Field"));

        let raw = storage.get(keys::PREDICTION_HISTORY).unwrap().unwrap();
        storage
            .set(keys::PREDICTION_HISTORY, &raw[..raw.len() / 2])
            .unwrap();

        assert!(store.list().is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_non_object_json_reads_as_empty() {
        let storage = MemoryStorage::new();
        storage.set(keys::PREDICTION_HISTORY, "[1, 2, 3]").unwrap();
        assert!(HistoryStore::new(&storage).list().is_empty());
    }

    #[test]
    fn test_list_resorts_regardless_of_storage_order() {
        let storage = MemoryStorage::new();
        let store = HistoryStore::new(&storage).with_clock(ticking_clock);
        for i in 0..5 {
            store.save(prediction(&format!("Farm {i}")));
        }

        // Reverse the stored order behind the store's back
        let raw = storage.get(keys::PREDICTION_HISTORY).unwrap().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        value["predictions"].as_array_mut().unwrap().reverse();
        storage
            .set(keys::PREDICTION_HISTORY, &value.to_string())
            .unwrap();

        let listed = store.list();
        assert!(listed.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
        assert_eq!(listed[0].farm_name, "Farm 4");
    }

    #[test]
    fn test_custom_config_limit_and_key() {
        let storage = MemoryStorage::new();
        let config = HistoryConfig {
            key: "history-test".to_string(),
            max_entries: 3,
        };
        let store = HistoryStore::with_config(&storage, config).with_clock(ticking_clock);
        for i in 0..5 {
            store.save(prediction(&format!("Farm {i}")));
        }
        assert_eq!(store.count(), 3);
        assert!(storage.get(keys::PREDICTION_HISTORY).unwrap().is_none());
        assert!(storage.get("history-test").unwrap().is_some());
    }
}

// ============================================================================
// Quota Handling
// ============================================================================

/// Storage that rejects writes larger than a byte limit, like a nearly full
/// browser origin
struct CappedStorage {
    inner: MemoryStorage,
    max_value_bytes: usize,
    rejected: Cell<usize>,
}

impl KeyValueStorage for CappedStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if value.len() > self.max_value_bytes {
            self.rejected.set(self.rejected.get() + 1);
            return Err(StorageError::QuotaExceeded);
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove(key)
    }
}

fn envelope_size(records: usize) -> usize {
    let store = HistoryStore::new(MemoryStorage::new()).with_clock(ticking_clock);
    for i in 0..records {
        store.save(prediction(&format!("Farm {i:02}")));
    }
    serde_json::to_string(&store.load()).unwrap().len()
}

#[cfg(test)]
mod quota_tests {
    use super::*;

    #[test]
    fn test_quota_error_prunes_to_half_and_retries() {
        // Room for the pruned envelope but not a full one
        let storage = CappedStorage {
            inner: MemoryStorage::new(),
            max_value_bytes: envelope_size(MAX_ENTRIES / 2) + 64,
            rejected: Cell::new(0),
        };
        let store = HistoryStore::new(&storage).with_clock(ticking_clock);

        let mut last = None;
        for i in 0..MAX_ENTRIES {
            last = Some(store.save(prediction(&format!("Farm {i:02}"))));
        }

        assert!(storage.rejected.get() > 0);
        let listed = store.list();
        assert!(listed.len() <= MAX_ENTRIES / 2 + 1);
        assert_eq!(listed.first(), last.as_ref());
    }

    #[test]
    fn test_write_dropped_when_retry_also_fails() {
        let storage = CappedStorage {
            inner: MemoryStorage::new(),
            max_value_bytes: 10,
            rejected: Cell::new(0),
        };
        let store = HistoryStore::new(&storage);

        let record = store.save(prediction("North Field"));

        // Saved record is returned but never persisted
        assert!(record.id.starts_with("pred_"));
        assert_eq!(storage.rejected.get(), 2);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_memory_quota_is_a_quota_error() {
        let storage = MemoryStorage::with_quota(100);
        let store = HistoryStore::new(&storage);
        store.save(prediction("North Field"));
        assert!(store.list().is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any number of saves leaves at most MAX_ENTRIES records
    #[test]
    fn property_history_is_bounded(saves in 0usize..120) {
        let store = HistoryStore::new(MemoryStorage::new());
        for i in 0..saves {
            store.save(prediction(&format!("Farm {i}")));
        }
        prop_assert_eq!(store.count(), saves.min(MAX_ENTRIES));
    }

    /// list() is newest first whatever the timestamps' insertion order
    #[test]
    fn property_list_sorted_descending(
        timestamps in proptest::collection::hash_set(0i64..1_000_000_000, 1..40)
    ) {
        let storage = MemoryStorage::new();
        let store = HistoryStore::new(&storage);
        let template = store.save(prediction("Template"));

        let records: Vec<_> = timestamps
            .iter()
            .enumerate()
            .map(|(i, ts)| {
                let mut record = template.clone();
                record.id = format!("pred_{ts}_{i}");
                record.timestamp = *ts;
                record
            })
            .collect();
        let envelope = serde_json::json!({ "version": 1, "predictions": records });
        storage.set(keys::PREDICTION_HISTORY, &envelope.to_string()).unwrap();

        let listed = store.list();
        prop_assert_eq!(listed.len(), timestamps.len());
        prop_assert!(listed.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }
}
