//! Whole-profile data export, import and reset
//!
//! An export is a snapshot of the raw stored strings for every platform key,
//! so it round-trips data this version cannot parse.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::storage::{keys, KeyValueStorage, StorageError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub exported_at: DateTime<Utc>,
    /// Stored value per key; keys with nothing stored are omitted
    pub entries: BTreeMap<String, String>,
}

impl DataExport {
    /// Snapshot every platform key present in `storage`
    pub fn collect<S: KeyValueStorage>(storage: &S) -> Result<Self, StorageError> {
        let mut entries = BTreeMap::new();
        for key in keys::ALL {
            if let Some(value) = storage.get(key)? {
                entries.insert(key.to_string(), value);
            }
        }
        Ok(Self {
            exported_at: Utc::now(),
            entries,
        })
    }

    /// Write the snapshot back; unknown keys in the export are skipped.
    ///
    /// Returns the number of keys restored.
    pub fn restore<S: KeyValueStorage>(&self, storage: &S) -> Result<usize, StorageError> {
        let mut restored = 0;
        for (key, value) in &self.entries {
            if keys::ALL.contains(&key.as_str()) {
                storage.set(key, value)?;
                restored += 1;
            }
        }
        info!(restored, "Restored exported data");
        Ok(restored)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Remove every platform key from `storage`
pub fn clear_all<S: KeyValueStorage>(storage: &S) -> Result<(), StorageError> {
    storage.remove_all(keys::ALL)?;
    info!("All local data cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_export_restore_round_trip() {
        let source = MemoryStorage::new();
        source.set(keys::FARMS, "[]").unwrap();
        source.set(keys::PREDICTION_HISTORY, "not json at all").unwrap();
        source.set("someone-else", "ignored").unwrap();

        let export = DataExport::collect(&source).unwrap();
        assert_eq!(export.entries.len(), 2);

        let json = export.to_json_pretty().unwrap();
        let parsed: DataExport = serde_json::from_str(&json).unwrap();

        let target = MemoryStorage::new();
        assert_eq!(parsed.restore(&target).unwrap(), 2);
        assert_eq!(
            target.get(keys::PREDICTION_HISTORY).unwrap().as_deref(),
            Some("not json at all")
        );
    }

    #[test]
    fn test_restore_skips_unknown_keys() {
        let mut entries = BTreeMap::new();
        entries.insert("session-token".to_string(), "secret".to_string());
        let export = DataExport {
            exported_at: Utc::now(),
            entries,
        };
        let target = MemoryStorage::new();
        assert_eq!(export.restore(&target).unwrap(), 0);
        assert!(target.is_empty());
    }

    #[test]
    fn test_clear_all_keeps_foreign_keys() {
        let storage = MemoryStorage::new();
        storage.set(keys::WEATHER_ALERTS, "[]").unwrap();
        storage.set("other-app", "1").unwrap();
        clear_all(&storage).unwrap();
        assert_eq!(storage.len(), 1);
    }
}
