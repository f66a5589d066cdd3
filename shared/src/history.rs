//! Prediction history store
//!
//! History is kept as a single versioned envelope under one storage key:
//!
//! ```json
//! { "version": 1, "predictions": [ ... ] }
//! ```
//!
//! The store is best-effort local caching. Unreadable data reads as an empty
//! history, and a write that exceeds the storage quota is retried once with
//! half the entries before it is dropped. No operation here returns an error.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, error, warn};

use crate::models::{NewPrediction, PredictionRecord};
use crate::storage::{keys, KeyValueStorage, StorageError};
use crate::types::{now_millis, TimestampMillis};

/// Current envelope schema version
pub const STORAGE_VERSION: u32 = 1;

/// Maximum number of stored predictions
pub const MAX_ENTRIES: usize = 50;

/// Store settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Storage key holding the envelope
    pub key: String,
    /// Maximum number of records kept after every write
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            key: keys::PREDICTION_HISTORY.to_string(),
            max_entries: MAX_ENTRIES,
        }
    }
}

/// The persisted envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEnvelope {
    pub version: u32,
    pub predictions: Vec<PredictionRecord>,
}

impl HistoryEnvelope {
    pub fn empty() -> Self {
        Self {
            version: STORAGE_VERSION,
            predictions: Vec::new(),
        }
    }

    fn sort_newest_first(&mut self) {
        self.predictions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    }

    /// Keep the newest `max_entries` records; returns how many were dropped
    fn truncate_newest(&mut self, max_entries: usize) -> usize {
        let before = self.predictions.len();
        if before > max_entries {
            self.sort_newest_first();
            self.predictions.truncate(max_entries);
        }
        before - self.predictions.len()
    }
}

/// Envelope as found in storage, before migration
#[derive(Deserialize)]
struct StoredEnvelope {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    predictions: Vec<JsonValue>,
}

/// Prediction history backed by a [`KeyValueStorage`]
pub struct HistoryStore<S> {
    storage: S,
    config: HistoryConfig,
    clock: fn() -> TimestampMillis,
}

impl<S: KeyValueStorage> HistoryStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, HistoryConfig::default())
    }

    pub fn with_config(storage: S, config: HistoryConfig) -> Self {
        Self {
            storage,
            config,
            clock: now_millis,
        }
    }

    /// Replace the time source used to stamp new records
    pub fn with_clock(mut self, clock: fn() -> TimestampMillis) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Store a new prediction and return it with its id and timestamp
    pub fn save(&self, prediction: NewPrediction) -> PredictionRecord {
        let timestamp = (self.clock)();
        let record = PredictionRecord::new(generate_id(timestamp), timestamp, prediction);

        let mut envelope = self.load();
        envelope.predictions.insert(0, record.clone());
        let dropped = envelope.truncate_newest(self.config.max_entries);
        if dropped > 0 {
            debug!(dropped, "Evicted oldest predictions over the history limit");
        }

        self.persist(&envelope);
        record
    }

    /// All records, newest first
    pub fn list(&self) -> Vec<PredictionRecord> {
        let mut envelope = self.load();
        envelope.sort_newest_first();
        envelope.predictions
    }

    pub fn get_by_id(&self, id: &str) -> Option<PredictionRecord> {
        self.load().predictions.into_iter().find(|p| p.id == id)
    }

    /// Remove one record; returns false when no record has `id`
    pub fn delete_by_id(&self, id: &str) -> bool {
        let mut envelope = self.load();
        let before = envelope.predictions.len();
        envelope.predictions.retain(|p| p.id != id);

        if envelope.predictions.len() < before {
            self.persist(&envelope);
            true
        } else {
            false
        }
    }

    /// Reset to an empty envelope at the current version
    pub fn clear(&self) {
        self.persist(&HistoryEnvelope::empty());
    }

    /// Keep only the newest `max_entries` records; returns how many were removed
    pub fn prune(&self, max_entries: usize) -> usize {
        let mut envelope = self.load();
        let removed = envelope.truncate_newest(max_entries);
        if removed > 0 {
            if let Err(e) = self.write(&envelope) {
                error!(error = %e, "Failed to save pruned prediction history");
            }
        }
        removed
    }

    pub fn count(&self) -> usize {
        self.load().predictions.len()
    }

    /// Read and migrate the stored envelope, degrading to empty on any failure
    pub fn load(&self) -> HistoryEnvelope {
        let raw = match self.storage.get(&self.config.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return HistoryEnvelope::empty(),
            Err(e) => {
                error!(error = %e, "Error reading prediction history");
                return HistoryEnvelope::empty();
            }
        };

        let stored: StoredEnvelope = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Stored prediction history is malformed, treating as empty");
                return HistoryEnvelope::empty();
            }
        };

        match stored.version {
            Some(version) if version >= STORAGE_VERSION => {}
            version => debug!(?version, "Migrating prediction history to version {STORAGE_VERSION}"),
        }

        let total = stored.predictions.len();
        let predictions: Vec<PredictionRecord> = stored
            .predictions
            .into_iter()
            .filter_map(|value| serde_json::from_value(value).ok())
            .collect();
        if predictions.len() < total {
            warn!(
                skipped = total - predictions.len(),
                "Skipped unreadable prediction records"
            );
        }

        HistoryEnvelope {
            version: STORAGE_VERSION,
            predictions,
        }
    }

    /// Write the envelope, retrying once with half the entries on a quota error
    fn persist(&self, envelope: &HistoryEnvelope) {
        match self.write(envelope) {
            Ok(()) => {}
            Err(e) if e.is_quota_exceeded() => {
                let limit = self.config.max_entries / 2;
                warn!(limit, "Storage quota exceeded, pruning prediction history");

                let mut pruned = envelope.clone();
                pruned.truncate_newest(limit);
                if let Err(e) = self.write(&pruned) {
                    error!(error = %e, "Prediction history write dropped after pruning");
                }
            }
            Err(e) => error!(error = %e, "Error saving prediction history"),
        }
    }

    fn write(&self, envelope: &HistoryEnvelope) -> Result<(), StorageError> {
        let json = serde_json::to_string(envelope)
            .map_err(|e| StorageError::Io(format!("Failed to serialize history: {e}")))?;
        self.storage.set(&self.config.key, &json)
    }
}

/// `pred_<millis>_<9 random base-16 chars>`
fn generate_id(timestamp: TimestampMillis) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("pred_{}_{}", timestamp, &random[..9])
}
