//! Application settings

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::storage::{keys, KeyValueStorage, StorageError};
use crate::types::{Language, UnitSystem};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub language: Language,
    pub units: UnitSystem,
    pub auto_detect_location: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            language: Language::English,
            units: UnitSystem::Metric,
            auto_detect_location: true,
        }
    }
}

/// Settings persisted under the `app-settings` key
pub struct SettingsStore<S> {
    storage: S,
}

impl<S: KeyValueStorage> SettingsStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Stored settings, or defaults when missing or unreadable
    pub fn load(&self) -> AppSettings {
        match self.storage.get(keys::APP_SETTINGS) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored settings are malformed, using defaults");
                AppSettings::default()
            }),
            Ok(None) => AppSettings::default(),
            Err(e) => {
                warn!(error = %e, "Error reading settings");
                AppSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let json = serde_json::to_string(settings)
            .map_err(|e| StorageError::Io(format!("Failed to serialize settings: {e}")))?;
        self.storage.set(keys::APP_SETTINGS, &json)
    }
}
