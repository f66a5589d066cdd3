//! `localStorage` adapter for the shared storage port

use shared::storage::{KeyValueStorage, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{DomException, Storage};

/// Legacy numeric code some browsers still report for quota failures
const QUOTA_EXCEEDED_CODE: u16 = 22;

/// Browser `localStorage` behind [`KeyValueStorage`]
pub struct LocalStorage {
    inner: Storage,
}

impl LocalStorage {
    /// Open the current window's `localStorage`
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window object".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;
        Ok(Self { inner })
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key).map_err(storage_error)
    }
}

/// Map a thrown JS value to a [`StorageError`]
fn storage_error(err: JsValue) -> StorageError {
    if let Some(dom) = err.dyn_ref::<DomException>() {
        if dom.name() == "QuotaExceededError" || dom.code() == QUOTA_EXCEEDED_CODE {
            return StorageError::QuotaExceeded;
        }
        return StorageError::Unavailable(dom.message());
    }
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return StorageError::Unavailable(String::from(error.message()));
    }
    StorageError::Unavailable(format!("{err:?}"))
}
