//! Typed JSON access on top of a [`KeyValueStore`]

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::KeyValueStore;
use crate::error::StorageError;

/// Load and decode the value under `key`
///
/// Returns `Ok(None)` for an absent key and an error for unreadable or
/// malformed values.
pub fn load<T: DeserializeOwned>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Load the value under `key`, falling back to `T::default()`
///
/// Missing, unreadable, and malformed values all yield the default. The
/// latter two are logged; none of them is an error to the caller.
pub fn load_or_default<T: DeserializeOwned + Default>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
) -> T {
    match load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(e) => {
            warn!(key, error = %e, "Discarding unreadable persisted value");
            T::default()
        }
    }
}

/// Encode `value` as JSON and store it under `key`
pub fn save<T: Serialize + ?Sized>(
    store: &(impl KeyValueStore + ?Sized),
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
