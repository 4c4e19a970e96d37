//! Helpers shared by the recent-searches and favorites caches.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{CacheError, StorageError};
use crate::store::KeyValueStore;

/// Decode a stored JSON array element by element.
///
/// Content that is not a JSON array decodes to nothing. Elements that do not
/// match `T` are skipped, so one damaged entry never hides the rest.
pub(crate) fn decode_lenient<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            debug!(key, error = %e, "ignoring unreadable cache content");
            return Vec::new();
        }
    };

    values
        .into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(key, error = %e, "dropping malformed cache entry");
                None
            }
        })
        .collect()
}

/// Serialize `items` and replace the whole value under `key` in one write.
pub(crate) fn write_json<S, T>(store: &S, key: &'static str, items: &[T]) -> Result<(), CacheError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let write = || -> Result<(), StorageError> {
        let json = serde_json::to_string(items).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        store.set(key, &json)
    };

    write().map_err(|source| {
        warn!(key, error = %source, "failed to save cache");
        CacheError::Write { key, source }
    })
}

/// Read the raw value under `key`, tagging failures with the slot.
pub(crate) fn read_raw<S>(store: &S, key: &'static str) -> Result<Option<String>, CacheError>
where
    S: KeyValueStore + ?Sized,
{
    store.get(key).map_err(|source| {
        warn!(key, error = %source, "failed to load cache");
        CacheError::Read { key, source }
    })
}

/// Delete the value under `key`.
pub(crate) fn remove_key<S>(store: &S, key: &'static str) -> Result<(), CacheError>
where
    S: KeyValueStore + ?Sized,
{
    store.remove(key).map(|_| ()).map_err(|source| {
        warn!(key, error = %source, "failed to clear cache");
        CacheError::Write { key, source }
    })
}
