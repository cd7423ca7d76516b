//! Persistent key-value entries.
//!
//! Projects, calendar events and settings are each stored as one serialized
//! JSON document under a fixed key. Reads and writes never fail the caller:
//! a missing or corrupt entry loads as the default value, and a failed write
//! is logged and dropped.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::WorldboardResult;

/// A key-value store holding serialized text.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> WorldboardResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> WorldboardResult<()>;
}

/// Load and deserialize the entry at `key`, falling back to `T::default()`.
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    try_load_json(store, key).unwrap_or_default()
}

/// Like [`load_json`], but `None` when the entry could not be read or
/// parsed. A missing entry is `Some(T::default())`.
pub fn try_load_json<T>(store: &dyn KeyValueStore, key: &str) -> Option<T>
where
    T: DeserializeOwned + Default,
{
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => return Some(T::default()),
        Err(e) => {
            tracing::warn!(key, "failed to read stored entry: {e}");
            return None;
        }
    };

    serde_json::from_str(&text)
        .inspect_err(|e| tracing::warn!(key, "stored entry is corrupt: {e}"))
        .ok()
}

/// Serialize `value` and write it under `key`. Failures are logged only.
pub fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T)
where
    T: Serialize + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(Into::into)
        .and_then(|text| store.set(key, &text));

    if let Err(e) = result {
        tracing::warn!(key, "failed to save entry: {e}");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::WorldboardError;

    /// A store whose reads and writes always fail.
    pub(crate) struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, key: &str) -> WorldboardResult<Option<String>> {
            Err(WorldboardError::Storage(format!("cannot read {key}")))
        }

        fn set(&self, key: &str, _value: &str) -> WorldboardResult<()> {
            Err(WorldboardError::Storage(format!("cannot write {key}")))
        }
    }

    #[test]
    fn missing_entry_loads_default() {
        let store = MemoryStore::new();
        let values: Vec<String> = load_json(&store, "nothing");
        assert!(values.is_empty());
    }

    #[test]
    fn corrupt_entry_loads_default() {
        let store = MemoryStore::new();
        store.set("projects", "{not json").unwrap();

        let values: Vec<String> = load_json(&store, "projects");
        assert!(values.is_empty());
    }

    #[test]
    fn read_failure_loads_default() {
        let values: Vec<u32> = load_json(&BrokenStore, "calendarEvents");
        assert!(values.is_empty());
    }

    #[test]
    fn write_failure_is_swallowed() {
        save_json(&BrokenStore, "calendarEvents", &vec![1, 2, 3]);
    }

    #[test]
    fn saved_value_loads_back() {
        let store = MemoryStore::new();
        save_json(&store, "mapLabelsOn", &false);
        assert!(!load_json::<bool>(&store, "mapLabelsOn"));
    }
}
