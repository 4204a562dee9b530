mod file_store;
pub mod keys;
mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The persistence collaborator: synchronous string-keyed storage with
/// localStorage semantics. Value encoding is the caller's concern.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// Reads and decodes a JSON value. Missing or malformed content is treated as
/// absent data, never an error.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(target: "storage", "Discarding malformed value under {:?}: {}", key, error);
            None
        }
    }
}

pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(encoded) => store.set(key, &encoded),
        Err(error) => {
            warn!(target: "storage", "Failed to encode value for {:?}: {}", key, error);
        }
    }
}
