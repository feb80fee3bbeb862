//! Display cache for collections between page loads.
//!
//! Only a rehydration aid: the backend stays authoritative and a fetch
//! always replaces whatever was cached.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// String key/value persistence (LocalStorage in the browser).
pub trait KeyValueStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn save(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
    }
}

pub fn save_collection<E: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[E]) {
    match serde_json::to_string(items) {
        Ok(json) => store.save(key, &json),
        Err(e) => log::warn!("cache {key}: serialize failed: {e}"),
    }
}

/// A corrupt entry is treated as absent.
pub fn load_collection<E: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<Vec<E>> {
    let raw = store.load(key)?;
    match serde_json::from_str(&raw) {
        Ok(items) => Some(items),
        Err(e) => {
            log::warn!("cache {key}: ignoring unreadable entry: {e}");
            None
        }
    }
}
