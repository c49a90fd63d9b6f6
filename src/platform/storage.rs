//! String key-value storage
//!
//! Writes are best-effort: a full or unavailable store is logged and ignored.

use std::collections::HashMap;

/// A simple string store (LocalStorage-shaped)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores and settings will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write {key} to LocalStorage");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("missing"), None);
        store.set("k", "v1");
        store.set("k", "v2");
        assert_eq!(store.get("k").as_deref(), Some("v2"));
    }
}
