//! Browser LocalStorage backend (wasm32)

use super::{KeyValueStore, PersistenceError};

/// Keys are namespaced so several games can share an origin
#[derive(Debug, Clone)]
pub struct LocalStore {
    prefix: String,
}

impl LocalStore {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable)
    }

    fn key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Self::storage()?
            .get_item(&self.key(key))
            .map_err(|_| PersistenceError::Unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        Self::storage()?
            .set_item(&self.key(key), value)
            .map_err(|_| PersistenceError::Unavailable)
    }
}
