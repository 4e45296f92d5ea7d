//! Key-value persistence
//!
//! Backends:
//! - `MemoryStore`: shared in-process map (tests, throwaway sessions)
//! - `FileStore`: JSON object on disk, replaced atomically (native)
//! - `LocalStore`: browser LocalStorage (wasm32)
//!
//! Failures here are never fatal to a session: callers log and carry on with
//! their in-memory values.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;
pub mod writer;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;
pub use writer::RecordWriter;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Storage failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("stored value for `{key}` is not an integer: {value:?}")]
    Parse { key: String, value: String },
    #[error("storage backend is unavailable")]
    Unavailable,
}

/// String values by key
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Integer value; absent keys read as `None`
    fn get_u32(&self, key: &str) -> Result<Option<u32>, PersistenceError> {
        match self.get(key)? {
            None => Ok(None),
            Some(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| PersistenceError::Parse {
                    key: key.to_string(),
                    value,
                }),
        }
    }

    fn set_u32(&mut self, key: &str, value: u32) -> Result<(), PersistenceError> {
        self.set(key, &value.to_string())
    }
}

/// In-memory store; clones share the same map
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let values = self.values.lock().map_err(|_| PersistenceError::Unavailable)?;
        Ok(values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut values = self.values.lock().map_err(|_| PersistenceError::Unavailable)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
