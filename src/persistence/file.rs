//! JSON file backend (native)
//!
//! Writes go to a sibling temp file first and are renamed over the target, so
//! a crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, PersistenceError};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("midibird-test-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir.join("store.json")
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let store = FileStore::new(scratch("missing").with_file_name("absent.json"));
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let path = scratch("roundtrip");
        let mut store = FileStore::new(&path);
        store.set_u32("highestScore", 12).unwrap();
        store.set_u32("highestLevel", 2).unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get_u32("highestScore").unwrap(), Some(12));
        assert_eq!(reopened.get_u32("highestLevel").unwrap(), Some(2));
        assert!(!path.with_extension("tmp").exists());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = scratch("corrupt");
        fs::write(&path, "{ not json").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(PersistenceError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
