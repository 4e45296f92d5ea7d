//! Highest score and level across runs
//!
//! Stored as two integer keys. Missing values read as zero.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, PersistenceError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Records {
    pub highest_score: u32,
    pub highest_level: u32,
}

impl Records {
    pub const SCORE_KEY: &'static str = "highestScore";
    pub const LEVEL_KEY: &'static str = "highestLevel";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load each value on its own; an unreadable one starts at zero
    ///
    /// The other value is still loaded, so a later save never clobbers it.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let records = Self {
            highest_score: Self::load_key(store, Self::SCORE_KEY),
            highest_level: Self::load_key(store, Self::LEVEL_KEY),
        };
        log::info!(
            "Loaded records: score {}, level {}",
            records.highest_score,
            records.highest_level
        );
        records
    }

    fn load_key(store: &dyn KeyValueStore, key: &str) -> u32 {
        match store.get_u32(key) {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                log::warn!("Could not load `{}`, starting from zero: {}", key, e);
                0
            }
        }
    }

    pub fn try_load(store: &dyn KeyValueStore) -> Result<Self, PersistenceError> {
        Ok(Self {
            highest_score: store.get_u32(Self::SCORE_KEY)?.unwrap_or(0),
            highest_level: store.get_u32(Self::LEVEL_KEY)?.unwrap_or(0),
        })
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        store.set_u32(Self::SCORE_KEY, self.highest_score)?;
        store.set_u32(Self::LEVEL_KEY, self.highest_level)?;
        Ok(())
    }

    /// Write only the values that differ from `previous`
    ///
    /// Keys that failed to load stay untouched until a run actually beats them.
    pub fn save_changes(
        &self,
        previous: &Records,
        store: &mut dyn KeyValueStore,
    ) -> Result<(), PersistenceError> {
        if self.highest_score != previous.highest_score {
            store.set_u32(Self::SCORE_KEY, self.highest_score)?;
        }
        if self.highest_level != previous.highest_level {
            store.set_u32(Self::LEVEL_KEY, self.highest_level)?;
        }
        Ok(())
    }

    /// Raise either value if exceeded. Returns true when something changed.
    pub fn apply_if_record(&mut self, score: u32, level: u32) -> bool {
        let mut changed = false;
        if score > self.highest_score {
            self.highest_score = score;
            changed = true;
        }
        if level > self.highest_level {
            self.highest_level = level;
            changed = true;
        }
        changed
    }
}
