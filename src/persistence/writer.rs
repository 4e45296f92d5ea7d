//! Fire-and-forget record persistence
//!
//! On native targets records are handed to a background thread so a slow disk
//! never stalls a tick. LocalStorage is synchronous and cheap, and wasm32 has
//! no threads, so the browser build writes inline.

use crate::highscores::Records;

use super::KeyValueStore;

#[cfg(not(target_arch = "wasm32"))]
use std::sync::mpsc;
#[cfg(not(target_arch = "wasm32"))]
use std::thread::JoinHandle;

#[cfg(not(target_arch = "wasm32"))]
pub struct RecordWriter {
    tx: Option<mpsc::Sender<Records>>,
    handle: Option<JoinHandle<()>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl RecordWriter {
    /// `baseline` is what the store already holds; only changes from it are written
    pub fn spawn(mut store: Box<dyn KeyValueStore>, baseline: Records) -> Self {
        let (tx, rx) = mpsc::channel::<Records>();
        let spawned = std::thread::Builder::new()
            .name("record-writer".to_string())
            .spawn(move || {
                let mut saved = baseline;
                while let Ok(mut records) = rx.recv() {
                    // Only the newest snapshot matters
                    while let Ok(newer) = rx.try_recv() {
                        records = newer;
                    }
                    match records.save_changes(&saved, store.as_mut()) {
                        Ok(()) => {
                            saved = records;
                            log::debug!(
                                "Records saved (score {}, level {})",
                                records.highest_score,
                                records.highest_level
                            );
                        }
                        Err(e) => log::warn!("Failed to save records: {}", e),
                    }
                }
            });

        match spawned {
            Ok(handle) => Self {
                tx: Some(tx),
                handle: Some(handle),
            },
            Err(e) => {
                log::warn!("Record writer unavailable, records will not persist: {}", e);
                Self {
                    tx: None,
                    handle: None,
                }
            }
        }
    }

    /// Queue a snapshot for saving
    pub fn submit(&mut self, records: Records) {
        let stopped = self
            .tx
            .as_ref()
            .is_some_and(|tx| tx.send(records).is_err());
        if stopped {
            log::warn!("Record writer stopped, dropping snapshot");
            self.tx = None;
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Drop for RecordWriter {
    /// Flush pending writes before the session goes away
    fn drop(&mut self) {
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Record writer panicked, last snapshot may be lost");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub struct RecordWriter {
    store: Box<dyn KeyValueStore>,
    saved: Records,
}

#[cfg(target_arch = "wasm32")]
impl RecordWriter {
    pub fn spawn(store: Box<dyn KeyValueStore>, baseline: Records) -> Self {
        Self {
            store,
            saved: baseline,
        }
    }

    pub fn submit(&mut self, records: Records) {
        match records.save_changes(&self.saved, self.store.as_mut()) {
            Ok(()) => self.saved = records,
            Err(e) => log::warn!("Failed to save records: {}", e),
        }
    }
}
