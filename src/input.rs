//! Trigger input
//!
//! A velocity-sensitive source (a MIDI keyboard in practice) reports note-on
//! events from its own callback context. Each becomes a `TriggerEvent` and is
//! queued until the simulation drains it at the start of the next tick.

use std::sync::mpsc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest magnitude a trigger can carry (7-bit MIDI velocity)
pub const MAX_MAGNITUDE: u8 = 127;

/// A single advance signal with magnitude in 1..=127
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerEvent {
    magnitude: u8,
}

impl TriggerEvent {
    /// Zero velocity carries no signal and is dropped; oversized values clamp
    pub fn from_velocity(velocity: u8) -> Option<Self> {
        if velocity == 0 {
            return None;
        }
        Some(Self {
            magnitude: velocity.min(MAX_MAGNITUDE),
        })
    }

    /// Decode a raw MIDI message; only note-on with non-zero velocity counts
    ///
    /// Note-on with velocity 0 is a note-off by convention.
    pub fn from_midi(message: &[u8]) -> Option<Self> {
        match message {
            [status, _note, velocity, ..] if status & 0xF0 == 0x90 => {
                Self::from_velocity(velocity & 0x7F)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn magnitude(self) -> u8 {
        self.magnitude
    }
}

/// Errors binding an input source
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("input source `{wanted}` is not available")]
    NotFound { wanted: String },
    #[error("input source label is empty")]
    EmptyLabel,
}

/// The input source a session listens to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputBinding {
    label: String,
}

impl InputBinding {
    pub fn new(label: impl Into<String>) -> Result<Self, BindingError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(BindingError::EmptyLabel);
        }
        Ok(Self { label })
    }

    /// Bind to the source whose display name matches `wanted` exactly
    ///
    /// Device names can carry trailing spaces, so no trimming happens here.
    pub fn select<S: AsRef<str>>(available: &[S], wanted: &str) -> Result<Self, BindingError> {
        available
            .iter()
            .map(AsRef::as_ref)
            .find(|name| *name == wanted)
            .ok_or_else(|| BindingError::NotFound {
                wanted: wanted.to_string(),
            })
            .and_then(Self::new)
    }

    /// Human-readable name for display
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Build a connected sender/queue pair
pub fn trigger_channel() -> (TriggerSender, TriggerQueue) {
    let (tx, rx) = mpsc::channel();
    (TriggerSender { tx }, TriggerQueue { rx })
}

/// Sending half, safe to move to the device callback thread
#[derive(Debug, Clone)]
pub struct TriggerSender {
    tx: mpsc::Sender<TriggerEvent>,
}

impl TriggerSender {
    /// Queue a trigger. Returns false once the session is gone.
    pub fn send(&self, event: TriggerEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// Queue a raw velocity; zero is filtered here and never reaches the game
    pub fn send_velocity(&self, velocity: u8) -> bool {
        match TriggerEvent::from_velocity(velocity) {
            Some(event) => self.send(event),
            None => true,
        }
    }

    /// Queue a raw MIDI message; anything but a note-on is filtered
    pub fn send_midi(&self, message: &[u8]) -> bool {
        match TriggerEvent::from_midi(message) {
            Some(event) => self.send(event),
            None => true,
        }
    }
}

/// Receiving half, owned by the simulation
#[derive(Debug)]
pub struct TriggerQueue {
    rx: mpsc::Receiver<TriggerEvent>,
}

impl TriggerQueue {
    /// Everything queued so far, oldest first
    pub fn drain(&self) -> Vec<TriggerEvent> {
        self.rx.try_iter().collect()
    }
}
