//! MIDI Bird - a one-button side-scroller driven by a MIDI trigger
//!
//! Core modules:
//! - `sim`: Deterministic simulation (state machine, obstacle stream, contacts)
//! - `input`: Trigger events, MIDI decoding and the input binding
//! - `session`: Glue between input, simulation, persistence and observers
//! - `persistence`: Key-value stores for records and settings
//! - `platform`: Browser bindings (wasm32 only)

pub mod demo;
pub mod highscores;
pub mod input;
pub mod percentage;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::Records;
pub use input::{BindingError, InputBinding, TriggerEvent, TriggerSender};
pub use percentage::{PercentRange, Percentage};
pub use persistence::{KeyValueStore, MemoryStore, PersistenceError};
pub use session::Session;
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    use crate::percentage::Percentage;

    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default viewport, in points
    pub const DEFAULT_PLAYFIELD_WIDTH: f32 = 1024.0;
    pub const DEFAULT_PLAYFIELD_HEIGHT: f32 = 768.0;

    /// Obstacle scroll speed (points/s)
    pub const SCROLL_SPEED: f32 = 200.0;
    pub const OBSTACLE_WIDTH: f32 = 20.0;
    /// Centre-to-centre distance between consecutive obstacles
    pub const OBSTACLE_SPACING: f32 = 400.0;
    /// Living region extends the viewport by this much on both sides
    pub const LIVING_MARGIN: f32 = 60.0;

    pub const AVATAR_RADIUS: f32 = 10.0;
    pub const AVATAR_MASS: f32 = 1.0;
    /// Downward acceleration (points/s²)
    pub const GRAVITY: f32 = 980.0;
    /// Impulse per unit of trigger magnitude; 127 * 6 gives a full-strength hop
    pub const INPUT_SENSIBILITY: f32 = 6.0;

    pub const OBSTACLES_PER_LEVEL: u32 = 5;
    /// Per-obstacle decay base for the exponential policy
    pub const DECAY_CONSTANT: f32 = 1.05;
    /// No gap is ever smaller than this share of the playfield height
    pub const MIN_OPENING_SIZE: Percentage = Percentage::new(0.15);

    /// Guard against runaway spawning after a huge resize
    pub const MAX_SPAWNS_PER_TICK: usize = 64;
}
