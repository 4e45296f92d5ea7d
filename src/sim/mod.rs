//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestep only
//! - Seeded RNG only
//! - Stable iteration order (newest obstacle first, bodies by ID)
//! - No rendering or platform dependencies

pub mod contact;
pub mod geometry;
pub mod obstacle;
pub mod probe;
pub mod state;
pub mod stream;
pub mod tick;

pub use contact::{CategoryTags, Contact, ContactOutcome, classify};
pub use geometry::{LivingRegion, ObstacleLayout, Playfield, Rect};
pub use obstacle::{GenerationPolicy, Obstacle, ObstacleGenerator, ObstacleParameters, Progress};
pub use probe::{Body, ContactProbe, ObstaclePart};
pub use state::{Avatar, BodyMode, CheckPoint, GameEvent, GamePhase, GameState};
pub use stream::{LiveObstacle, ObstacleStream};
pub use tick::{
    SceneIntent, TickInput, finalize, integrate, on_contact, on_trigger, resize, tick, tick_with,
};
