//! Game tuning and preferences
//!
//! Persisted as one JSON value in the key-value store. Unknown or missing
//! fields fall back to defaults, and `validated` repairs anything that would
//! break the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{KeyValueStore, PersistenceError};
use crate::sim::GenerationPolicy;

/// Difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Obstacle scroll speed (points/s)
    pub fn scroll_speed(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 160.0,
            Difficulty::Normal => SCROLL_SPEED,
            Difficulty::Hard => 260.0,
        }
    }

    /// Distance between consecutive obstacles (points)
    pub fn obstacle_spacing(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 480.0,
            Difficulty::Normal => OBSTACLE_SPACING,
            Difficulty::Hard => 352.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,

    // === Scrolling ===
    /// Horizontal obstacle speed (points/s)
    pub scroll_speed: f32,
    pub obstacle_width: f32,
    /// Centre-to-centre distance between obstacles
    pub obstacle_spacing: f32,
    /// How far past each viewport edge obstacles stay alive
    pub living_margin: f32,

    // === Avatar ===
    pub avatar_start: Vec2,
    pub avatar_radius: f32,
    pub avatar_mass: f32,
    /// Downward acceleration (points/s²)
    pub gravity: f32,
    /// Impulse per unit of trigger magnitude
    pub input_sensibility: f32,

    // === Progression ===
    pub obstacles_per_level: u32,
    /// Resume from the last pass when a new run starts
    pub checkpoints: bool,
    pub generation: GenerationPolicy,
    /// Fixed RNG seed (random per session when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,

            scroll_speed: SCROLL_SPEED,
            obstacle_width: OBSTACLE_WIDTH,
            obstacle_spacing: OBSTACLE_SPACING,
            living_margin: LIVING_MARGIN,

            avatar_start: Vec2::ZERO,
            avatar_radius: AVATAR_RADIUS,
            avatar_mass: AVATAR_MASS,
            gravity: GRAVITY,
            input_sensibility: INPUT_SENSIBILITY,

            obstacles_per_level: OBSTACLES_PER_LEVEL,
            checkpoints: false,
            generation: GenerationPolicy::default(),
            seed: None,
        }
    }
}

impl Settings {
    /// Store key for the JSON blob
    const STORAGE_KEY: &'static str = "settings";

    /// Settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self::default();
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates speed-dependent settings)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.scroll_speed = preset.scroll_speed();
        self.obstacle_spacing = preset.obstacle_spacing();
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// First x at which an empty stream spawns, relative to the leading edge
    pub fn first_spawn_offset(&self) -> f32 {
        self.obstacle_width
    }

    /// Copy with every malformed value replaced by its default
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let obstacle_width = positive("obstacle_width", self.obstacle_width, defaults.obstacle_width);
        let min_spacing = obstacle_width * 2.0;
        let obstacle_spacing = if self.obstacle_spacing.is_finite() && self.obstacle_spacing >= min_spacing {
            self.obstacle_spacing
        } else {
            let fallback = defaults.obstacle_spacing.max(min_spacing);
            log::warn!(
                "obstacle_spacing {} must be at least twice the obstacle width, using {}",
                self.obstacle_spacing,
                fallback
            );
            fallback
        };
        let living_margin = if self.living_margin.is_finite() && self.living_margin >= 0.0 {
            self.living_margin
        } else {
            log::warn!("living_margin {} is invalid, using {}", self.living_margin, defaults.living_margin);
            defaults.living_margin
        };
        let gravity = if self.gravity.is_finite() && self.gravity >= 0.0 {
            self.gravity
        } else {
            log::warn!("gravity {} is invalid, using {}", self.gravity, defaults.gravity);
            defaults.gravity
        };
        let avatar_start = if self.avatar_start.is_finite() {
            self.avatar_start
        } else {
            log::warn!("avatar_start {:?} is invalid, using origin", self.avatar_start);
            defaults.avatar_start
        };
        let obstacles_per_level = if self.obstacles_per_level == 0 {
            log::warn!("obstacles_per_level must be at least 1, using {}", defaults.obstacles_per_level);
            defaults.obstacles_per_level
        } else {
            self.obstacles_per_level
        };

        Self {
            difficulty: self.difficulty,
            scroll_speed: positive("scroll_speed", self.scroll_speed, defaults.scroll_speed),
            obstacle_width,
            obstacle_spacing,
            living_margin,
            avatar_start,
            avatar_radius: positive("avatar_radius", self.avatar_radius, defaults.avatar_radius),
            avatar_mass: positive("avatar_mass", self.avatar_mass, defaults.avatar_mass),
            gravity,
            input_sensibility: positive(
                "input_sensibility",
                self.input_sensibility,
                defaults.input_sensibility,
            ),
            obstacles_per_level,
            checkpoints: self.checkpoints,
            generation: self.generation.validated(),
            seed: self.seed,
        }
    }

    /// Load from the store, falling back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings.validated();
                }
                Err(e) => log::warn!("Stored settings are unreadable: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Could not read settings: {}", e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

fn positive(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("{} {} must be positive, using {}", name, value, default);
        default
    }
}
