//! Obstacle values and the difficulty curve that produces them
//!
//! Two policies are available:
//! - `LevelTable`: staged difficulty, one parameter set per level
//! - `ExponentialDecay`: smooth difficulty driven by the obstacle count
//!
//! Both clamp the opening size to `MIN_OPENING_SIZE` so the game stays playable.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{DECAY_CONSTANT, MIN_OPENING_SIZE};
use crate::percentage::{PercentRange, Percentage};

/// An obstacle pair: where its gap sits and how tall the gap is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Gap height as a fraction of the playfield height
    pub opening_size: Percentage,
    /// Gap centre as a fraction of the playfield height, measured from the bottom
    pub opening_position: Percentage,
}

/// Ranges new obstacles are sampled from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleParameters {
    pub opening_size: PercentRange,
    pub opening_position: PercentRange,
}

impl ObstacleParameters {
    /// Used when no configured entry is usable
    pub const SAFE_DEFAULT: Self = Self {
        opening_size: PercentRange::fractions(0.45, 0.55),
        opening_position: PercentRange::fractions(0.4, 0.6),
    };

    pub const fn new(opening_size: PercentRange, opening_position: PercentRange) -> Self {
        Self {
            opening_size,
            opening_position,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.opening_size.is_valid() && self.opening_position.is_valid()
    }

    pub fn contains(&self, obstacle: &Obstacle) -> bool {
        self.opening_size.contains(obstacle.opening_size)
            && self.opening_position.contains(obstacle.opening_position)
    }

    /// Raise the opening size range to the playable floor
    fn with_size_floor(mut self) -> Self {
        if self.opening_size.min < MIN_OPENING_SIZE {
            self.opening_size.min = MIN_OPENING_SIZE;
        }
        if self.opening_size.max < self.opening_size.min {
            self.opening_size.max = self.opening_size.min;
        }
        self
    }

    /// Sample size and position independently
    pub fn sample(&self, rng: &mut Pcg32) -> Obstacle {
        Obstacle {
            opening_size: self.opening_size.sample(rng),
            opening_position: self.opening_position.sample(rng),
        }
    }
}

/// How far the run has progressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Current level (obstacles passed / obstacles per level)
    pub level: u32,
    /// Obstacles generated so far this run
    pub generated: u32,
}

/// Difficulty curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationPolicy {
    /// Fixed table indexed by `min(level, last index)`
    LevelTable { levels: Vec<ObstacleParameters> },
    /// Ranges tighten by `decay^(-generated)`
    ExponentialDecay {
        decay: f32,
        opening_size: PercentRange,
        opening_position: PercentRange,
    },
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self::LevelTable {
            levels: default_levels(),
        }
    }
}

/// Six stages: the gap shrinks while its position wanders further from centre
pub fn default_levels() -> Vec<ObstacleParameters> {
    vec![
        ObstacleParameters::new(PercentRange::fractions(0.50, 0.60), PercentRange::fractions(0.40, 0.60)),
        ObstacleParameters::new(PercentRange::fractions(0.42, 0.52), PercentRange::fractions(0.35, 0.65)),
        ObstacleParameters::new(PercentRange::fractions(0.35, 0.45), PercentRange::fractions(0.30, 0.70)),
        ObstacleParameters::new(PercentRange::fractions(0.29, 0.38), PercentRange::fractions(0.25, 0.75)),
        ObstacleParameters::new(PercentRange::fractions(0.24, 0.32), PercentRange::fractions(0.22, 0.78)),
        ObstacleParameters::new(PercentRange::fractions(0.20, 0.27), PercentRange::fractions(0.20, 0.80)),
    ]
}

impl GenerationPolicy {
    /// Continuous policy with the stock ranges (gap 200..500 points on a 768 point field)
    pub fn exponential_decay() -> Self {
        Self::ExponentialDecay {
            decay: DECAY_CONSTANT,
            opening_size: PercentRange::fractions(0.26, 0.65),
            opening_position: PercentRange::fractions(0.25, 0.75),
        }
    }

    /// Parameters for the next obstacle at the given progress
    pub fn parameters_for(&self, progress: Progress) -> ObstacleParameters {
        let params = match self {
            Self::LevelTable { levels } => level_entry(levels, progress.level),
            Self::ExponentialDecay {
                decay,
                opening_size,
                opening_position,
            } => {
                let factor = decay_factor(*decay, progress.generated);
                let (size_min, size_max) = opening_size.ordered();
                let (pos_min, pos_max) = opening_position.ordered();
                let centre = opening_position.midpoint();
                ObstacleParameters::new(
                    PercentRange::new(size_min, size_min.lerp(size_max, factor)),
                    PercentRange::new(centre.lerp(pos_min, factor), centre.lerp(pos_max, factor)),
                )
            }
        };
        params.with_size_floor()
    }

    /// Repair malformed parameters, logging what was changed
    pub fn validated(self) -> Self {
        match self {
            Self::LevelTable { levels } => {
                if levels.is_empty() {
                    log::warn!("Empty level table, using the default table");
                    return Self::default();
                }
                let invalid = levels.iter().filter(|p| !p.is_valid()).count();
                if invalid > 0 {
                    log::warn!("{} invalid level entries will fall back to earlier levels", invalid);
                }
                Self::LevelTable { levels }
            }
            Self::ExponentialDecay {
                decay,
                opening_size,
                opening_position,
            } => {
                let decay = if decay.is_finite() && decay > 1.0 {
                    decay
                } else {
                    log::warn!("Decay constant {} must exceed 1, using {}", decay, DECAY_CONSTANT);
                    DECAY_CONSTANT
                };
                let defaults = ObstacleParameters::SAFE_DEFAULT;
                let opening_size = if opening_size.is_valid() {
                    opening_size
                } else {
                    log::warn!("Invalid opening size range {:?}, using default", opening_size);
                    defaults.opening_size
                };
                let opening_position = if opening_position.is_valid() {
                    opening_position
                } else {
                    log::warn!("Invalid opening position range {:?}, using default", opening_position);
                    defaults.opening_position
                };
                Self::ExponentialDecay {
                    decay,
                    opening_size,
                    opening_position,
                }
            }
        }
    }
}

/// `decay^(-n)`, 1.0 at the start of a run and falling toward 0
pub fn decay_factor(decay: f32, generated: u32) -> f32 {
    decay.max(1.0).powf(-(generated as f32))
}

/// Entry for `level`, falling back to the last valid entry at or below it
fn level_entry(levels: &[ObstacleParameters], level: u32) -> ObstacleParameters {
    let Some(last) = levels.len().checked_sub(1) else {
        return ObstacleParameters::SAFE_DEFAULT;
    };
    let index = (level as usize).min(last);
    levels[..=index]
        .iter()
        .rev()
        .find(|p| p.is_valid())
        .copied()
        .unwrap_or(ObstacleParameters::SAFE_DEFAULT)
}

/// Seeded obstacle source
#[derive(Debug, Clone)]
pub struct ObstacleGenerator {
    policy: GenerationPolicy,
    rng: Pcg32,
    generated: u32,
}

impl ObstacleGenerator {
    pub fn new(policy: GenerationPolicy, seed: u64) -> Self {
        Self {
            policy,
            rng: Pcg32::seed_from_u64(seed),
            generated: 0,
        }
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    /// Obstacles generated since the last rewind
    pub fn generated(&self) -> u32 {
        self.generated
    }

    /// Set the progress counter (run reset or checkpoint restore)
    pub fn rewind(&mut self, generated: u32) {
        self.generated = generated;
    }

    /// Produce the next obstacle for the given level
    pub fn generate(&mut self, level: u32) -> Obstacle {
        let progress = Progress {
            level,
            generated: self.generated,
        };
        let obstacle = self.policy.parameters_for(progress).sample(&mut self.rng);
        self.generated = self.generated.saturating_add(1);
        obstacle
    }
}
