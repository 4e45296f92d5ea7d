//! Game state and the transitions between phases
//!
//! Every mutation of counters goes through a named transition here
//! (`start_run`, `hop`, `record_pass`, `end_run`, `reset`), and each one
//! queues a `GameEvent` for observers instead of touching the UI directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{LivingRegion, ObstacleLayout, Playfield};
use super::obstacle::ObstacleGenerator;
use super::stream::{LiveObstacle, ObstacleStream};
use crate::highscores::Records;
use crate::input::TriggerEvent;
use crate::settings::Settings;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Avatar suspended, no obstacles, waiting for the first trigger
    Ready,
    /// Active run
    Started { obstacles_passed: u32 },
    /// Run ended; reset is applied at the end of the tick
    GameOver,
}

impl GamePhase {
    pub fn is_started(&self) -> bool {
        matches!(self, GamePhase::Started { .. })
    }
}

/// Whether gravity and impulses act on the avatar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyMode {
    Suspended,
    Dynamic,
}

/// The player's avatar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub mass: f32,
    pub mode: BodyMode,
}

impl Avatar {
    pub fn new(start: Vec2, radius: f32, mass: f32) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            radius,
            mass,
            mode: BodyMode::Suspended,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.mode == BodyMode::Dynamic
    }

    /// Back to the start position, motionless and suspended
    pub fn reset(&mut self, start: Vec2) {
        self.pos = start;
        self.vel = Vec2::ZERO;
        self.mode = BodyMode::Suspended;
    }

    /// Cancel vertical motion, then push upward
    ///
    /// Zeroing first keeps repeated hops from stacking into runaway speed.
    pub fn hop(&mut self, impulse: f32) {
        self.vel.y = 0.0;
        self.vel.y += impulse / self.mass;
    }

    /// Semi-implicit Euler step under gravity
    pub fn integrate(&mut self, gravity: f32, dt: f32) {
        if !self.is_dynamic() {
            return;
        }
        self.vel.y -= gravity * dt;
        self.pos += self.vel * dt;
    }
}

/// Progress snapshot taken at the last pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPoint {
    pub obstacles_passed: u32,
    pub score: u32,
}

/// Things observers may want to react to (HUD, audio, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A run began, possibly from a checkpoint
    Started { score: u32, level: u32 },
    /// Trigger applied an impulse
    Hop { magnitude: u8 },
    ObstaclePassed { score: u32 },
    LevelUp { level: u32 },
    NewRecord { highest_score: u32, highest_level: u32 },
    GameOver { score: u32 },
    /// Back to Ready
    Reset,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub records: Records,
    pub checkpoint: Option<CheckPoint>,
    pub avatar: Avatar,
    pub stream: ObstacleStream,
    pub playfield: Playfield,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set by a blocking contact, consumed by the end-of-tick finalizer
    pub(crate) pending_reset: bool,
    generator: ObstacleGenerator,
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh state in `Ready`. Settings are validated here.
    pub fn new(settings: Settings, playfield: Playfield, seed: u64) -> Self {
        let settings = settings.validated();
        let generator = ObstacleGenerator::new(settings.generation.clone(), seed);
        let avatar = Avatar::new(settings.avatar_start, settings.avatar_radius, settings.avatar_mass);
        Self {
            seed,
            settings,
            phase: GamePhase::Ready,
            score: 0,
            level: 0,
            records: Records::default(),
            checkpoint: None,
            avatar,
            stream: ObstacleStream::new(),
            playfield,
            time_ticks: 0,
            pending_reset: false,
            generator,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Builder-style: start with previously persisted records
    pub fn with_records(mut self, records: Records) -> Self {
        self.records = records;
        self
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn obstacles_passed(&self) -> u32 {
        match self.phase {
            GamePhase::Started { obstacles_passed } => obstacles_passed,
            _ => 0,
        }
    }

    pub fn living_region(&self) -> LivingRegion {
        self.playfield.living_region(self.settings.living_margin)
    }

    /// Layout of a live obstacle at its current screen position
    pub fn layout_of(&self, live: &LiveObstacle) -> ObstacleLayout {
        ObstacleLayout::new(&live.obstacle, &self.playfield, self.settings.obstacle_width)
            .at(self.stream.x_of(live))
    }

    /// Take the queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn level_for(&self, obstacles_passed: u32) -> u32 {
        obstacles_passed / self.settings.obstacles_per_level
    }

    /// Apply a trigger in whatever phase we are in
    ///
    /// Returns true if the trigger had an effect.
    pub fn trigger(&mut self, event: TriggerEvent) -> bool {
        match self.phase {
            GamePhase::Ready => {
                self.start_run();
                true
            }
            GamePhase::Started { .. } => {
                self.hop(event.magnitude());
                true
            }
            // Must fully reset before input counts again
            GamePhase::GameOver => false,
        }
    }

    /// Ready -> Started
    pub fn start_run(&mut self) {
        if self.phase != GamePhase::Ready {
            return;
        }
        let restored = if self.settings.checkpoints {
            self.checkpoint.unwrap_or_default()
        } else {
            CheckPoint::default()
        };
        self.score = restored.score;
        self.level = self.level_for(restored.obstacles_passed);
        self.generator.rewind(restored.obstacles_passed);
        self.phase = GamePhase::Started {
            obstacles_passed: restored.obstacles_passed,
        };
        self.avatar.mode = BodyMode::Dynamic;
        log::info!("Run started (score {}, level {})", self.score, self.level);
        self.events.push(GameEvent::Started {
            score: self.score,
            level: self.level,
        });
    }

    /// Started: zero vertical velocity, then impulse = magnitude * sensibility
    pub fn hop(&mut self, magnitude: u8) {
        if !self.phase.is_started() {
            return;
        }
        self.avatar
            .hop(f32::from(magnitude) * self.settings.input_sensibility);
        self.events.push(GameEvent::Hop { magnitude });
    }

    /// Started -> Started on a pass: one point, level, checkpoint, records
    pub fn record_pass(&mut self) {
        let GamePhase::Started { obstacles_passed } = self.phase else {
            return;
        };
        let obstacles_passed = obstacles_passed + 1;
        self.phase = GamePhase::Started { obstacles_passed };
        self.score += 1;
        self.events.push(GameEvent::ObstaclePassed { score: self.score });

        let level = self.level_for(obstacles_passed);
        if level != self.level {
            self.level = level;
            log::info!("Level {}", level);
            self.events.push(GameEvent::LevelUp { level });
        }

        self.checkpoint = Some(CheckPoint {
            obstacles_passed,
            score: self.score,
        });
        self.apply_highscore_if_record();
    }

    /// Raise persisted highs if this run beat them
    pub fn apply_highscore_if_record(&mut self) -> bool {
        let changed = self.records.apply_if_record(self.score, self.level);
        if changed {
            log::info!(
                "New record: score {}, level {}",
                self.records.highest_score,
                self.records.highest_level
            );
            self.events.push(GameEvent::NewRecord {
                highest_score: self.records.highest_score,
                highest_level: self.records.highest_level,
            });
        }
        changed
    }

    /// Started -> GameOver. The reset itself waits for the end of the tick.
    pub fn end_run(&mut self) {
        if !self.phase.is_started() {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.pending_reset = true;
        log::info!("Game over (score {})", self.score);
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    /// GameOver -> Ready. Returns the obstacles that were cleared.
    pub fn reset(&mut self) -> Vec<LiveObstacle> {
        let cleared = self.stream.clear();
        self.avatar.reset(self.settings.avatar_start);
        self.score = 0;
        self.level = 0;
        self.generator.rewind(0);
        self.phase = GamePhase::Ready;
        self.pending_reset = false;
        log::info!("Reset ({} obstacles cleared)", cleared.len());
        self.events.push(GameEvent::Reset);
        cleared
    }

    /// Generate, register and return the next obstacle
    pub(crate) fn spawn_obstacle(&mut self) -> LiveObstacle {
        let id = self.next_entity_id();
        let obstacle = self.generator.generate(self.level);
        let first_x = self.playfield.leading_edge() + self.settings.first_spawn_offset();
        let live = self
            .stream
            .spawn(id, obstacle, first_x, self.settings.obstacle_spacing);
        log::debug!(
            "Spawned obstacle {} (gap {} at {})",
            id,
            obstacle.opening_size,
            obstacle.opening_position
        );
        live
    }
}
