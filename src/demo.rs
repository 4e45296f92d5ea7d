//! Demo mode - AI plays the game
//!
//! Steers toward the gap of the next obstacle ahead of the avatar. Each hop
//! is sized to peak just above the gap centre, so the avatar bobs through the
//! opening instead of flapping at full strength.

use crate::input::{MAX_MAGNITUDE, TriggerEvent};
use crate::sim::{GamePhase, GameState};

/// How far ahead (seconds) the fall is extrapolated before deciding to hop
const LOOKAHEAD: f32 = 0.08;
/// Half-height of the band the avatar bobs in around the target
const HOLD_BAND: f32 = 10.0;

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    hops: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hops issued so far
    pub fn hops(&self) -> u32 {
        self.hops
    }

    /// Height the avatar should hold right now
    pub fn target_height(state: &GameState) -> f32 {
        let avatar = &state.avatar;
        let half_width = state.settings.obstacle_width / 2.0;

        // Nearest obstacle whose trailing side is not yet behind the avatar
        state
            .stream
            .iter()
            .filter(|live| state.stream.x_of(live) + half_width >= avatar.pos.x - avatar.radius)
            .min_by(|a, b| {
                state
                    .stream
                    .x_of(a)
                    .partial_cmp(&state.stream.x_of(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|live| state.layout_of(live).gap_center())
            .unwrap_or(state.settings.avatar_start.y)
    }

    /// Trigger to send this tick, if any
    pub fn decide(&mut self, state: &GameState) -> Option<TriggerEvent> {
        match state.phase {
            GamePhase::Ready => TriggerEvent::from_velocity(MAX_MAGNITUDE),
            GamePhase::GameOver => None,
            GamePhase::Started { .. } => {
                let avatar = &state.avatar;
                let target = Self::target_height(state);
                let predicted = avatar.pos.y + avatar.vel.y * LOOKAHEAD;
                if avatar.vel.y > 0.0 || predicted >= target - HOLD_BAND {
                    return None;
                }

                let rise = (target + HOLD_BAND - avatar.pos.y).max(HOLD_BAND);
                let speed = (2.0 * state.settings.gravity * rise).sqrt();
                let magnitude = (speed * avatar.mass / state.settings.input_sensibility)
                    .ceil()
                    .clamp(1.0, f32::from(MAX_MAGNITUDE));
                self.hops += 1;
                TriggerEvent::from_velocity(magnitude as u8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::{ContactProbe, Playfield, TickInput, tick};
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(Settings::default(), Playfield::new(1024.0, 768.0), 9)
    }

    #[test]
    fn test_starts_the_run() {
        let mut pilot = Autopilot::new();
        let event = pilot.decide(&state()).unwrap();
        assert_eq!(event.magnitude(), MAX_MAGNITUDE);
    }

    #[test]
    fn test_hops_only_when_falling_below_target() {
        let mut pilot = Autopilot::new();
        let mut state = state();
        state.start_run();

        state.avatar.pos = Vec2::new(0.0, -100.0);
        state.avatar.vel = Vec2::new(0.0, -50.0);
        assert!(pilot.decide(&state).is_some());

        state.avatar.vel = Vec2::new(0.0, 80.0);
        assert!(pilot.decide(&state).is_none());

        state.avatar.pos = Vec2::new(0.0, 100.0);
        state.avatar.vel = Vec2::ZERO;
        assert!(pilot.decide(&state).is_none());
        assert_eq!(pilot.hops(), 1);
    }

    #[test]
    fn test_flies_through_several_gaps() {
        let mut pilot = Autopilot::new();
        let mut probe = ContactProbe::new();
        let mut state = state();

        for _ in 0..2_400 {
            let mut input = TickInput::default();
            input.triggers.extend(pilot.decide(&state));
            // Contacts from the previous step's positions, as a host would report them
            input.contacts = probe.detect(&state);
            tick(&mut state, &input, SIM_DT);
            assert_ne!(state.phase, GamePhase::Ready, "autopilot crashed");
        }
        assert!(state.score >= 3, "only passed {} obstacles", state.score);
    }
}
