//! Fixed timestep simulation tick
//!
//! One tick runs, in order: trigger dispatch, motion integration, contact
//! dispatch, then the end-of-tick finalizer that applies deferred resets and
//! spawn/despawn decisions. The host never gets a scene graph to mutate; it
//! receives `SceneIntent`s describing what changed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::contact::{Contact, ContactOutcome, classify};
use super::geometry::{ObstacleLayout, Playfield};
use super::obstacle::Obstacle;
use super::state::{GamePhase, GameState};
use crate::consts::MAX_SPAWNS_PER_TICK;
use crate::input::TriggerEvent;

/// Declarative change for the render/physics host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneIntent {
    /// Create the bodies of a new obstacle pair
    Spawn {
        id: u32,
        obstacle: Obstacle,
        x: f32,
        layout: ObstacleLayout,
    },
    /// Remove an obstacle pair and release its bodies
    Despawn { id: u32 },
    /// Move/reshape an existing pair (after a resize)
    Reposition { id: u32, x: f32, layout: ObstacleLayout },
    /// Toggle gravity and impulses on the avatar body
    SetAvatarDynamic { dynamic: bool },
    /// Teleport the avatar (reset)
    PlaceAvatar { pos: Vec2 },
    /// Per-tick motion: total scroll so far plus the avatar's new state
    Motion { scroll: f32, avatar_pos: Vec2, avatar_vel: Vec2 },
}

/// Inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Triggers marshalled from the input context, oldest first
    pub triggers: Vec<TriggerEvent>,
    /// Contacts reported by the physics host for this step
    pub contacts: Vec<Contact>,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<SceneIntent> {
    tick_with(state, input, dt, |_| Vec::new())
}

/// Like `tick`, with `detect` reporting extra contacts from post-motion positions
///
/// Detected contacts are dispatched after the ones in `input`.
pub fn tick_with<F>(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    mut detect: F,
) -> Vec<SceneIntent>
where
    F: FnMut(&GameState) -> Vec<Contact>,
{
    let mut intents = Vec::new();
    state.time_ticks += 1;

    for &event in &input.triggers {
        on_trigger(state, event, &mut intents);
    }

    integrate(state, dt, &mut intents);

    for contact in &input.contacts {
        on_contact(state, contact);
    }
    for contact in detect(state) {
        on_contact(state, &contact);
    }

    finalize(state, &mut intents);
    intents
}

/// Apply one trigger. Ignored while `GameOver`.
pub fn on_trigger(state: &mut GameState, event: TriggerEvent, intents: &mut Vec<SceneIntent>) {
    let was_ready = state.phase == GamePhase::Ready;
    if state.trigger(event) && was_ready {
        intents.push(SceneIntent::SetAvatarDynamic { dynamic: true });
    }
}

/// Gravity on the avatar and constant scroll of the obstacle stream
pub fn integrate(state: &mut GameState, dt: f32, intents: &mut Vec<SceneIntent>) {
    if !state.phase.is_started() {
        return;
    }
    state.avatar.integrate(state.settings.gravity, dt);
    state.stream.advance(state.settings.scroll_speed * dt);
    intents.push(SceneIntent::Motion {
        scroll: state.stream.scroll(),
        avatar_pos: state.avatar.pos,
        avatar_vel: state.avatar.vel,
    });
}

/// Dispatch one contact. Only meaningful while `Started`.
pub fn on_contact(state: &mut GameState, contact: &Contact) -> ContactOutcome {
    if !state.phase.is_started() {
        return ContactOutcome::Ignore;
    }
    let outcome = classify(contact);
    match outcome {
        ContactOutcome::Pass => state.record_pass(),
        ContactOutcome::Collide => state.end_run(),
        ContactOutcome::Ignore => {}
    }
    outcome
}

/// End-of-tick pass: deferred reset, then despawn/spawn from current positions
///
/// Decisions depend only on positions, so calling this again without new
/// input or contacts changes nothing.
pub fn finalize(state: &mut GameState, intents: &mut Vec<SceneIntent>) {
    if state.pending_reset {
        for cleared in state.reset() {
            intents.push(SceneIntent::Despawn { id: cleared.id });
        }
        intents.push(SceneIntent::SetAvatarDynamic { dynamic: false });
        intents.push(SceneIntent::PlaceAvatar {
            pos: state.avatar.pos,
        });
        return;
    }

    if !state.phase.is_started() {
        return;
    }

    let region = state.living_region();
    for gone in state.stream.despawn_behind(&region) {
        log::debug!("Despawned obstacle {}", gone.id);
        intents.push(SceneIntent::Despawn { id: gone.id });
    }

    let mut spawned = 0;
    while state.stream.needs_spawn(&region) {
        if spawned == MAX_SPAWNS_PER_TICK {
            log::warn!("Spawn limit reached, continuing next tick");
            break;
        }
        let live = state.spawn_obstacle();
        let layout = state.layout_of(&live);
        intents.push(SceneIntent::Spawn {
            id: live.id,
            obstacle: live.obstacle,
            x: state.stream.x_of(&live),
            layout,
        });
        spawned += 1;
    }
}

/// Change the playfield size and re-lay out every live obstacle
pub fn resize(state: &mut GameState, width: f32, height: f32) -> Vec<SceneIntent> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        log::warn!("Ignoring invalid playfield size {}x{}", width, height);
        return Vec::new();
    }
    state.playfield = Playfield::new(width, height);
    log::debug!("Playfield resized to {}x{}", width, height);

    let mut intents: Vec<SceneIntent> = state
        .stream
        .iter()
        .map(|live| SceneIntent::Reposition {
            id: live.id,
            x: state.stream.x_of(live),
            layout: state.layout_of(live),
        })
        .collect();

    // A wider field may expose an uncovered gap ahead
    finalize(state, &mut intents);
    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::settings::Settings;
    use crate::sim::contact::CategoryTags;

    fn started() -> GameState {
        let mut state = GameState::new(Settings::default(), Playfield::new(1024.0, 768.0), 11);
        let input = TickInput {
            triggers: vec![TriggerEvent::from_velocity(80).unwrap()],
            contacts: Vec::new(),
        };
        tick(&mut state, &input, SIM_DT);
        state
    }

    fn spawn_ids(intents: &[SceneIntent]) -> Vec<u32> {
        intents
            .iter()
            .filter_map(|i| match i {
                SceneIntent::Spawn { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_ready_tick_does_nothing() {
        let mut state = GameState::new(Settings::default(), Playfield::new(1024.0, 768.0), 1);
        let intents = tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(intents.is_empty());
        assert!(state.stream.is_empty());
        assert_eq!(state.avatar.pos, state.settings.avatar_start);
    }

    #[test]
    fn test_start_fills_the_living_region() {
        let state = started();
        let region = state.living_region();
        let front = state.stream.rightmost().unwrap();
        assert!(state.stream.x_of(front) > region.leading);

        // First obstacle lands at the leading edge plus one obstacle width
        let first = state.stream.leftmost().unwrap();
        let expected = state.playfield.leading_edge() + state.settings.obstacle_width;
        assert!((state.stream.x_of(first) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_start_emits_dynamic_and_spawns() {
        let mut state = GameState::new(Settings::default(), Playfield::new(1024.0, 768.0), 2);
        let input = TickInput {
            triggers: vec![TriggerEvent::from_velocity(1).unwrap()],
            contacts: Vec::new(),
        };
        let intents = tick(&mut state, &input, SIM_DT);
        assert_eq!(intents[0], SceneIntent::SetAvatarDynamic { dynamic: true });
        assert_eq!(spawn_ids(&intents).len(), state.stream.len());
    }

    #[test]
    fn test_finalize_is_idempotent() {
        let mut state = started();
        for _ in 0..200 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if !state.phase.is_started() {
                break;
            }
        }
        let before: Vec<_> = state.stream.iter().map(|o| o.id).collect();
        let mut intents = Vec::new();
        finalize(&mut state, &mut intents);
        finalize(&mut state, &mut intents);
        assert!(intents.is_empty());
        let after: Vec<_> = state.stream.iter().map(|o| o.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_scrolling_despawns_behind() {
        let mut state = started();
        let first = state.stream.leftmost().unwrap().id;
        // Keep the avatar afloat: contacts are host-driven, so none arrive here
        let mut despawned = false;
        for _ in 0..2_000 {
            let intents = tick(&mut state, &TickInput::default(), SIM_DT);
            if intents.contains(&SceneIntent::Despawn { id: first }) {
                despawned = true;
                break;
            }
        }
        assert!(despawned);
        assert!(state.stream.get(first).is_none());
    }

    #[test]
    fn test_blocking_contact_resets_at_end_of_tick() {
        let mut state = started();
        state.record_pass();
        let input = TickInput {
            triggers: Vec::new(),
            contacts: vec![Contact::with_avatar(CategoryTags::BLOCKING)],
        };
        let intents = tick(&mut state, &input, SIM_DT);
        assert_eq!(state.phase, GamePhase::Ready);
        assert!(state.stream.is_empty());
        assert_eq!(state.score, 0);
        assert!(intents.contains(&SceneIntent::SetAvatarDynamic { dynamic: false }));
        assert!(intents.contains(&SceneIntent::PlaceAvatar {
            pos: state.settings.avatar_start
        }));
    }

    #[test]
    fn test_blocking_wins_over_success() {
        let mut state = started();
        let both = Contact::new(
            CategoryTags::AVATAR,
            CategoryTags::SUCCESS | CategoryTags::BLOCKING,
        );
        assert_eq!(on_contact(&mut state, &both), ContactOutcome::Collide);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_contacts_ignored_outside_started() {
        let mut state = GameState::new(Settings::default(), Playfield::new(1024.0, 768.0), 1);
        let pass = Contact::with_avatar(CategoryTags::SUCCESS);
        assert_eq!(on_contact(&mut state, &pass), ContactOutcome::Ignore);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_contacts_after_game_over_in_same_tick_are_ignored() {
        let mut state = started();
        let input = TickInput {
            triggers: Vec::new(),
            contacts: vec![
                Contact::with_avatar(CategoryTags::BLOCKING),
                Contact::with_avatar(CategoryTags::SUCCESS),
            ],
        };
        tick(&mut state, &input, SIM_DT);
        assert_eq!(state.score, 0);
        assert_eq!(state.records.highest_score, 0);
    }

    #[test]
    fn test_obstacles_move_at_scroll_speed() {
        let mut state = started();
        let id = state.stream.rightmost().unwrap().id;
        let x0 = state.stream.x_of(state.stream.get(id).unwrap());
        tick(&mut state, &TickInput::default(), 0.5);
        let x1 = state.stream.x_of(state.stream.get(id).unwrap());
        assert!((x0 - x1 - state.settings.scroll_speed * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_resize_repositions_and_covers() {
        let mut state = started();
        let ids: Vec<_> = state.stream.iter().map(|o| o.id).collect();
        let intents = resize(&mut state, 2048.0, 600.0);
        for id in &ids {
            assert!(intents.iter().any(|i| matches!(
                i,
                SceneIntent::Reposition { id: moved, layout, .. }
                    if moved == id && layout.top.max.y == 300.0
            )));
        }
        // Wider viewport needs more obstacles ahead
        assert!(!spawn_ids(&intents).is_empty());
        let front = state.stream.rightmost().unwrap();
        assert!(state.stream.x_of(front) > state.living_region().leading);
    }

    #[test]
    fn test_resize_rejects_degenerate_sizes() {
        let mut state = started();
        assert!(resize(&mut state, 0.0, 600.0).is_empty());
        assert_eq!(state.playfield, Playfield::new(1024.0, 768.0));
    }

    #[test]
    fn test_detected_contacts_see_moved_state() {
        let mut state = started();
        let before = state.stream.scroll();
        let mut seen_scroll = None;
        tick_with(&mut state, &TickInput::default(), SIM_DT, |moved| {
            seen_scroll = Some(moved.stream.scroll());
            vec![Contact::with_avatar(CategoryTags::SUCCESS)]
        });
        assert!(seen_scroll.unwrap() > before);
        assert_eq!(state.score, 1);
    }
}
