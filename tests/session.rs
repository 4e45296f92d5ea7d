//! End-to-end runs through the public API

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use midibird::consts::SIM_DT;
use midibird::demo::Autopilot;
use midibird::sim::{
    CategoryTags, Contact, ContactProbe, GameEvent, GamePhase, GameState, Playfield, SceneIntent,
    TickInput, tick,
};
use midibird::{InputBinding, MemoryStore, Records, Session, Settings, TriggerEvent};

fn seeded(seed: u64) -> Settings {
    Settings {
        seed: Some(seed),
        ..Settings::default()
    }
}

fn new_session(store: &MemoryStore) -> Session {
    Session::new(
        seeded(1234),
        InputBinding::new("Virtual Keyboard").unwrap(),
        Box::new(store.clone()),
    )
}

fn pass() -> Contact {
    Contact::with_avatar(CategoryTags::SUCCESS)
}

fn crash() -> Contact {
    Contact::with_avatar(CategoryTags::BLOCKING)
}

#[test]
fn level_advances_exactly_on_fifth_pass() {
    let store = MemoryStore::new();
    let mut session = new_session(&store);
    session.trigger_sender().send_velocity(100);
    session.tick(SIM_DT, &[]);

    for expected_score in 1..=4 {
        session.tick(SIM_DT, &[pass()]);
        assert_eq!(session.score(), expected_score);
        assert_eq!(session.level(), 0);
    }
    session.tick(SIM_DT, &[pass()]);
    assert_eq!(session.score(), 5);
    assert_eq!(session.level(), 1);
}

#[test]
fn hop_of_64_sets_upward_velocity() {
    let store = MemoryStore::new();
    let mut session = new_session(&store);
    let sender = session.trigger_sender();
    sender.send_velocity(30);
    session.tick(SIM_DT, &[]);

    // Let the avatar build up downward speed first
    for _ in 0..30 {
        session.tick(SIM_DT, &[]);
    }
    assert!(session.state().avatar.vel.y < 0.0);

    sender.send_velocity(64);
    session.tick(0.0, &[]);
    let expected = 64.0 * session.settings().input_sensibility;
    assert_eq!(session.state().avatar.vel.y, expected);
}

#[test]
fn crash_resets_to_ready_at_end_of_tick() {
    let store = MemoryStore::new();
    let mut session = new_session(&store);
    session.trigger_sender().send_velocity(100);
    session.tick(SIM_DT, &[]);
    session.tick(SIM_DT, &[pass()]);
    assert!(!session.state().stream.is_empty());

    let intents = session.tick(SIM_DT, &[crash()]);
    let state = session.state();
    assert_eq!(state.phase, GamePhase::Ready);
    assert!(state.stream.is_empty());
    assert_eq!(state.score, 0);
    assert_eq!(state.avatar.pos, state.settings.avatar_start);
    assert_eq!(state.avatar.vel, Vec2::ZERO);
    assert!(!state.avatar.is_dynamic());
    assert!(intents.iter().any(|i| matches!(i, SceneIntent::Despawn { .. })));

    // Records survive the reset
    assert_eq!(session.records().highest_score, 1);
}

#[test]
fn simultaneous_pass_and_block_is_a_crash() {
    let store = MemoryStore::new();
    let mut session = new_session(&store);
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.subscribe(move |event| sink.borrow_mut().push(*event));

    session.trigger_sender().send_velocity(100);
    session.tick(SIM_DT, &[]);
    let both = Contact::new(
        CategoryTags::AVATAR | CategoryTags::SUCCESS,
        CategoryTags::BLOCKING,
    );
    session.tick(SIM_DT, &[both]);

    let events = events.borrow();
    assert!(events.contains(&GameEvent::GameOver { score: 0 }));
    assert!(!events.iter().any(|e| matches!(e, GameEvent::ObstaclePassed { .. })));
}

#[test]
fn trigger_during_game_over_is_ignored() {
    let mut state = GameState::new(seeded(3), Playfield::new(800.0, 600.0), 3);
    state.start_run();
    state.end_run();
    assert!(!state.trigger(TriggerEvent::from_velocity(127).unwrap()));
    assert_eq!(state.phase, GamePhase::GameOver);

    // Still ignored on the tick that applies the reset
    let input = TickInput {
        triggers: vec![TriggerEvent::from_velocity(127).unwrap()],
        contacts: Vec::new(),
    };
    tick(&mut state, &input, SIM_DT);
    assert_eq!(state.phase, GamePhase::Ready);
}

#[test]
fn same_seed_same_run() {
    let run = |seed| {
        let mut state = GameState::new(seeded(seed), Playfield::new(1024.0, 768.0), seed);
        let mut pilot = Autopilot::new();
        let mut probe = ContactProbe::new();
        let mut spawned = Vec::new();
        for _ in 0..1_200 {
            let mut input = TickInput::default();
            input.triggers.extend(pilot.decide(&state));
            input.contacts = probe.detect(&state);
            for intent in tick(&mut state, &input, SIM_DT) {
                if let SceneIntent::Spawn { obstacle, .. } = intent {
                    spawned.push(obstacle);
                }
            }
        }
        (spawned, state.score)
    };
    assert_eq!(run(77), run(77));
}

#[test]
fn spacing_stays_exact_while_scrolling() {
    let mut state = GameState::new(seeded(8), Playfield::new(1024.0, 768.0), 8);
    state.start_run();
    let spacing = state.settings.obstacle_spacing;
    for _ in 0..3_000 {
        tick(&mut state, &TickInput::default(), SIM_DT);
        let xs: Vec<f32> = state.stream.iter().map(|o| state.stream.x_of(o)).collect();
        for pair in xs.windows(2) {
            assert!((pair[0] - pair[1] - spacing).abs() < 1e-2);
        }
        let front = state.stream.rightmost().unwrap();
        assert!(state.stream.x_of(front) > state.living_region().leading);
    }
}

#[test]
fn probe_session_records_new_highs() {
    let mut store = MemoryStore::new();
    Records {
        highest_score: 0,
        highest_level: 0,
    }
    .save(&mut store)
    .unwrap();

    let mut session = new_session(&store).with_probe();
    let sender = session.trigger_sender();
    let mut pilot = Autopilot::new();
    for _ in 0..2_400 {
        if let Some(event) = pilot.decide(session.state()) {
            sender.send(event);
        }
        session.tick(SIM_DT, &[]);
    }
    let highest = session.records().highest_score;
    assert!(highest >= 3);

    drop(session);
    assert_eq!(Records::load(&store).highest_score, highest);
}

#[test]
fn missing_binding_label_is_rejected() {
    assert!(InputBinding::new("").is_err());
    let available = ["Launchkey Mini", "IAC Bus 1"];
    assert_eq!(
        InputBinding::select(&available[..], "IAC Bus 1").unwrap().label(),
        "IAC Bus 1"
    );
    assert!(InputBinding::select(&available[..], "Oxygen 49").is_err());
}
