//! A playable session
//!
//! Owns the simulation state and everything around it: the trigger queue fed
//! from the input context, the record writer, and the observers that replace
//! UI side effects. Hosts either report contacts themselves through `tick`, or
//! enable the built-in probe and drive the game with `update`.

use crate::consts::*;
use crate::highscores::Records;
use crate::input::{InputBinding, TriggerQueue, TriggerSender, trigger_channel};
use crate::persistence::{KeyValueStore, RecordWriter};
use crate::settings::Settings;
use crate::sim::{
    Contact, ContactProbe, GameEvent, GamePhase, GameState, Playfield, SceneIntent, TickInput,
    resize, tick, tick_with,
};

/// Observer callback for game events
pub type Listener = Box<dyn FnMut(&GameEvent)>;

pub struct Session {
    state: GameState,
    binding: InputBinding,
    sender: TriggerSender,
    queue: TriggerQueue,
    writer: RecordWriter,
    probe: Option<ContactProbe>,
    listeners: Vec<Listener>,
    /// Last records handed to the writer
    saved: Records,
    accumulator: f32,
}

impl Session {
    /// Load records from `store`, then hand it to the background writer
    pub fn new(settings: Settings, binding: InputBinding, store: Box<dyn KeyValueStore>) -> Self {
        let records = Records::load(store.as_ref());
        let seed = settings.seed.unwrap_or_else(rand::random);
        let playfield = Playfield::new(DEFAULT_PLAYFIELD_WIDTH, DEFAULT_PLAYFIELD_HEIGHT);
        let state = GameState::new(settings, playfield, seed).with_records(records);
        let (sender, queue) = trigger_channel();

        log::info!("Session bound to `{}` (seed {})", binding.label(), seed);

        Self {
            state,
            binding,
            sender,
            queue,
            writer: RecordWriter::spawn(store, records),
            probe: None,
            listeners: Vec::new(),
            saved: records,
            accumulator: 0.0,
        }
    }

    /// Builder-style: detect contacts internally instead of from the host
    pub fn with_probe(mut self) -> Self {
        self.probe = Some(ContactProbe::new());
        self
    }

    /// Handle for the input callback context
    pub fn trigger_sender(&self) -> TriggerSender {
        self.sender.clone()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GameEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn records(&self) -> Records {
        self.state.records
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Human-readable label of the bound input source
    pub fn input_label(&self) -> &str {
        self.binding.label()
    }

    /// Run one simulation step
    ///
    /// `contacts` are the begin-contacts the physics host saw during this
    /// step. With the probe enabled, its detections are dispatched after them.
    pub fn tick(&mut self, dt: f32, contacts: &[Contact]) -> Vec<SceneIntent> {
        let input = TickInput {
            triggers: self.queue.drain(),
            contacts: contacts.to_vec(),
        };
        let intents = match self.probe.as_mut() {
            Some(probe) => tick_with(&mut self.state, &input, dt, |state| probe.detect(state)),
            None => tick(&mut self.state, &input, dt),
        };
        self.after_step();
        intents
    }

    /// Advance by a frame's worth of fixed `SIM_DT` steps
    pub fn update(&mut self, frame_dt: f32) -> Vec<SceneIntent> {
        // A NaN frame would poison the accumulator for good
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, 0.1)
        } else {
            log::warn!("Ignoring non-finite frame time {}", frame_dt);
            0.0
        };
        self.accumulator += frame_dt;

        let mut intents = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            intents.extend(self.tick(SIM_DT, &[]));
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        intents
    }

    /// New viewport size; live obstacles are re-laid out
    pub fn resize(&mut self, width: f32, height: f32) -> Vec<SceneIntent> {
        let intents = resize(&mut self.state, width, height);
        self.after_step();
        intents
    }

    /// Persist new records and notify observers
    fn after_step(&mut self) {
        if self.state.records != self.saved {
            self.saved = self.state.records;
            self.writer.submit(self.saved);
        }

        let events = self.state.drain_events();
        for event in &events {
            for listener in &mut self.listeners {
                listener(event);
            }
        }
    }
}
