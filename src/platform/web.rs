//! JavaScript bindings
//!
//! The page owns rendering, physics and the Web MIDI callback. It forwards
//! triggers and contacts here and applies the returned scene intents, which
//! cross the boundary as JSON.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::input::{InputBinding, TriggerEvent};
use crate::persistence::LocalStore;
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{CategoryTags, Contact, GameEvent, GamePhase};

/// LocalStorage namespace
const STORAGE_PREFIX: &str = "midibird";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger already set: {}", e).into());
    }
    log::info!("MIDI Bird starting...");
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    events: Rc<RefCell<Vec<GameEvent>>>,
}

#[wasm_bindgen]
impl WebSession {
    /// Fails when no input source label is given; the page must ask the
    /// player to pick a device again.
    #[wasm_bindgen(constructor)]
    pub fn new(input_label: String) -> Result<WebSession, JsValue> {
        let binding = InputBinding::new(input_label).map_err(to_js)?;
        let store = LocalStore::new(STORAGE_PREFIX);
        let settings = Settings::load(&store);
        let mut session = Session::new(settings, binding, Box::new(store));

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(move |event| sink.borrow_mut().push(*event));

        Ok(Self { session, events })
    }

    /// Velocity from a note-on; zero is dropped
    pub fn trigger(&self, velocity: u8) {
        if let Some(event) = TriggerEvent::from_velocity(velocity) {
            self.session.trigger_sender().send(event);
        }
    }

    /// Raw bytes of a `MIDIMessageEvent`
    pub fn midi(&self, message: &[u8]) {
        self.session.trigger_sender().send_midi(message);
    }

    /// One step. `contacts` holds begin-contacts as flat (tagsA, tagsB) pairs.
    pub fn tick(&mut self, dt: f32, contacts: Vec<u32>) -> Result<String, JsValue> {
        let contacts: Vec<Contact> = contacts
            .chunks_exact(2)
            .map(|pair| Contact::new(CategoryTags::from_bits(pair[0]), CategoryTags::from_bits(pair[1])))
            .collect();
        let intents = self.session.tick(dt, &contacts);
        serde_json::to_string(&intents).map_err(to_js)
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<String, JsValue> {
        let intents = self.session.resize(width, height);
        serde_json::to_string(&intents).map_err(to_js)
    }

    /// Events since the last call, as a JSON array
    pub fn take_events(&self) -> Result<String, JsValue> {
        let events = std::mem::take(&mut *self.events.borrow_mut());
        serde_json::to_string(&events).map_err(to_js)
    }

    pub fn phase(&self) -> String {
        match self.session.phase() {
            GamePhase::Ready => "ready",
            GamePhase::Started { .. } => "started",
            GamePhase::GameOver => "game_over",
        }
        .to_string()
    }

    pub fn score(&self) -> u32 {
        self.session.score()
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    pub fn highest_score(&self) -> u32 {
        self.session.records().highest_score
    }

    pub fn highest_level(&self) -> u32 {
        self.session.records().highest_level
    }

    pub fn input_label(&self) -> String {
        self.session.input_label().to_string()
    }
}
