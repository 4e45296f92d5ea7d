//! Reference contact detection
//!
//! Stands in for a physics host: tests the avatar circle against every live
//! obstacle layout and the playfield boundaries, and reports begin-contacts
//! only. A body that stays overlapped is reported once, on the tick it was
//! first touched.

use std::collections::BTreeSet;

use super::contact::{CategoryTags, Contact};
use super::state::GameState;

/// Which part of an obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObstaclePart {
    Top,
    Passage,
    Bottom,
}

impl ObstaclePart {
    pub fn tags(self) -> CategoryTags {
        match self {
            ObstaclePart::Passage => CategoryTags::SUCCESS,
            ObstaclePart::Top | ObstaclePart::Bottom => CategoryTags::BLOCKING,
        }
    }
}

/// A body the avatar can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Body {
    Obstacle { id: u32, part: ObstaclePart },
    Floor,
    Ceiling,
}

impl Body {
    pub fn tags(self) -> CategoryTags {
        match self {
            Body::Obstacle { part, .. } => part.tags(),
            Body::Floor | Body::Ceiling => CategoryTags::BLOCKING,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContactProbe {
    touching: BTreeSet<Body>,
}

impl ContactProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bodies overlapped as of the last `detect`
    pub fn touching(&self) -> impl Iterator<Item = &Body> {
        self.touching.iter()
    }

    /// Begin-contacts since the previous call, in body order
    pub fn detect(&mut self, state: &GameState) -> Vec<Contact> {
        if !state.phase.is_started() {
            self.touching.clear();
            return Vec::new();
        }

        let now = overlapping(state);
        let contacts = now
            .difference(&self.touching)
            .map(|body| Contact::with_avatar(body.tags()))
            .collect();
        self.touching = now;
        contacts
    }
}

fn overlapping(state: &GameState) -> BTreeSet<Body> {
    let avatar = &state.avatar;
    let mut bodies = BTreeSet::new();

    if avatar.pos.y - avatar.radius <= state.playfield.bottom() {
        bodies.insert(Body::Floor);
    }
    if avatar.pos.y + avatar.radius >= state.playfield.top() {
        bodies.insert(Body::Ceiling);
    }

    for live in state.stream.iter() {
        let layout = state.layout_of(live);
        let parts = [
            (ObstaclePart::Top, layout.top),
            (ObstaclePart::Passage, layout.passage),
            (ObstaclePart::Bottom, layout.bottom),
        ];
        for (part, rect) in parts {
            if rect.overlaps_circle(avatar.pos, avatar.radius) {
                bodies.insert(Body::Obstacle { id: live.id, part });
            }
        }
    }
    bodies
}
