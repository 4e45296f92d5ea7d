//! Scrolling window of live obstacles
//!
//! Obstacles never move individually. Each one keeps a fixed offset along the
//! stream, and the stream scrolls as a whole:
//!
//! `screen_x = origin + offset - scroll`
//!
//! Offsets are whole multiples of the spacing, so consecutive obstacles are
//! always exactly one spacing apart no matter how the scroll accumulates.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::geometry::LivingRegion;
use super::obstacle::Obstacle;

/// An obstacle currently in the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LiveObstacle {
    pub id: u32,
    pub obstacle: Obstacle,
    /// Distance from the first obstacle of the stream
    pub offset: f32,
}

/// Ordered live obstacles, newest (rightmost) at the front
#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    live: VecDeque<LiveObstacle>,
    /// Scroll position at which the first obstacle sat on screen at x = 0
    origin: f32,
    /// Total distance scrolled since the stream was last cleared
    scroll: f32,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &LiveObstacle> {
        self.live.iter()
    }

    /// Most recently spawned obstacle
    pub fn rightmost(&self) -> Option<&LiveObstacle> {
        self.live.front()
    }

    /// Oldest obstacle, next to be despawned
    pub fn leftmost(&self) -> Option<&LiveObstacle> {
        self.live.back()
    }

    pub fn get(&self, id: u32) -> Option<&LiveObstacle> {
        self.live.iter().find(|o| o.id == id)
    }

    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    /// Current screen x of an obstacle's centre
    #[inline]
    pub fn x_of(&self, obstacle: &LiveObstacle) -> f32 {
        self.origin + obstacle.offset - self.scroll
    }

    /// Scroll every obstacle left by `distance`
    pub fn advance(&mut self, distance: f32) {
        self.scroll += distance;
    }

    /// True while the stream is empty or its rightmost obstacle has not yet
    /// passed the leading edge of the living region
    pub fn needs_spawn(&self, region: &LivingRegion) -> bool {
        match self.rightmost() {
            None => true,
            Some(front) => self.x_of(front) <= region.leading,
        }
    }

    /// Append a new rightmost obstacle
    ///
    /// The first obstacle lands at `first_x`; every later one lands one
    /// `spacing` ahead of the current rightmost.
    pub fn spawn(&mut self, id: u32, obstacle: Obstacle, first_x: f32, spacing: f32) -> LiveObstacle {
        let offset = match self.rightmost().map(|front| front.offset + spacing) {
            Some(offset) => offset,
            None => {
                self.origin = first_x + self.scroll;
                0.0
            }
        };
        let live = LiveObstacle { id, obstacle, offset };
        self.live.push_front(live);
        live
    }

    /// Remove obstacles whose centre is behind the trailing edge of the living region
    pub fn despawn_behind(&mut self, region: &LivingRegion) -> Vec<LiveObstacle> {
        let mut removed = Vec::new();
        while let Some(back) = self.leftmost() {
            if self.x_of(back) >= region.trailing {
                break;
            }
            if let Some(back) = self.live.pop_back() {
                removed.push(back);
            }
        }
        removed
    }

    /// Drop everything and rewind the scroll
    pub fn clear(&mut self) -> Vec<LiveObstacle> {
        self.origin = 0.0;
        self.scroll = 0.0;
        self.live.drain(..).collect()
    }
}
