//! Playfield geometry
//!
//! The origin sits at the centre of the viewport. x grows toward the leading
//! (right) edge, y grows upward. Obstacles are laid out from their percentage
//! values, so a resize only needs a relayout.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;

/// Visible play area in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Right edge of the viewport (obstacles enter here)
    #[inline]
    pub fn leading_edge(&self) -> f32 {
        self.width / 2.0
    }

    /// Left edge of the viewport (obstacles leave here)
    #[inline]
    pub fn trailing_edge(&self) -> f32 {
        -self.width / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        -self.height / 2.0
    }

    /// Viewport widened by `margin` on both sides
    pub fn living_region(&self, margin: f32) -> LivingRegion {
        LivingRegion {
            trailing: self.trailing_edge() - margin,
            leading: self.leading_edge() + margin,
        }
    }
}

/// Horizontal band in which obstacles are kept alive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivingRegion {
    pub trailing: f32,
    pub leading: f32,
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Same rectangle shifted horizontally
    pub fn translated_x(&self, dx: f32) -> Self {
        let offset = Vec2::new(dx, 0.0);
        Self::new(self.min + offset, self.max + offset)
    }

    /// Circle overlap via the closest point on the rectangle
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        if self.is_empty() {
            return false;
        }
        let closest = center.clamp(self.min, self.max);
        (center - closest).length_squared() < radius * radius
    }
}

/// Bodies of one obstacle pair, centred at x = 0
///
/// Use `translated_x` (or `at`) to place it on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleLayout {
    /// Upper blocking body
    pub top: Rect,
    /// Lower blocking body
    pub bottom: Rect,
    /// Gap between them (the success zone)
    pub passage: Rect,
}

impl ObstacleLayout {
    pub fn new(obstacle: &Obstacle, playfield: &Playfield, width: f32) -> Self {
        let half_w = width / 2.0;
        let gap_center = playfield.bottom() + obstacle.opening_position.of(playfield.height);
        let half_gap = obstacle.opening_size.of(playfield.height) / 2.0;

        // Gaps reaching past an edge leave that body empty
        let gap_low = (gap_center - half_gap).clamp(playfield.bottom(), playfield.top());
        let gap_high = (gap_center + half_gap).clamp(playfield.bottom(), playfield.top());

        Self {
            top: Rect::new(Vec2::new(-half_w, gap_high), Vec2::new(half_w, playfield.top())),
            bottom: Rect::new(Vec2::new(-half_w, playfield.bottom()), Vec2::new(half_w, gap_low)),
            passage: Rect::new(Vec2::new(-half_w, gap_low), Vec2::new(half_w, gap_high)),
        }
    }

    /// Layout moved to screen position `x`
    pub fn at(&self, x: f32) -> Self {
        Self {
            top: self.top.translated_x(x),
            bottom: self.bottom.translated_x(x),
            passage: self.passage.translated_x(x),
        }
    }

    /// Vertical centre of the gap
    pub fn gap_center(&self) -> f32 {
        self.passage.center().y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::percentage::Percentage;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    #[test]
    fn test_living_region() {
        let region = field().living_region(50.0);
        assert_eq!(region.trailing, -450.0);
        assert_eq!(region.leading, 450.0);
    }

    #[test]
    fn test_layout_splits_playfield_height() {
        let obstacle = Obstacle {
            opening_size: Percentage::new(0.25),
            opening_position: Percentage::new(0.5),
        };
        let layout = ObstacleLayout::new(&obstacle, &field(), 20.0);
        // 150 point gap centred at y = 0
        assert_eq!(layout.passage.min.y, -75.0);
        assert_eq!(layout.passage.max.y, 75.0);
        assert_eq!(layout.bottom.min.y, -300.0);
        assert_eq!(layout.bottom.max.y, -75.0);
        assert_eq!(layout.top.min.y, 75.0);
        assert_eq!(layout.top.max.y, 300.0);
        assert_eq!(layout.top.width(), 20.0);
        assert_eq!(layout.gap_center(), 0.0);
    }

    #[test]
    fn test_layout_gap_past_edge_empties_body() {
        let obstacle = Obstacle {
            opening_size: Percentage::new(0.5),
            opening_position: Percentage::new(0.9),
        };
        let layout = ObstacleLayout::new(&obstacle, &field(), 20.0);
        assert!(layout.top.is_empty());
        assert!(!layout.bottom.is_empty());
    }

    #[test]
    fn test_circle_overlap() {
        let rect = Rect::new(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0));
        assert!(rect.overlaps_circle(Vec2::new(15.0, 0.0), 6.0));
        assert!(!rect.overlaps_circle(Vec2::new(17.0, 0.0), 6.0));
        // Corner: distance to (10, 10) is ~7.07
        assert!(!rect.overlaps_circle(Vec2::new(15.0, 15.0), 7.0));
        assert!(rect.overlaps_circle(Vec2::new(15.0, 15.0), 7.5));
        // Inside
        assert!(rect.overlaps_circle(Vec2::ZERO, 1.0));
    }

    #[test]
    fn test_layout_at() {
        let obstacle = Obstacle {
            opening_size: Percentage::new(0.25),
            opening_position: Percentage::new(0.5),
        };
        let layout = ObstacleLayout::new(&obstacle, &field(), 20.0).at(100.0);
        assert_eq!(layout.passage.min.x, 90.0);
        assert_eq!(layout.passage.max.x, 110.0);
    }
}
