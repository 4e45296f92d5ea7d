//! Resolution-independent fractions
//!
//! Obstacle geometry is expressed as fractions of the playfield height so the
//! same obstacle lays out correctly at any viewport size.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A fraction, conceptually in [0, 1]
///
/// Values outside the unit range are allowed (interpolation overshoot and the
/// like); callers clamp when they need a strict fraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(f32);

impl Percentage {
    pub const ZERO: Self = Self(0.0);
    pub const ONE: Self = Self(1.0);

    /// Build from a fraction (0.25 = 25%)
    pub const fn new(fraction: f32) -> Self {
        Self(fraction)
    }

    /// Build from a percent value (25.0 = 25%)
    pub const fn from_percent(percent: f32) -> Self {
        Self(percent / 100.0)
    }

    #[inline]
    pub fn fraction(self) -> f32 {
        self.0
    }

    #[inline]
    pub fn percent(self) -> f32 {
        self.0 * 100.0
    }

    /// Clamp into [0, 1]
    pub fn clamped(self) -> Self {
        Self(self.0.clamp(0.0, 1.0))
    }

    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    /// Linear interpolation toward `other` (t = 0 gives self, t = 1 gives other)
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self(self.0 + (other.0 - self.0) * t)
    }

    /// Apply the fraction to a length
    #[inline]
    pub fn of(self, length: f32) -> f32 {
        self.0 * length
    }

    /// Uniform sample between the range bounds, inclusive
    pub fn random<R: Rng>(rng: &mut R, range: &PercentRange) -> Self {
        let (lo, hi) = range.ordered();
        if lo.0 == hi.0 {
            return lo;
        }
        Self(rng.random_range(lo.0..=hi.0))
    }
}

impl Add for Percentage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Percentage {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f32> for Percentage {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self(self.0 * rhs)
    }
}

/// Fraction product: 50% of 50% is 25%
impl Mul for Percentage {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.percent())
    }
}

/// Closed range of percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentRange {
    pub min: Percentage,
    pub max: Percentage,
}

impl PercentRange {
    pub const fn new(min: Percentage, max: Percentage) -> Self {
        Self { min, max }
    }

    /// Shorthand for building from raw fractions
    pub const fn fractions(min: f32, max: f32) -> Self {
        Self::new(Percentage::new(min), Percentage::new(max))
    }

    /// Both bounds finite and in order
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Bounds as (low, high) regardless of stored order
    pub fn ordered(&self) -> (Percentage, Percentage) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        }
    }

    pub fn contains(&self, value: Percentage) -> bool {
        let (lo, hi) = self.ordered();
        value >= lo && value <= hi
    }

    pub fn span(&self) -> Percentage {
        let (lo, hi) = self.ordered();
        hi - lo
    }

    pub fn midpoint(&self) -> Percentage {
        let (lo, hi) = self.ordered();
        lo.lerp(hi, 0.5)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Percentage {
        Percentage::random(rng, self)
    }
}
