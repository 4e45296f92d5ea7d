//! Contact classification
//!
//! Every collidable body carries category tags. A contact is judged on the
//! union of both bodies' tags, never on which bodies touched, so a physics
//! host only has to forward the two tag sets it already has.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

/// Category bit mask of a body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTags(u32);

impl CategoryTags {
    pub const NONE: Self = Self(0);
    /// The player's avatar
    pub const AVATAR: Self = Self(1 << 0);
    /// Gap between an obstacle's bodies
    pub const SUCCESS: Self = Self(1 << 1);
    /// Obstacle bodies and the playfield floor/ceiling
    pub const BLOCKING: Self = Self(1 << 2);

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl BitOr for CategoryTags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// One begin-contact reported by the physics host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: CategoryTags,
    pub b: CategoryTags,
}

impl Contact {
    pub fn new(a: CategoryTags, b: CategoryTags) -> Self {
        Self { a, b }
    }

    /// Avatar touching a body with the given tags
    pub fn with_avatar(other: CategoryTags) -> Self {
        Self::new(CategoryTags::AVATAR, other)
    }

    pub fn tags(&self) -> CategoryTags {
        self.a | self.b
    }
}

/// What a contact means for the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Avatar cleared an obstacle
    Pass,
    /// Avatar hit something solid
    Collide,
    /// Nothing the game cares about
    Ignore,
}

/// Classify a contact by its tag union. Blocking wins over success.
pub fn classify(contact: &Contact) -> ContactOutcome {
    let tags = contact.tags();
    if tags.contains(CategoryTags::BLOCKING) {
        ContactOutcome::Collide
    } else if tags.contains(CategoryTags::SUCCESS) {
        ContactOutcome::Pass
    } else {
        ContactOutcome::Ignore
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_tags() {
        assert_eq!(
            classify(&Contact::with_avatar(CategoryTags::SUCCESS)),
            ContactOutcome::Pass
        );
        assert_eq!(
            classify(&Contact::with_avatar(CategoryTags::BLOCKING)),
            ContactOutcome::Collide
        );
        assert_eq!(
            classify(&Contact::new(CategoryTags::AVATAR, CategoryTags::NONE)),
            ContactOutcome::Ignore
        );
    }

    #[test]
    fn test_blocking_wins_over_success() {
        let both = CategoryTags::SUCCESS | CategoryTags::BLOCKING;
        assert_eq!(classify(&Contact::with_avatar(both)), ContactOutcome::Collide);
        // Tags split across both sides of the contact
        let split = Contact::new(CategoryTags::SUCCESS, CategoryTags::BLOCKING);
        assert_eq!(classify(&split), ContactOutcome::Collide);
    }

    #[test]
    fn test_contains() {
        let tags = CategoryTags::AVATAR | CategoryTags::SUCCESS;
        assert!(tags.contains(CategoryTags::SUCCESS));
        assert!(!tags.contains(CategoryTags::BLOCKING));
        assert!(!tags.contains(CategoryTags::NONE));
        assert_eq!(CategoryTags::from_bits(tags.bits()), tags);
    }
}
