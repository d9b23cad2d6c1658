//! Experience and level rules
//!
//! Level is never stored: it is always derived from accumulated experience.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Experience required per level tier.
pub const EXPERIENCE_PER_LEVEL: u64 = 100;

/// Max health at level 1.
pub const BASE_MAX_HEALTH: u32 = 100;

/// Max health gained per level above 1.
pub const MAX_HEALTH_PER_LEVEL: u32 = 10;

/// Accumulated experience. Only grows, except through an explicit reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Experience(u64);

impl Experience {
    pub const ZERO: Self = Self(0);

    pub fn new(points: u64) -> Self {
        Self(points)
    }

    #[inline]
    pub fn points(self) -> u64 {
        self.0
    }

    /// Experience after adding `amount`. Saturates rather than wrapping.
    pub fn plus(self, amount: u64) -> Self {
        Self(self.0.saturating_add(amount))
    }

    /// `max(1, experience / 100 + 1)`
    ///
    /// ```
    /// use emberhold_domain::value_objects::{Experience, Level};
    ///
    /// assert_eq!(Experience::new(0).level(), Level::new(1));
    /// assert_eq!(Experience::new(99).level(), Level::new(1));
    /// assert_eq!(Experience::new(100).level(), Level::new(2));
    /// assert_eq!(Experience::new(205).level(), Level::new(3));
    /// ```
    pub fn level(self) -> Level {
        let tier = self.0 / EXPERIENCE_PER_LEVEL + 1;
        Level(u32::try_from(tier).unwrap_or(u32::MAX).max(1))
    }

    /// Experience still needed to reach the next level.
    pub fn to_next_level(self) -> u64 {
        let next_threshold = u64::from(self.level().get()) * EXPERIENCE_PER_LEVEL;
        next_threshold.saturating_sub(self.0)
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A derived progression tier (always >= 1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Level(u32);

impl Level {
    pub fn new(level: u32) -> Self {
        Self(level.max(1))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// `100 + (level - 1) * 10`
    pub fn max_health(self) -> u32 {
        BASE_MAX_HEALTH.saturating_add(self.0.saturating_sub(1).saturating_mul(MAX_HEALTH_PER_LEVEL))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
