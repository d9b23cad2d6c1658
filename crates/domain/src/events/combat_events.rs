//! Combat-related outcomes
//!
//! Returned by hit resolution so callers can decide how to present them.

use std::time::Duration;

use super::LevelChange;

/// Outcome of a single hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitOutcome {
    /// Non-damageable training target absorbed the hit
    Trained {
        hits_taken: u64,
        level_change: LevelChange,
    },
    /// Damageable target lost health and survived
    Damaged {
        remaining_health: u32,
        level_change: LevelChange,
    },
    /// Damageable target was emptied and removed from the world
    Destroyed {
        level_change: LevelChange,
        respawn_in: Duration,
    },
    /// Target has no hit affordance
    Unsupported,
}

impl HitOutcome {
    pub fn level_change(&self) -> Option<&LevelChange> {
        match self {
            Self::Trained { level_change, .. }
            | Self::Damaged { level_change, .. }
            | Self::Destroyed { level_change, .. } => Some(level_change),
            Self::Unsupported => None,
        }
    }
}
