//! Entity mutation outcomes
//!
//! These enums communicate what happened when entity state was modified,
//! allowing callers to react appropriately.

use crate::value_objects::Level;

/// Outcome of applying damage to an entity with a health pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Entity took damage but still has health left
    Wounded { damage_dealt: u32, remaining: u32 },
    /// This damage emptied the pool
    Depleted { damage_dealt: u32 },
    /// Entity has no health pool
    NoHealthPool,
}

impl DamageOutcome {
    pub fn is_depleted(&self) -> bool {
        matches!(self, Self::Depleted { .. })
    }
}

/// Outcome of healing an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealOutcome {
    /// Healing applied
    Healed { amount_healed: u32, new_health: u32 },
    /// Already at max health
    AlreadyFull,
    /// Entity has no health pool
    NoHealthPool,
}

/// Result of an experience award
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    /// Level did not move
    Unchanged { level: Level },
    /// One level-up step was applied, based on the final level reached
    LeveledUp {
        from: Level,
        to: Level,
        max_health: u32,
        max_health_delta: u32,
    },
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        matches!(self, Self::LeveledUp { .. })
    }

    pub fn level(&self) -> Level {
        match self {
            Self::Unchanged { level } => *level,
            Self::LeveledUp { to, .. } => *to,
        }
    }
}
