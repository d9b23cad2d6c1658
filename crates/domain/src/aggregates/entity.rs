//! Entity aggregate - every addressable object in the game world
//!
//! # Location is not stored here
//!
//! Where an entity sits is a relation owned by the engine's entity store
//! (`id -> container id`). The aggregate never holds a reference to another
//! entity except as an opaque `EntityId` (e.g. a respawn point).
//!
//! # Capabilities
//!
//! What an entity can do or have done to it is decided by its closed
//! `EntityProfile` variant, not probed at runtime:
//!
//! | kind               | health | hit affordance | enterable | progresses |
//! |--------------------|--------|----------------|-----------|------------|
//! | Character          | yes    | none           | no        | yes        |
//! | TrainingDummy      | no     | training       | no        | no         |
//! | DestructibleDummy  | yes    | damageable     | no        | no         |
//! | Pit                | no     | none           | yes       | no         |
//! | Other (rooms, ...) | no     | none           | no        | no         |

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::events::{DamageOutcome, HealOutcome, LevelChange};
use crate::value_objects::{EntityName, Experience, Health, Level};
use crate::EntityId;

/// Default seconds before a destroyed destructible object reappears.
pub const DEFAULT_RESPAWN_DELAY_SECS: u64 = 60;

/// Longest respawn delay an object may carry (one day). Longer values are
/// clamped.
pub const MAX_RESPAWN_DELAY_SECS: u64 = 86_400;

/// Variant tag for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Character,
    TrainingDummy,
    DestructibleDummy,
    Pit,
    Other,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::TrainingDummy => write!(f, "training dummy"),
            Self::DestructibleDummy => write!(f, "destructible dummy"),
            Self::Pit => write!(f, "pit"),
            Self::Other => write!(f, "object"),
        }
    }
}

/// How an entity responds to being hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitAffordance {
    /// Absorbs hits without damage; counts them.
    Training,
    /// Loses one health per hit and is destroyed when empty.
    Damageable,
    /// Cannot be hit.
    None,
}

/// Kind-specific state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EntityProfile {
    #[serde(rename_all = "camelCase")]
    Character {
        experience: Experience,
        respawn_point: Option<EntityId>,
    },
    #[serde(rename_all = "camelCase")]
    TrainingDummy { hits_taken: u64 },
    #[serde(rename_all = "camelCase")]
    DestructibleDummy {
        hits_given: u64,
        respawn_point: Option<EntityId>,
        respawn_delay_secs: u64,
    },
    #[serde(rename_all = "camelCase")]
    Pit { victims: u64 },
    Other,
}

impl EntityProfile {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Character { .. } => EntityKind::Character,
            Self::TrainingDummy { .. } => EntityKind::TrainingDummy,
            Self::DestructibleDummy { .. } => EntityKind::DestructibleDummy,
            Self::Pit { .. } => EntityKind::Pit,
            Self::Other => EntityKind::Other,
        }
    }
}

/// A game entity.
///
/// # Invariants
///
/// - Characters and destructible dummies always carry a `Health` pool;
///   other kinds never do
/// - `0 <= health <= max_health` (enforced by `Health`)
/// - Experience only grows; level is derived from it
/// - Counters only grow
///
/// # Example
///
/// ```
/// use emberhold_domain::aggregates::Entity;
/// use emberhold_domain::value_objects::EntityName;
///
/// let hero = Entity::character(EntityName::new("Mira").unwrap());
/// assert_eq!(hero.level().map(|l| l.get()), Some(1));
/// assert_eq!(hero.health().map(|h| h.current()), Some(100));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    id: EntityId,
    name: EntityName,
    profile: EntityProfile,
    health: Option<Health>,
}

impl Entity {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// A fresh level 1 character at full health.
    pub fn character(name: EntityName) -> Self {
        Self {
            id: EntityId::new(),
            name,
            profile: EntityProfile::Character {
                experience: Experience::ZERO,
                respawn_point: None,
            },
            health: Some(Health::full(Level::new(1).max_health())),
        }
    }

    /// A training dummy that can be hit forever.
    pub fn training_dummy(name: EntityName) -> Self {
        Self {
            id: EntityId::new(),
            name,
            profile: EntityProfile::TrainingDummy { hits_taken: 0 },
            health: None,
        }
    }

    /// A dummy with its own health pool that breaks and later reappears.
    pub fn destructible_dummy(name: EntityName, max_health: u32, respawn_delay: Duration) -> Self {
        Self {
            id: EntityId::new(),
            name,
            profile: EntityProfile::DestructibleDummy {
                hits_given: 0,
                respawn_point: None,
                respawn_delay_secs: respawn_delay.as_secs().min(MAX_RESPAWN_DELAY_SECS),
            },
            health: Some(Health::full(max_health.max(1))),
        }
    }

    /// A pit that kills whoever jumps in.
    pub fn pit(name: EntityName) -> Self {
        Self {
            id: EntityId::new(),
            name,
            profile: EntityProfile::Pit { victims: 0 },
            health: None,
        }
    }

    /// Anything else, most commonly a room.
    pub fn other(name: EntityName) -> Self {
        Self {
            id: EntityId::new(),
            name,
            profile: EntityProfile::Other,
            health: None,
        }
    }

    /// Rebuild an entity from stored parts.
    ///
    /// Kinds that need a health pool but arrive without one get a full pool
    /// (for characters, sized to their level); kinds that never have one
    /// drop whatever was supplied.
    pub fn from_parts(
        id: EntityId,
        name: EntityName,
        mut profile: EntityProfile,
        health: Option<Health>,
    ) -> Self {
        if let EntityProfile::DestructibleDummy {
            respawn_delay_secs, ..
        } = &mut profile
        {
            *respawn_delay_secs = (*respawn_delay_secs).min(MAX_RESPAWN_DELAY_SECS);
        }
        let health = match &profile {
            EntityProfile::Character { experience, .. } => {
                Some(health.unwrap_or_else(|| Health::full(experience.level().max_health())))
            }
            EntityProfile::DestructibleDummy { .. } => {
                Some(health.unwrap_or_else(|| Health::full(Level::new(1).max_health())))
            }
            _ => None,
        };
        Self {
            id,
            name,
            profile,
            health,
        }
    }

    /// Set the entity's ID (used when loading from storage).
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    /// Set the respawn point at construction time.
    pub fn with_respawn_point(mut self, point: EntityId) -> Self {
        // Kinds without a respawn point ignore it.
        let _ = self.set_respawn_point(point);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &EntityName {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.profile.kind()
    }

    #[inline]
    pub fn profile(&self) -> &EntityProfile {
        &self.profile
    }

    #[inline]
    pub fn health(&self) -> Option<&Health> {
        self.health.as_ref()
    }

    #[inline]
    pub fn is_character(&self) -> bool {
        matches!(self.profile, EntityProfile::Character { .. })
    }

    pub fn experience(&self) -> Option<Experience> {
        match self.profile {
            EntityProfile::Character { experience, .. } => Some(experience),
            _ => None,
        }
    }

    /// Derived from experience; `None` for kinds that don't progress.
    pub fn level(&self) -> Option<Level> {
        self.experience().map(Experience::level)
    }

    pub fn respawn_point(&self) -> Option<EntityId> {
        match self.profile {
            EntityProfile::Character { respawn_point, .. }
            | EntityProfile::DestructibleDummy { respawn_point, .. } => respawn_point,
            _ => None,
        }
    }

    /// Only destructible objects have a respawn delay.
    pub fn respawn_delay(&self) -> Option<Duration> {
        match self.profile {
            EntityProfile::DestructibleDummy {
                respawn_delay_secs, ..
            } => Some(Duration::from_secs(
                respawn_delay_secs.min(MAX_RESPAWN_DELAY_SECS),
            )),
            _ => None,
        }
    }

    pub fn hit_affordance(&self) -> HitAffordance {
        match self.profile {
            EntityProfile::TrainingDummy { .. } => HitAffordance::Training,
            EntityProfile::DestructibleDummy { .. } => HitAffordance::Damageable,
            _ => HitAffordance::None,
        }
    }

    #[inline]
    pub fn is_enterable(&self) -> bool {
        matches!(self.profile, EntityProfile::Pit { .. })
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Remove health, saturating at zero.
    pub fn take_damage(&mut self, amount: u32) -> DamageOutcome {
        let Some(health) = self.health.as_mut() else {
            return DamageOutcome::NoHealthPool;
        };
        let damage_dealt = health.take(amount);
        if health.is_depleted() {
            DamageOutcome::Depleted { damage_dealt }
        } else {
            DamageOutcome::Wounded {
                damage_dealt,
                remaining: health.current(),
            }
        }
    }

    /// Drop health straight to zero. No-op for entities without a pool.
    pub fn deplete_health(&mut self) {
        if let Some(health) = self.health.as_mut() {
            health.deplete();
        }
    }

    /// Restore health, capped at the maximum.
    ///
    /// ```
    /// use emberhold_domain::aggregates::Entity;
    /// use emberhold_domain::events::HealOutcome;
    /// use emberhold_domain::value_objects::EntityName;
    ///
    /// let mut hero = Entity::character(EntityName::new("Mira").unwrap());
    /// hero.take_damage(40);
    /// assert_eq!(
    ///     hero.heal(1000),
    ///     HealOutcome::Healed { amount_healed: 40, new_health: 100 }
    /// );
    /// ```
    pub fn heal(&mut self, amount: u32) -> HealOutcome {
        let Some(health) = self.health.as_mut() else {
            return HealOutcome::NoHealthPool;
        };
        if health.is_full() {
            return HealOutcome::AlreadyFull;
        }
        let amount_healed = health.heal(amount);
        HealOutcome::Healed {
            amount_healed,
            new_health: health.current(),
        }
    }

    /// Refill to max; returns what was restored (0 without a pool).
    pub fn restore_health(&mut self) -> u32 {
        self.health.as_mut().map_or(0, Health::restore)
    }

    // =========================================================================
    // Progression
    // =========================================================================

    /// Add experience and apply at most one level-up step.
    ///
    /// The level-up is computed from the final experience: crossing two
    /// thresholds in one award lands on the higher level once, with max
    /// health set for that level and a full heal.
    ///
    /// # Errors
    ///
    /// - `Validation` if `amount` is zero
    /// - `InvalidStateTransition` if the entity is not a character
    pub fn gain_experience(&mut self, amount: u64) -> Result<LevelChange, DomainError> {
        if amount == 0 {
            return Err(DomainError::validation("Experience award must be positive"));
        }
        let EntityProfile::Character { experience, .. } = &mut self.profile else {
            return Err(DomainError::invalid_state_transition(format!(
                "{} cannot gain experience",
                self.name
            )));
        };

        let old_level = experience.level();
        *experience = experience.plus(amount);
        let new_level = experience.level();

        if new_level <= old_level {
            return Ok(LevelChange::Unchanged { level: new_level });
        }

        let max_health = new_level.max_health();
        let health = self
            .health
            .get_or_insert_with(|| Health::full(old_level.max_health()));
        let max_health_delta = max_health.saturating_sub(health.max());
        health.reset_max(max_health);

        Ok(LevelChange::LeveledUp {
            from: old_level,
            to: new_level,
            max_health,
            max_health_delta,
        })
    }

    // =========================================================================
    // Respawn configuration
    // =========================================================================

    /// # Errors
    ///
    /// `InvalidStateTransition` for kinds that never respawn.
    pub fn set_respawn_point(&mut self, point: EntityId) -> Result<(), DomainError> {
        match &mut self.profile {
            EntityProfile::Character { respawn_point, .. }
            | EntityProfile::DestructibleDummy { respawn_point, .. } => {
                *respawn_point = Some(point);
                Ok(())
            }
            _ => Err(DomainError::invalid_state_transition(format!(
                "{} has no respawn point",
                self.name
            ))),
        }
    }

    // =========================================================================
    // Counters (display only)
    // =========================================================================

    /// Returns the new total, or `None` if this is not a training dummy.
    pub fn record_hit_taken(&mut self) -> Option<u64> {
        match &mut self.profile {
            EntityProfile::TrainingDummy { hits_taken } => {
                *hits_taken = hits_taken.saturating_add(1);
                Some(*hits_taken)
            }
            _ => None,
        }
    }

    /// Returns the new total, or `None` if this is not a destructible dummy.
    pub fn record_hit_given(&mut self) -> Option<u64> {
        match &mut self.profile {
            EntityProfile::DestructibleDummy { hits_given, .. } => {
                *hits_given = hits_given.saturating_add(1);
                Some(*hits_given)
            }
            _ => None,
        }
    }

    /// Returns the new total, or `None` if this is not a pit.
    pub fn record_victim(&mut self) -> Option<u64> {
        match &mut self.profile {
            EntityProfile::Pit { victims } => {
                *victims = victims.saturating_add(1);
                Some(*victims)
            }
            _ => None,
        }
    }

    /// The kind's display counter, if it has one.
    pub fn counter(&self) -> Option<u64> {
        match self.profile {
            EntityProfile::TrainingDummy { hits_taken } => Some(hits_taken),
            EntityProfile::DestructibleDummy { hits_given, .. } => Some(hits_given),
            EntityProfile::Pit { victims } => Some(victims),
            _ => None,
        }
    }
}
