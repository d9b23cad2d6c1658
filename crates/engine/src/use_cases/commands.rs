//! Inbound command surface.
//!
//! Each command resolves its target, checks every precondition and only
//! then mutates, so a command that fails leaves the world exactly as it
//! found it.

use std::sync::Arc;

use emberhold_domain::{
    DeathCause, Entity, EntityId, Experience, GameEvent, HealOutcome, Health, HitOutcome, Level,
};
use emberhold_shared::{ErrorKind, ObjectView, StatsView};

use super::combat::{CombatError, CombatResolver};
use super::lifecycle::{CharacterRespawn, LifecycleError};
use super::progression::ProgressionError;
use crate::infrastructure::ports::{TargetResolver, TargetSpec};
use crate::stores::EntityStore;
use crate::world::World;

/// Every Nth pit victim is announced as a milestone.
pub const PIT_MILESTONE: u64 = 5;

/// Why a well-formed command could not go ahead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Precondition {
    #[error("That isn't here.")]
    TargetNotColocated,
    #[error("You can't hit {0}.")]
    TargetNotHittable(String),
    #[error("You can't jump into {0}.")]
    TargetNotJumpable(String),
    #[error("That has already been destroyed.")]
    AlreadyDestroyed,
    #[error("Only characters can do that.")]
    NotACharacter,
    #[error("You aren't anywhere.")]
    NotPlaced,
    #[error("There is nowhere to respawn.")]
    NoRespawnLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Precondition(#[from] Precondition),
    #[error("The world is not accepting commands right now.")]
    Unavailable,
}

impl CommandError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::Unavailable => ErrorKind::Unavailable,
        }
    }
}

impl From<CombatError> for CommandError {
    fn from(e: CombatError) -> Self {
        match e {
            CombatError::NotFound(_) => Self::not_found("You don't see that here."),
            CombatError::TargetNotColocated => Precondition::TargetNotColocated.into(),
            CombatError::TargetNotHittable => {
                Precondition::TargetNotHittable("yourself".into()).into()
            }
            CombatError::Progression(e) => e.into(),
            CombatError::Lifecycle(e) => e.into(),
        }
    }
}

impl From<ProgressionError> for CommandError {
    fn from(e: ProgressionError) -> Self {
        match e {
            ProgressionError::NotFound(_) => Self::not_found("Your character could not be found."),
            ProgressionError::NotACharacter(_) => Precondition::NotACharacter.into(),
            ProgressionError::InvalidAmount => Self::validation(e.to_string()),
        }
    }
}

impl From<LifecycleError> for CommandError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::NotFound(_) | LifecycleError::Store(_) => {
                Self::not_found("That no longer exists.")
            }
            LifecycleError::NotACharacter(_) => Precondition::NotACharacter.into(),
            LifecycleError::NotDestructible(_) => {
                Precondition::TargetNotHittable("that".into()).into()
            }
            LifecycleError::AlreadyDestroyed(_) => Precondition::AlreadyDestroyed.into(),
            LifecycleError::NoRespawnLocation(_) => Precondition::NoRespawnLocation.into(),
        }
    }
}

/// Result of `hit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitReport {
    pub target: EntityId,
    pub outcome: HitOutcome,
    pub experience: Experience,
    pub level: Level,
    pub target_health: Option<u32>,
}

impl HitReport {
    pub fn destroyed(&self) -> bool {
        matches!(self.outcome, HitOutcome::Destroyed { .. })
    }

    pub fn leveled_up(&self) -> bool {
        self.outcome
            .level_change()
            .is_some_and(|change| change.leveled_up())
    }
}

/// Result of `heal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealReport {
    pub outcome: HealOutcome,
    pub health: Health,
}

pub struct GameCommands {
    combat: CombatResolver,
    resolver: Arc<dyn TargetResolver>,
}

impl GameCommands {
    pub fn new(combat: CombatResolver, resolver: Arc<dyn TargetResolver>) -> Self {
        Self { combat, resolver }
    }

    // =========================================================================
    // Combat
    // =========================================================================

    /// `hit <target>`
    pub fn hit(
        &self,
        world: &mut World,
        actor: EntityId,
        target: &str,
    ) -> Result<HitReport, CommandError> {
        require_character(world.store(), actor)?;
        let target_id = self.resolve(world.store(), actor, target, "Hit what?")?;

        let (store, lifecycle, outbox) = world.parts();
        let outcome = self
            .combat
            .apply_hit(store, lifecycle, outbox, actor, target_id)?;
        if outcome == HitOutcome::Unsupported {
            let name = display_name(store, target_id);
            return Err(Precondition::TargetNotHittable(name).into());
        }

        let attacker = require_character(store, actor)?;
        let experience = attacker.experience().unwrap_or_default();
        let target_health = store
            .get(target_id)
            .and_then(Entity::health)
            .map(Health::current);
        Ok(HitReport {
            target: target_id,
            outcome,
            experience,
            level: experience.level(),
            target_health,
        })
    }

    /// `jump [in] <target>`
    ///
    /// Only pits can be jumped into. The jumper dies and respawns in the
    /// same step.
    pub fn jump_into(
        &self,
        world: &mut World,
        actor: EntityId,
        target: &str,
    ) -> Result<CharacterRespawn, CommandError> {
        require_character(world.store(), actor)?;
        let pit_id = self.resolve(world.store(), actor, target, "Jump where?")?;
        let store = world.store();
        let pit = store
            .get(pit_id)
            .ok_or_else(|| CommandError::not_found("You don't see that here."))?;
        if !pit.is_enterable() {
            return Err(Precondition::TargetNotJumpable(pit.name().to_string()).into());
        }
        if !store.colocated(actor, pit_id) {
            return Err(Precondition::TargetNotColocated.into());
        }

        let (store, lifecycle, outbox) = world.parts();
        let pit = store
            .get_mut(pit_id)
            .ok_or_else(|| CommandError::not_found("You don't see that here."))?;
        let victims = pit.record_victim().unwrap_or_default();
        let pit_name = pit.name().to_string();
        outbox.touch(pit_id);

        if let Some(jumper) = store.get_mut(actor) {
            jumper.deplete_health();
        }
        tracing::info!(entity_id = %actor, pit_id = %pit_id, victims, "Character jumped into a pit");

        let cause = DeathCause::Pit {
            pit: pit_id,
            pit_name,
            victims,
            milestone: victims % PIT_MILESTONE == 0,
        };
        Ok(lifecycle.on_character_death(store, outbox, actor, cause)?)
    }

    /// `kill` - lethal self-inflicted damage.
    pub fn kill(&self, world: &mut World, actor: EntityId) -> Result<CharacterRespawn, CommandError> {
        let current = require_character(world.store(), actor)?
            .health()
            .map_or(0, Health::current);

        let (store, lifecycle, outbox) = world.parts();
        let outcome = self.combat.apply_damage(
            store,
            lifecycle,
            outbox,
            actor,
            current.max(1),
            DeathCause::SelfInflicted,
        )?;
        if !outcome.is_depleted() {
            return Err(Precondition::NotACharacter.into());
        }

        let health = store
            .get(actor)
            .and_then(Entity::health)
            .map_or(0, Health::current);
        Ok(CharacterRespawn {
            location: store.location_of(actor),
            health,
        })
    }

    // =========================================================================
    // Self-care
    // =========================================================================

    /// `setrespawn` - respawn where you stand.
    pub fn set_respawn(&self, world: &mut World, actor: EntityId) -> Result<EntityId, CommandError> {
        require_character(world.store(), actor)?;
        let here = world
            .store()
            .location_of(actor)
            .ok_or(Precondition::NotPlaced)?;

        let (store, lifecycle, outbox) = world.parts();
        lifecycle.set_respawn_point(store, outbox, actor, here)?;
        Ok(here)
    }

    /// `heal [amount]`
    ///
    /// Without an amount, heals to full. With one, it must be a positive
    /// whole number; healing is capped at max health either way.
    pub fn heal(
        &self,
        world: &mut World,
        actor: EntityId,
        amount: Option<&str>,
    ) -> Result<HealReport, CommandError> {
        require_character(world.store(), actor)?;
        let amount = match amount.map(str::trim).filter(|raw| !raw.is_empty()) {
            None => u32::MAX,
            Some(raw) => parse_heal_amount(raw)?,
        };

        let (store, _, outbox) = world.parts();
        let character = store
            .get_mut(actor)
            .ok_or_else(|| CommandError::not_found("Your character could not be found."))?;
        let outcome = character.heal(amount);
        let health = character
            .health()
            .copied()
            .ok_or(Precondition::NotACharacter)?;

        if let HealOutcome::Healed { amount_healed, .. } = outcome {
            tracing::debug!(entity_id = %actor, amount_healed, "Character healed");
            outbox.notify(
                actor,
                GameEvent::Healed {
                    character: actor,
                    amount: amount_healed,
                    health: health.current(),
                    max_health: health.max(),
                },
            );
            outbox.touch(actor);
        }
        Ok(HealReport { outcome, health })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// `stats`
    pub fn get_stats(&self, world: &World, actor: EntityId) -> Result<StatsView, CommandError> {
        let character = require_character(world.store(), actor)?;
        let experience = character.experience().unwrap_or_default();
        let health = character.health().copied().unwrap_or(Health::full(0));
        Ok(StatsView {
            id: actor.to_uuid(),
            name: character.name().to_string(),
            level: experience.level().get(),
            health: health.current(),
            max_health: health.max(),
            experience: experience.points(),
            experience_to_next_level: experience.to_next_level(),
            respawn_point: character.respawn_point().map(EntityId::to_uuid),
        })
    }

    /// `describe <target>`
    pub fn describe(
        &self,
        world: &World,
        actor: EntityId,
        target: &str,
    ) -> Result<ObjectView, CommandError> {
        if world.store().get(actor).is_none() {
            return Err(CommandError::not_found("Your character could not be found."));
        }
        let target_id = self.resolve(world.store(), actor, target, "Describe what?")?;
        let entity = world
            .store()
            .get(target_id)
            .ok_or_else(|| CommandError::not_found("You don't see that here."))?;
        Ok(ObjectView {
            id: target_id.to_uuid(),
            name: entity.name().to_string(),
            kind: entity.kind().to_string(),
            health: entity.health().map(Health::current),
            max_health: entity.health().map(Health::max),
            counter: entity.counter(),
        })
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn resolve(
        &self,
        store: &EntityStore,
        actor: EntityId,
        raw: &str,
        missing: &str,
    ) -> Result<EntityId, CommandError> {
        let spec = TargetSpec::parse(raw).ok_or_else(|| CommandError::validation(missing))?;
        self.resolver
            .resolve(store, actor, &spec)
            .ok_or_else(|| CommandError::not_found(format!("Could not find '{}'.", spec.as_str())))
    }
}

fn require_character(store: &EntityStore, actor: EntityId) -> Result<&Entity, CommandError> {
    let entity = store
        .get(actor)
        .ok_or_else(|| CommandError::not_found("Your character could not be found."))?;
    if !entity.is_character() {
        return Err(Precondition::NotACharacter.into());
    }
    Ok(entity)
}

fn display_name(store: &EntityStore, id: EntityId) -> String {
    store
        .get(id)
        .map_or_else(|| "that".to_string(), |entity| entity.name().to_string())
}

fn parse_heal_amount(raw: &str) -> Result<u32, CommandError> {
    match raw.parse::<u32>() {
        Ok(amount) if amount > 0 => Ok(amount),
        _ => Err(CommandError::validation(
            "Heal amount must be a positive number.",
        )),
    }
}
