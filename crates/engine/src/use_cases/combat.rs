//! Combat resolver.
//!
//! Applies a single hit from an attacker to a target, dispatching on the
//! target's hit affordance. Progression and destruction are delegated to
//! their own components.

use emberhold_domain::{
    DamageOutcome, DeathCause, EntityId, GameEvent, HitAffordance, HitOutcome,
};

use super::lifecycle::{LifecycleError, LifecycleManager};
use super::progression::{ProgressionEngine, ProgressionError};
use crate::stores::{EntityStore, Outbox};

/// Damage dealt by one hit on a damageable target.
pub const HIT_DAMAGE: u32 = 1;

/// Experience awarded to the attacker per hit.
pub const HIT_EXPERIENCE: u64 = 1;

/// Every Nth hit on a training dummy is announced as a milestone.
pub const TRAINING_MILESTONE: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    #[error("Entity not found: {0}")]
    NotFound(EntityId),
    #[error("Target is not here")]
    TargetNotColocated,
    #[error("Target cannot be hit by this attacker")]
    TargetNotHittable,
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CombatResolver {
    progression: ProgressionEngine,
}

impl CombatResolver {
    pub fn new(progression: ProgressionEngine) -> Self {
        Self { progression }
    }

    /// Resolve one hit.
    ///
    /// All checks happen before anything is mutated, so an error leaves the
    /// world untouched. Targets without a hit affordance come back as
    /// `HitOutcome::Unsupported`, also without side effects.
    pub fn apply_hit(
        &self,
        store: &mut EntityStore,
        lifecycle: &mut LifecycleManager,
        outbox: &mut Outbox,
        attacker_id: EntityId,
        target_id: EntityId,
    ) -> Result<HitOutcome, CombatError> {
        let attacker = store
            .get(attacker_id)
            .ok_or(CombatError::NotFound(attacker_id))?;
        let target = store
            .get(target_id)
            .ok_or(CombatError::NotFound(target_id))?;
        if attacker_id == target_id {
            return Err(CombatError::TargetNotHittable);
        }
        if !store.colocated(attacker_id, target_id) {
            return Err(CombatError::TargetNotColocated);
        }
        let affordance = target.hit_affordance();
        if affordance == HitAffordance::None {
            return Ok(HitOutcome::Unsupported);
        }
        if !attacker.is_character() {
            return Err(ProgressionError::NotACharacter(attacker_id).into());
        }

        let attacker_name = attacker.name().to_string();
        let target_name = target.name().to_string();
        let room = store.location_of(target_id);

        match affordance {
            HitAffordance::Training => {
                let hits_taken = store
                    .require_mut(target_id)
                    .map_err(|_| CombatError::NotFound(target_id))?
                    .record_hit_taken()
                    .unwrap_or_default();
                let event = GameEvent::HitLanded {
                    attacker: attacker_id,
                    attacker_name,
                    target: target_id,
                    target_name,
                    damage: 0,
                    remaining_health: None,
                    hits: hits_taken,
                    milestone: hits_taken % TRAINING_MILESTONE == 0,
                };
                announce(outbox, attacker_id, room, event);
                outbox.touch(target_id);

                let level_change =
                    self.progression
                        .grant_experience(store, outbox, attacker_id, HIT_EXPERIENCE)?;
                tracing::debug!(
                    attacker_id = %attacker_id,
                    target_id = %target_id,
                    hits_taken,
                    "Training hit"
                );
                Ok(HitOutcome::Trained {
                    hits_taken,
                    level_change,
                })
            }
            HitAffordance::Damageable => {
                let target = store
                    .require_mut(target_id)
                    .map_err(|_| CombatError::NotFound(target_id))?;
                let outcome = target.take_damage(HIT_DAMAGE);
                let hits_given = target.record_hit_given().unwrap_or_default();
                let remaining = target.health().map(|h| h.current());
                let damage = match outcome {
                    DamageOutcome::Wounded { damage_dealt, .. }
                    | DamageOutcome::Depleted { damage_dealt } => damage_dealt,
                    DamageOutcome::NoHealthPool => 0,
                };
                let event = GameEvent::HitLanded {
                    attacker: attacker_id,
                    attacker_name,
                    target: target_id,
                    target_name,
                    damage,
                    remaining_health: remaining,
                    hits: hits_given,
                    milestone: false,
                };
                announce(outbox, attacker_id, room, event);
                outbox.touch(target_id);

                let level_change =
                    self.progression
                        .grant_experience(store, outbox, attacker_id, HIT_EXPERIENCE)?;
                tracing::debug!(
                    attacker_id = %attacker_id,
                    target_id = %target_id,
                    remaining = ?remaining,
                    "Damaging hit"
                );

                if outcome.is_depleted() {
                    let respawn_in =
                        lifecycle.on_object_destroyed(store, outbox, target_id, Some(attacker_id))?;
                    Ok(HitOutcome::Destroyed {
                        level_change,
                        respawn_in,
                    })
                } else {
                    Ok(HitOutcome::Damaged {
                        remaining_health: remaining.unwrap_or_default(),
                        level_change,
                    })
                }
            }
            HitAffordance::None => Ok(HitOutcome::Unsupported),
        }
    }

    /// Deal `amount` damage to any entity with a health pool.
    ///
    /// Characters brought to zero die and respawn before this returns;
    /// destructible objects brought to zero are destroyed.
    pub fn apply_damage(
        &self,
        store: &mut EntityStore,
        lifecycle: &mut LifecycleManager,
        outbox: &mut Outbox,
        target_id: EntityId,
        amount: u32,
        cause: DeathCause,
    ) -> Result<DamageOutcome, CombatError> {
        let target = store
            .get_mut(target_id)
            .ok_or(CombatError::NotFound(target_id))?;
        let is_character = target.is_character();
        let outcome = target.take_damage(amount);
        if !matches!(outcome, DamageOutcome::NoHealthPool) {
            outbox.touch(target_id);
        }

        if outcome.is_depleted() {
            if is_character {
                lifecycle.on_character_death(store, outbox, target_id, cause)?;
            } else {
                lifecycle.on_object_destroyed(store, outbox, target_id, None)?;
            }
        }
        Ok(outcome)
    }
}

/// Tell the attacker, and the room when there is one.
fn announce(outbox: &mut Outbox, attacker: EntityId, room: Option<EntityId>, event: GameEvent) {
    if let Some(room) = room {
        outbox.notify(room, event.clone());
    }
    outbox.notify(attacker, event);
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberhold_domain::{Entity, EntityName, Experience, Health, Placement};
    use std::time::Duration;

    fn name(s: &str) -> EntityName {
        EntityName::new(s).unwrap()
    }

    struct Arena {
        store: EntityStore,
        lifecycle: LifecycleManager,
        outbox: Outbox,
        hall: EntityId,
        hero: EntityId,
    }

    impl Arena {
        fn new() -> Self {
            let mut store = EntityStore::new();
            let hall = Entity::other(name("Hall"));
            let hall_id = hall.id();
            store.insert(hall, Placement::TopLevel).unwrap();
            let hero = Entity::character(name("Mira"));
            let hero_id = hero.id();
            store.insert(hero, Placement::Inside(hall_id)).unwrap();
            Self {
                store,
                lifecycle: LifecycleManager::new(),
                outbox: Outbox::new(),
                hall: hall_id,
                hero: hero_id,
            }
        }

        fn add(&mut self, entity: Entity) -> EntityId {
            let id = entity.id();
            self.store
                .insert(entity, Placement::Inside(self.hall))
                .unwrap();
            id
        }

        fn hit(&mut self, target: EntityId) -> Result<HitOutcome, CombatError> {
            CombatResolver::default().apply_hit(
                &mut self.store,
                &mut self.lifecycle,
                &mut self.outbox,
                self.hero,
                target,
            )
        }

        fn hero_xp(&self) -> u64 {
            self.store
                .get(self.hero)
                .and_then(Entity::experience)
                .map_or(0, Experience::points)
        }
    }

    mod training_dummy {
        use super::*;

        #[test]
        fn counts_hits_and_grants_experience() {
            let mut arena = Arena::new();
            let dummy = arena.add(Entity::training_dummy(name("Combat Dummy")));

            let outcome = arena.hit(dummy).unwrap();

            assert!(matches!(outcome, HitOutcome::Trained { hits_taken: 1, .. }));
            assert_eq!(arena.hero_xp(), 1);
            assert_eq!(arena.store.get(dummy).unwrap().counter(), Some(1));
        }

        #[test]
        fn every_tenth_hit_is_a_milestone() {
            let mut arena = Arena::new();
            let dummy = arena.add(Entity::training_dummy(name("Combat Dummy")));
            for _ in 0..10 {
                arena.hit(dummy).unwrap();
            }
            let milestones = arena
                .outbox
                .notifications()
                .iter()
                .filter(|n| n.recipient == arena.hall)
                .filter(|n| matches!(n.event, GameEvent::HitLanded { milestone: true, .. }))
                .count();
            assert_eq!(milestones, 1);
        }
    }

    mod destructible_dummy {
        use super::*;

        #[test]
        fn loses_one_health_per_hit() {
            let mut arena = Arena::new();
            let dummy = arena.add(Entity::destructible_dummy(
                name("Worn Dummy"),
                3,
                Duration::from_secs(60),
            ));

            let outcome = arena.hit(dummy).unwrap();

            assert!(matches!(
                outcome,
                HitOutcome::Damaged {
                    remaining_health: 2,
                    ..
                }
            ));
            assert_eq!(
                arena.store.get(dummy).unwrap().health(),
                Some(&Health::new(2, 3).unwrap())
            );
        }

        #[test]
        fn last_hit_destroys_before_returning() {
            let mut arena = Arena::new();
            let dummy = arena.add(Entity::destructible_dummy(
                name("Worn Dummy"),
                1,
                Duration::from_secs(60),
            ));

            let outcome = arena.hit(dummy).unwrap();

            assert!(matches!(outcome, HitOutcome::Destroyed { respawn_in, .. } if respawn_in == Duration::from_secs(60)));
            assert!(!arena.store.is_live(dummy));
            assert!(arena.lifecycle.is_respawn_pending(dummy));
            assert_eq!(arena.hero_xp(), 1);
        }

        #[test]
        fn destroyed_dummy_is_no_longer_here() {
            let mut arena = Arena::new();
            let dummy = arena.add(Entity::destructible_dummy(
                name("Worn Dummy"),
                1,
                Duration::from_secs(60),
            ));
            arena.hit(dummy).unwrap();
            assert_eq!(arena.hit(dummy), Err(CombatError::TargetNotColocated));
            assert_eq!(arena.lifecycle.pending_respawns(), 1);
        }
    }

    mod preconditions {
        use super::*;

        #[test]
        fn non_combat_targets_are_unsupported_without_side_effects() {
            let mut arena = Arena::new();
            let pit = arena.add(Entity::pit(name("Pit")));
            assert_eq!(arena.hit(pit), Ok(HitOutcome::Unsupported));
            assert_eq!(arena.hero_xp(), 0);
            assert!(arena.outbox.is_empty());
        }

        #[test]
        fn stale_reference_in_other_room_is_rejected() {
            let mut arena = Arena::new();
            let yard = Entity::other(name("Yard"));
            let yard_id = yard.id();
            arena.store.insert(yard, Placement::TopLevel).unwrap();
            let dummy = arena.add(Entity::training_dummy(name("Dummy")));
            arena.store.move_to(dummy, yard_id).unwrap();

            assert_eq!(arena.hit(dummy), Err(CombatError::TargetNotColocated));
            assert_eq!(arena.store.get(dummy).unwrap().counter(), Some(0));
            assert!(arena.outbox.is_empty());
        }

        #[test]
        fn cannot_hit_self() {
            let mut arena = Arena::new();
            let hero = arena.hero;
            assert_eq!(arena.hit(hero), Err(CombatError::TargetNotHittable));
        }

        #[test]
        fn unknown_target() {
            let mut arena = Arena::new();
            let ghost = EntityId::new();
            assert_eq!(arena.hit(ghost), Err(CombatError::NotFound(ghost)));
        }

        #[test]
        fn non_character_attackers_cannot_progress() {
            let mut arena = Arena::new();
            let dummy = arena.add(Entity::training_dummy(name("Dummy")));
            let other = arena.add(Entity::training_dummy(name("Other Dummy")));
            let result = CombatResolver::default().apply_hit(
                &mut arena.store,
                &mut arena.lifecycle,
                &mut arena.outbox,
                other,
                dummy,
            );
            assert_eq!(
                result,
                Err(CombatError::Progression(ProgressionError::NotACharacter(other)))
            );
            assert_eq!(arena.store.get(dummy).unwrap().counter(), Some(0));
        }
    }

    mod damage {
        use super::*;

        #[test]
        fn lethal_damage_to_character_respawns_immediately() {
            let mut arena = Arena::new();
            let hero = arena.hero;
            let outcome = CombatResolver::default()
                .apply_damage(
                    &mut arena.store,
                    &mut arena.lifecycle,
                    &mut arena.outbox,
                    hero,
                    500,
                    DeathCause::Damage,
                )
                .unwrap();

            assert!(outcome.is_depleted());
            let entity = arena.store.get(hero).unwrap();
            assert_eq!(entity.health(), Some(&Health::full(100)));
            assert_eq!(arena.store.location_of(hero), Some(arena.hall));
        }

        #[test]
        fn partial_damage_just_wounds() {
            let mut arena = Arena::new();
            let hero = arena.hero;
            let outcome = CombatResolver::default()
                .apply_damage(
                    &mut arena.store,
                    &mut arena.lifecycle,
                    &mut arena.outbox,
                    hero,
                    30,
                    DeathCause::Damage,
                )
                .unwrap();
            assert_eq!(
                outcome,
                DamageOutcome::Wounded {
                    damage_dealt: 30,
                    remaining: 70
                }
            );
        }
    }
}
