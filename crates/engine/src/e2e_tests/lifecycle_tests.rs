//! Death, destruction and timed respawn.

use std::time::Duration;

use emberhold_domain::{DeathCause, Entity, GameEvent, HealOutcome, Placement};

use super::*;
use crate::use_cases::{CombatResolver, LifecycleError, RespawnFire};

const DELAY: Duration = Duration::from_secs(60);

fn destroy(scenario: &mut Scenario, id: emberhold_domain::EntityId) -> Result<Duration, LifecycleError> {
    let (store, lifecycle, outbox) = scenario.world.parts();
    lifecycle.on_object_destroyed(store, outbox, id, None)
}

mod destruction {
    use super::*;

    #[test]
    fn second_destroy_is_rejected_without_a_second_timer() {
        let mut scenario = Scenario::new();
        let dummy = scenario.spawn_here(Entity::destructible_dummy(name("Worn Dummy"), 5, DELAY));

        assert_eq!(destroy(&mut scenario, dummy), Ok(DELAY));
        assert_eq!(scenario.world.lifecycle().pending_respawns(), 1);

        assert_eq!(
            destroy(&mut scenario, dummy),
            Err(LifecycleError::AlreadyDestroyed(dummy))
        );
        assert_eq!(scenario.world.lifecycle().pending_respawns(), 1);
    }

    #[test]
    fn respawn_restores_health_and_location() {
        let mut scenario = Scenario::new();
        let dummy = scenario.spawn_here(Entity::destructible_dummy(name("Worn Dummy"), 3, DELAY));
        for _ in 0..3 {
            scenario.hit("worn").unwrap();
        }
        assert_eq!(scenario.health(dummy).current(), 0);

        assert!(scenario.world.advance_to(DELAY - Duration::from_secs(1)).is_empty());
        let fired = scenario.world.advance_to(DELAY);

        assert_eq!(
            fired,
            vec![(dummy, RespawnFire::Respawned { location: scenario.hall })]
        );
        let health = scenario.health(dummy);
        assert_eq!((health.current(), health.max()), (3, 3));
        assert_eq!(
            scenario.world.store().placement_of(dummy),
            Some(Placement::Inside(scenario.hall))
        );
        assert!(!scenario.world.lifecycle().is_respawn_pending(dummy));
    }

    #[test]
    fn respawn_of_a_vanished_object_is_a_no_op() {
        let mut scenario = Scenario::new();
        let dummy = scenario.spawn_here(Entity::destructible_dummy(name("Worn Dummy"), 1, DELAY));
        destroy(&mut scenario, dummy).unwrap();
        {
            // Bypass `World::delete`, which would cancel the timer.
            let (store, _, _) = scenario.world.parts();
            store.remove(dummy).unwrap();
        }
        scenario.events();

        let fired = scenario.world.advance_to(DELAY);

        assert_eq!(fired, vec![(dummy, RespawnFire::Vanished)]);
        assert!(scenario.events().is_empty());
    }

    #[test]
    fn deleted_objects_never_respawn() {
        let mut scenario = Scenario::new();
        let dummy = scenario.spawn_here(Entity::destructible_dummy(name("Worn Dummy"), 1, DELAY));
        destroy(&mut scenario, dummy).unwrap();

        scenario.world.delete(dummy).unwrap();

        assert!(scenario.world.advance_to(DELAY * 10).is_empty());
        assert!(scenario.world.store().get(dummy).is_none());
    }

    #[test]
    fn missing_respawn_location_leaves_object_in_void() {
        let mut scenario = Scenario::new();
        let shed = scenario.spawn_room("Shed");
        let dummy = scenario
            .world
            .spawn(
                Entity::destructible_dummy(name("Worn Dummy"), 1, DELAY),
                Placement::Inside(shed),
            )
            .unwrap();
        destroy(&mut scenario, dummy).unwrap();
        scenario.world.delete(shed).unwrap();

        let fired = scenario.world.advance_to(DELAY);

        assert_eq!(fired, vec![(dummy, RespawnFire::LocationMissing)]);
        assert_eq!(scenario.world.store().placement_of(dummy), Some(Placement::Void));
    }
}

mod characters {
    use super::*;

    #[test]
    fn heal_is_capped_at_max_health() {
        let mut scenario = Scenario::new();
        let hero = scenario.hero;
        {
            let (store, lifecycle, outbox) = scenario.world.parts();
            CombatResolver::default()
                .apply_damage(store, lifecycle, outbox, hero, 30, DeathCause::Damage)
                .unwrap();
        }
        assert_eq!(scenario.health(hero).current(), 70);

        let report = scenario
            .commands
            .heal(&mut scenario.world, hero, Some("1000"))
            .unwrap();

        assert!(matches!(
            report.outcome,
            HealOutcome::Healed {
                amount_healed: 30,
                new_health: 100
            }
        ));
        assert_eq!(scenario.health(hero).current(), 100);
    }

    #[test]
    fn death_resolves_to_full_health_at_respawn_point() {
        let mut scenario = Scenario::new();
        let hero = scenario.hero;
        let yard = scenario.spawn_room("Yard");
        {
            let (store, _, _) = scenario.world.parts();
            store.move_to(hero, yard).unwrap();
        }
        scenario.commands.set_respawn(&mut scenario.world, hero).unwrap();
        {
            let (store, _, _) = scenario.world.parts();
            store.move_to(hero, scenario.hall).unwrap();
        }
        scenario.spawn_here(Entity::pit(name("Bottomless Pit")));
        scenario.events();

        let respawn = scenario
            .commands
            .jump_into(&mut scenario.world, hero, "in pit")
            .unwrap();

        assert_eq!(respawn.location, Some(yard));
        assert_eq!(scenario.world.store().location_of(hero), Some(yard));
        let health = scenario.health(hero);
        assert!(health.is_full());
        assert!(scenario.world.store().is_live(hero));

        let events = scenario.events();
        let died = events
            .iter()
            .position(|e| matches!(e, GameEvent::Died { .. }))
            .unwrap();
        let respawned = events
            .iter()
            .position(|e| matches!(e, GameEvent::Respawned { .. }))
            .unwrap();
        assert!(died < respawned);
    }

    #[test]
    fn kill_respawns_in_place_without_a_respawn_point() {
        let mut scenario = Scenario::with_hero(character_with_experience("Mira", 250));
        let hero = scenario.hero;
        {
            let (store, _, _) = scenario.world.parts();
            store.get_mut(hero).unwrap().take_damage(17);
        }

        let respawn = scenario.commands.kill(&mut scenario.world, hero).unwrap();

        assert_eq!(respawn.location, Some(scenario.hall));
        assert_eq!(respawn.health, 120);
        assert_eq!(scenario.health(hero).current(), 120);
        assert_eq!(scenario.experience(hero), 250);
    }
}
