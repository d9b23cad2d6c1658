//! Experience and leveling through the engine.

use emberhold_domain::{Experience, GameEvent, LevelChange};

use super::*;
use crate::use_cases::ProgressionEngine;

fn grant(scenario: &mut Scenario, amount: u64) -> LevelChange {
    let hero = scenario.hero;
    let (store, _, outbox) = scenario.world.parts();
    ProgressionEngine::new()
        .grant_experience(store, outbox, hero, amount)
        .unwrap()
}

#[test]
fn level_always_follows_experience() {
    let mut scenario = Scenario::new();
    for amount in [1, 7, 92, 150, 1, 49, 300, 99, 1] {
        grant(&mut scenario, amount);
        let entity = scenario.entity(scenario.hero);
        let points = entity.experience().map_or(0, Experience::points);
        let level = entity.level().unwrap().get();
        assert_eq!(u64::from(level), (points / 100 + 1).max(1), "at {points} xp");
    }
}

#[test]
fn crossing_one_threshold_heals_to_the_new_max() {
    let mut scenario = Scenario::with_hero(character_with_experience("Mira", 95));
    {
        let hero = scenario.hero;
        let (store, _, _) = scenario.world.parts();
        store.get_mut(hero).unwrap().take_damage(60);
    }

    let change = grant(&mut scenario, 10);

    assert_eq!(change.level().get(), 2);
    assert_eq!(scenario.experience(scenario.hero), 105);
    let health = scenario.health(scenario.hero);
    assert_eq!((health.current(), health.max()), (110, 110));
}

#[test]
fn multi_level_award_applies_final_level_once() {
    let mut scenario = Scenario::with_hero(character_with_experience("Mira", 195));
    assert_eq!(scenario.health(scenario.hero).max(), 110);

    let change = grant(&mut scenario, 10);

    assert!(matches!(
        change,
        LevelChange::LeveledUp {
            max_health: 120,
            max_health_delta: 10,
            ..
        }
    ));
    let health = scenario.health(scenario.hero);
    assert_eq!((health.current(), health.max()), (120, 120));

    let level_ups: Vec<_> = scenario
        .events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
        .collect();
    assert_eq!(level_ups.len(), 1);
}

#[test]
fn hundred_training_hits_reach_level_two() {
    let mut scenario = Scenario::new();
    scenario.spawn_here(emberhold_domain::Entity::training_dummy(name("Combat Dummy")));

    for _ in 0..99 {
        scenario.hit("combat").unwrap();
    }
    let report = scenario.hit("combat").unwrap();

    assert!(report.leveled_up());
    assert_eq!(report.level.get(), 2);
    assert_eq!(scenario.health(scenario.hero).max(), 110);
}
