//! Shared scenario setup.

use emberhold_domain::{
    Entity, EntityId, EntityName, EntityProfile, Experience, GameEvent, Health, Placement,
};

use crate::app::default_commands;
use crate::use_cases::{CommandError, GameCommands, HitReport};
use crate::world::World;

pub fn name(s: &str) -> EntityName {
    EntityName::new(s).expect("valid test name")
}

/// A character with `points` experience and a full pool for its level.
pub fn character_with_experience(character_name: &str, points: u64) -> Entity {
    Entity::from_parts(
        EntityId::new(),
        name(character_name),
        EntityProfile::Character {
            experience: Experience::new(points),
            respawn_point: None,
        },
        None,
    )
}

/// One room ("Training Hall") with one character ("Mira") in it.
pub struct Scenario {
    pub world: World,
    pub commands: GameCommands,
    pub hall: EntityId,
    pub hero: EntityId,
}

impl Scenario {
    pub fn new() -> Self {
        Self::with_hero(Entity::character(name("Mira")))
    }

    pub fn with_hero(hero: Entity) -> Self {
        let mut world = World::new();
        let hall = world
            .spawn(Entity::other(name("Training Hall")), Placement::TopLevel)
            .expect("spawn hall");
        let hero = world
            .spawn(hero, Placement::Inside(hall))
            .expect("spawn hero");
        world.drain_outbox();
        Self {
            world,
            commands: default_commands(),
            hall,
            hero,
        }
    }

    pub fn spawn_here(&mut self, entity: Entity) -> EntityId {
        self.world
            .spawn(entity, Placement::Inside(self.hall))
            .expect("spawn into hall")
    }

    pub fn spawn_room(&mut self, room_name: &str) -> EntityId {
        self.world
            .spawn(Entity::other(name(room_name)), Placement::TopLevel)
            .expect("spawn room")
    }

    pub fn entity(&self, id: EntityId) -> &Entity {
        self.world.store().get(id).expect("entity exists")
    }

    pub fn health(&self, id: EntityId) -> Health {
        *self.entity(id).health().expect("has a health pool")
    }

    pub fn experience(&self, id: EntityId) -> u64 {
        self.entity(id).experience().map_or(0, Experience::points)
    }

    pub fn hit(&mut self, target: &str) -> Result<HitReport, CommandError> {
        self.commands.hit(&mut self.world, self.hero, target)
    }

    /// Events queued since the last drain.
    pub fn events(&mut self) -> Vec<GameEvent> {
        self.world
            .drain_outbox()
            .notifications
            .into_iter()
            .map(|n| n.event)
            .collect()
    }
}
