//! Demo world for the binary driver.

use emberhold_domain::{DomainError, Entity, EntityId, EntityKind, EntityName, EntitySnapshot, Placement};

use crate::api::{WorldError, WorldHandle};
use crate::config::EngineConfig;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    World(#[from] WorldError),
}

/// Where the driver's character lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoWorld {
    pub character: EntityId,
    pub room: EntityId,
}

/// Create the training hall: one room with a combat dummy, a worn-out
/// dummy, a bottomless pit and a character.
pub async fn seed_demo_world(
    world: &WorldHandle,
    config: &EngineConfig,
) -> Result<DemoWorld, SeedError> {
    let room = world
        .spawn(
            Entity::other(EntityName::new("Training Hall")?),
            Placement::TopLevel,
        )
        .await?;
    let inside = Placement::Inside(room);

    world
        .spawn(Entity::training_dummy(EntityName::new("Combat Dummy")?), inside)
        .await?;
    world
        .spawn(
            Entity::destructible_dummy(
                EntityName::new("Worn-Out Dummy")?,
                config.dummy_health,
                config.respawn_delay,
            ),
            inside,
        )
        .await?;
    world
        .spawn(Entity::pit(EntityName::new("Bottomless Pit")?), inside)
        .await?;
    let character = world
        .spawn(Entity::character(EntityName::new("Adventurer")?), inside)
        .await?;

    tracing::info!(room_id = %room, character_id = %character, "Seeded demo world");
    Ok(DemoWorld { character, room })
}

/// Pick the character a restarted driver should control.
///
/// The oldest-saved placed character wins, so restarts are stable.
pub fn find_demo_world(snapshots: &[EntitySnapshot]) -> Option<DemoWorld> {
    snapshots
        .iter()
        .filter(|s| s.profile.kind() == EntityKind::Character)
        .filter_map(|s| {
            s.placement
                .container()
                .map(|room| (s.saved_at, s.id, room))
        })
        .min()
        .map(|(_, character, room)| DemoWorld { character, room })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    #[test]
    fn finds_the_oldest_placed_character() {
        let room = Entity::other(EntityName::new("Hall").unwrap());
        let first = Entity::character(EntityName::new("First").unwrap());
        let second = Entity::character(EntityName::new("Second").unwrap());
        let lost = Entity::character(EntityName::new("Lost").unwrap());
        let now = Utc::now();

        let snapshots = vec![
            EntitySnapshot::capture(&room, Placement::TopLevel, now),
            EntitySnapshot::capture(&second, Placement::Inside(room.id()), now),
            EntitySnapshot::capture(
                &first,
                Placement::Inside(room.id()),
                now - ChronoDuration::seconds(5),
            ),
            EntitySnapshot::capture(&lost, Placement::Void, now - ChronoDuration::seconds(10)),
        ];

        assert_eq!(
            find_demo_world(&snapshots),
            Some(DemoWorld {
                character: first.id(),
                room: room.id(),
            })
        );
    }

    #[test]
    fn empty_world_has_no_character() {
        assert_eq!(find_demo_world(&[]), None);
    }
}
