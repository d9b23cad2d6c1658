//! Lifecycle manager.
//!
//! Death and respawn for characters, destruction and timed reappearance for
//! destructible objects.
//!
//! ```text
//! Character:           Alive --(health 0)--> Respawning --> Alive   (one step)
//! Destructible object: Live --(destroyed)--> Destroyed --(timer)--> Live
//! ```
//!
//! The manager owns the respawn scheduler. Every destroyed object has exactly
//! one pending timer keyed by its id until the timer fires or is cancelled.

use std::time::Duration;

use emberhold_domain::{DeathCause, EntityId, GameEvent, Health};

use crate::stores::{EntityStore, Outbox, Scheduler, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    #[error("Entity not found: {0}")]
    NotFound(EntityId),
    #[error("Entity {0} is not a character")]
    NotACharacter(EntityId),
    #[error("Entity {0} cannot be destroyed")]
    NotDestructible(EntityId),
    #[error("Entity {0} is already destroyed")]
    AlreadyDestroyed(EntityId),
    #[error("Entity {0} has nowhere to respawn")]
    NoRespawnLocation(EntityId),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LifecycleError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) | StoreError::ContainerNotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

/// Where a destroyed object comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnOrder {
    pub location: EntityId,
}

/// Result of resolving a character's death.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterRespawn {
    /// Where the character ended up; `None` if it had nowhere to go and
    /// stayed put.
    pub location: Option<EntityId>,
    pub health: u32,
}

/// Result of a respawn timer firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RespawnFire {
    Respawned { location: EntityId },
    /// The object was deleted before the timer fired.
    Vanished,
    /// The recorded respawn location no longer exists.
    LocationMissing,
}

#[derive(Debug, Default)]
pub struct LifecycleManager {
    respawns: Scheduler<EntityId, RespawnOrder>,
}

impl LifecycleManager {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Characters
    // =========================================================================

    /// Resolve a character's death in one step: relocate to the respawn
    /// point and refill health.
    ///
    /// A character that never set a respawn point gets its current location
    /// recorded as one. A respawn point that has since been deleted falls back
    /// to the current location.
    pub fn on_character_death(
        &self,
        store: &mut EntityStore,
        outbox: &mut Outbox,
        character_id: EntityId,
        cause: DeathCause,
    ) -> Result<CharacterRespawn, LifecycleError> {
        let character = store.require(character_id)?;
        if !character.is_character() {
            return Err(LifecycleError::NotACharacter(character_id));
        }
        let name = character.name().to_string();
        let died_in = store.location_of(character_id);
        let destination = character
            .respawn_point()
            .filter(|point| store.contains(*point))
            .or(died_in);

        if let Some(destination) = destination.filter(|dest| Some(*dest) != died_in) {
            store.move_to(character_id, destination)?;
        }

        let character = store.require_mut(character_id)?;
        character.deplete_health();
        if character.respawn_point().is_none() {
            if let Some(here) = died_in {
                // Characters always accept a respawn point.
                let _ = character.set_respawn_point(here);
            }
        }
        character.restore_health();
        let health = character.health().map_or(0, Health::current);

        tracing::info!(
            entity_id = %character_id,
            cause = ?cause,
            respawn_at = ?destination,
            "Character died and respawned"
        );

        let died = GameEvent::Died {
            character: character_id,
            name: name.clone(),
            cause,
        };
        outbox.notify(character_id, died.clone());
        if let Some(room) = died_in {
            outbox.notify(room, died);
        }

        let respawned = GameEvent::Respawned {
            character: character_id,
            name,
            location: destination,
            health,
        };
        outbox.notify(character_id, respawned.clone());
        if let Some(room) = destination {
            outbox.notify(room, respawned);
        }

        outbox.touch(character_id);
        Ok(CharacterRespawn {
            location: destination,
            health,
        })
    }

    /// Point a character's future respawns at `location_id`.
    pub fn set_respawn_point(
        &self,
        store: &mut EntityStore,
        outbox: &mut Outbox,
        character_id: EntityId,
        location_id: EntityId,
    ) -> Result<(), LifecycleError> {
        if !store.contains(location_id) {
            return Err(LifecycleError::NotFound(location_id));
        }
        let character = store.require_mut(character_id)?;
        if !character.is_character() {
            return Err(LifecycleError::NotACharacter(character_id));
        }
        character
            .set_respawn_point(location_id)
            .map_err(|_| LifecycleError::NotACharacter(character_id))?;

        tracing::debug!(entity_id = %character_id, location_id = %location_id, "Respawn point set");
        outbox.touch(character_id);
        Ok(())
    }

    // =========================================================================
    // Destructible objects
    // =========================================================================

    /// Take a destructible object out of the world and schedule its return.
    ///
    /// Returns the delay until it reappears.
    pub fn on_object_destroyed(
        &mut self,
        store: &mut EntityStore,
        outbox: &mut Outbox,
        object_id: EntityId,
        destroyer: Option<EntityId>,
    ) -> Result<Duration, LifecycleError> {
        let object = store.require(object_id)?;
        let Some(delay) = object.respawn_delay() else {
            return Err(LifecycleError::NotDestructible(object_id));
        };
        if !store.is_live(object_id) || self.respawns.is_pending(&object_id) {
            return Err(LifecycleError::AlreadyDestroyed(object_id));
        }
        let destroyed_in = store.location_of(object_id);
        let location = object
            .respawn_point()
            .filter(|point| store.contains(*point))
            .or(destroyed_in)
            .ok_or(LifecycleError::NoRespawnLocation(object_id))?;
        let name = object.name().to_string();

        store.move_to_void(object_id)?;
        self.respawns
            .schedule_once(object_id, delay, RespawnOrder { location });

        tracing::info!(
            entity_id = %object_id,
            destroyer = ?destroyer,
            delay_secs = delay.as_secs(),
            "Object destroyed"
        );

        let event = GameEvent::ObjectDestroyed {
            object: object_id,
            name,
            destroyer,
            respawn_in_secs: delay.as_secs(),
        };
        if let Some(destroyer) = destroyer {
            outbox.notify(destroyer, event.clone());
        }
        if let Some(room) = destroyed_in {
            outbox.notify(room, event);
        }

        outbox.touch(object_id);
        Ok(delay)
    }

    /// Bring a destroyed object back. Tolerates a vanished object.
    pub fn on_respawn_fire(
        &mut self,
        store: &mut EntityStore,
        outbox: &mut Outbox,
        object_id: EntityId,
        order: RespawnOrder,
    ) -> RespawnFire {
        // Normally already cleared by the scheduler; covers direct calls.
        self.respawns.cancel(&object_id);

        if !store.contains(object_id) {
            tracing::warn!(entity_id = %object_id, "Respawn fired for a vanished object");
            return RespawnFire::Vanished;
        }
        if store.move_to(object_id, order.location).is_err() {
            tracing::warn!(
                entity_id = %object_id,
                location_id = %order.location,
                "Respawn location is gone; object stays in the void"
            );
            return RespawnFire::LocationMissing;
        }

        let Some(object) = store.get_mut(object_id) else {
            return RespawnFire::Vanished;
        };
        object.restore_health();
        let name = object.name().to_string();

        tracing::info!(entity_id = %object_id, location_id = %order.location, "Object respawned");
        outbox.notify(
            order.location,
            GameEvent::ObjectRespawned {
                object: object_id,
                name,
                location: order.location,
            },
        );
        outbox.touch(object_id);
        RespawnFire::Respawned {
            location: order.location,
        }
    }

    /// Put a timer back after loading a world that was saved mid-respawn.
    pub fn restore_pending(&mut self, object_id: EntityId, location: EntityId, delay: Duration) {
        self.respawns
            .schedule_once(object_id, delay, RespawnOrder { location });
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Cancel a pending respawn. Returns whether one was pending.
    pub fn cancel_respawn(&mut self, object_id: EntityId) -> bool {
        self.respawns.cancel(&object_id).is_some()
    }

    pub fn is_respawn_pending(&self, object_id: EntityId) -> bool {
        self.respawns.is_pending(&object_id)
    }

    pub fn pending_respawns(&self) -> usize {
        self.respawns.pending_count()
    }

    /// Earliest pending respawn, in logical time.
    pub fn next_due(&mut self) -> Option<Duration> {
        self.respawns.next_due()
    }

    pub fn now(&self) -> Duration {
        self.respawns.now()
    }

    /// Advance logical time and collect respawns that came due.
    pub fn due_respawns(&mut self, now: Duration) -> Vec<(EntityId, RespawnOrder)> {
        self.respawns
            .advance_to(now)
            .into_iter()
            .map(|fired| (fired.key, fired.payload))
            .collect()
    }
}
