//! The world: everything the serialized mutation loop owns.
//!
//! `World` is plain synchronous state. The actor in `api::actor` is the only
//! thing that holds one at runtime, which is what makes every mutation
//! atomic with respect to every other.

use std::time::Duration;

use chrono::{DateTime, Utc};
use emberhold_domain::{Entity, EntityId, EntityKind, EntitySnapshot, Placement};

use crate::stores::{EntityStore, Outbox, OutboxBatch, StoreError};
use crate::use_cases::lifecycle::{LifecycleManager, RespawnFire};

#[derive(Debug, Default)]
pub struct World {
    store: EntityStore,
    lifecycle: LifecycleManager,
    outbox: Outbox,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a world from persisted snapshots.
    ///
    /// Entities are inserted first and placed afterwards, so snapshots can
    /// arrive in any order. A placement whose container is missing leaves
    /// the entity in the void. Destructible objects saved while destroyed
    /// get a fresh timer with their full delay.
    pub fn hydrate(snapshots: Vec<EntitySnapshot>) -> Result<Self, StoreError> {
        let mut world = Self::new();
        let mut placements = Vec::with_capacity(snapshots.len());

        for snapshot in snapshots {
            let (entity, placement) = snapshot.restore();
            placements.push((entity.id(), placement));
            world.store.insert(entity, Placement::Void)?;
        }

        for (id, placement) in placements {
            if placement.is_void() {
                continue;
            }
            if let Err(e) = world.store.place(id, placement) {
                tracing::warn!(entity_id = %id, error = %e, "Could not restore placement; entity left in the void");
            }
        }

        let destroyed: Vec<(EntityId, Option<EntityId>, Duration)> = world
            .store
            .iter()
            .filter(|(entity, placement)| {
                entity.kind() == EntityKind::DestructibleDummy && placement.is_void()
            })
            .filter_map(|(entity, _)| {
                entity
                    .respawn_delay()
                    .map(|delay| (entity.id(), entity.respawn_point(), delay))
            })
            .collect();
        for (id, point, delay) in destroyed {
            match point.filter(|p| world.store.contains(*p)) {
                Some(location) => world.lifecycle.restore_pending(id, location, delay),
                None => {
                    tracing::warn!(entity_id = %id, "Destroyed object has no respawn location; left in the void");
                }
            }
        }

        tracing::info!(
            entities = world.store.len(),
            pending_respawns = world.lifecycle.pending_respawns(),
            "World hydrated"
        );
        Ok(world)
    }

    // =========================================================================
    // Access
    // =========================================================================

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn lifecycle(&self) -> &LifecycleManager {
        &self.lifecycle
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Split borrows for components that touch several parts at once.
    pub(crate) fn parts(&mut self) -> (&mut EntityStore, &mut LifecycleManager, &mut Outbox) {
        (&mut self.store, &mut self.lifecycle, &mut self.outbox)
    }

    pub fn drain_outbox(&mut self) -> OutboxBatch {
        self.outbox.drain()
    }

    pub fn snapshot(&self, id: EntityId, saved_at: DateTime<Utc>) -> Option<EntitySnapshot> {
        let entity = self.store.get(id)?;
        let placement = self.store.placement_of(id)?;
        Some(EntitySnapshot::capture(entity, placement, saved_at))
    }

    pub fn snapshots(&self, saved_at: DateTime<Utc>) -> Vec<EntitySnapshot> {
        self.store
            .iter()
            .map(|(entity, placement)| EntitySnapshot::capture(entity, placement, saved_at))
            .collect()
    }

    // =========================================================================
    // Administration
    // =========================================================================

    /// Add a new entity.
    ///
    /// Characters and destructible objects spawned inside a container get
    /// that container as their respawn point unless they already have one.
    pub fn spawn(&mut self, mut entity: Entity, placement: Placement) -> Result<EntityId, StoreError> {
        if let Placement::Inside(container) = placement {
            if entity.respawn_point().is_none() {
                // Only kinds with a respawn point accept one.
                let _ = entity.set_respawn_point(container);
            }
        }
        let id = entity.id();
        let kind = entity.kind();
        self.store.insert(entity, placement)?;
        self.outbox.touch(id);
        tracing::debug!(entity_id = %id, kind = %kind, placement = ?placement, "Entity spawned");
        Ok(id)
    }

    /// Remove an entity for good, cancelling any pending respawn.
    pub fn delete(&mut self, id: EntityId) -> Result<Entity, StoreError> {
        let orphans = self.store.contents_of(id).to_vec();
        let entity = self.store.remove(id)?;
        let cancelled = self.lifecycle.cancel_respawn(id);

        self.outbox.mark_deleted(id);
        for orphan in orphans {
            self.outbox.touch(orphan);
        }
        tracing::info!(entity_id = %id, cancelled_respawn = cancelled, "Entity deleted");
        Ok(entity)
    }

    // =========================================================================
    // Time
    // =========================================================================

    /// Earliest pending timer, in logical time since the world started.
    pub fn next_due(&mut self) -> Option<Duration> {
        self.lifecycle.next_due()
    }

    pub fn now(&self) -> Duration {
        self.lifecycle.now()
    }

    /// Advance logical time and run every respawn that came due.
    pub fn advance_to(&mut self, now: Duration) -> Vec<(EntityId, RespawnFire)> {
        let due = self.lifecycle.due_respawns(now);
        let mut fired = Vec::with_capacity(due.len());
        for (id, order) in due {
            let result = self
                .lifecycle
                .on_respawn_fire(&mut self.store, &mut self.outbox, id, order);
            fired.push((id, result));
        }
        fired
    }
}
