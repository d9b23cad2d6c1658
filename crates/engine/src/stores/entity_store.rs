//! Authoritative in-memory entity state.
//!
//! Owns every entity plus the location relation (`id -> placement`) and a
//! contents index (`container -> ids`, in arrival order). Entities only ever
//! refer to each other by id; every lookup goes through the store, so a
//! deleted id simply stops resolving.
//!
//! Entities in the void are still owned here but are not part of the live
//! world: they show up in no container's contents and can't be colocated
//! with anything.

use std::collections::HashMap;

use emberhold_domain::{Entity, EntityId, Placement};

/// Store-level failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {0}")]
    NotFound(EntityId),
    #[error("Entity already exists: {0}")]
    Duplicate(EntityId),
    #[error("Container not found: {0}")]
    ContainerNotFound(EntityId),
    #[error("Entity {entity} cannot be placed inside {container}")]
    Containment {
        entity: EntityId,
        container: EntityId,
    },
}

#[derive(Debug, Default)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    placements: HashMap<EntityId, Placement>,
    contents: HashMap<EntityId, Vec<EntityId>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Add a new entity at `placement`.
    pub fn insert(&mut self, entity: Entity, placement: Placement) -> Result<(), StoreError> {
        let id = entity.id();
        if self.entities.contains_key(&id) {
            return Err(StoreError::Duplicate(id));
        }
        if let Placement::Inside(container) = placement {
            if container == id {
                return Err(StoreError::Containment {
                    entity: id,
                    container,
                });
            }
            if !self.entities.contains_key(&container) {
                return Err(StoreError::ContainerNotFound(container));
            }
        }

        self.entities.insert(id, entity);
        self.set_placement(id, placement);
        Ok(())
    }

    /// Remove an entity for good.
    ///
    /// Whatever it contained drops into the void; those entities stay owned
    /// by the store until deleted themselves.
    pub fn remove(&mut self, id: EntityId) -> Result<Entity, StoreError> {
        let entity = self.entities.remove(&id).ok_or(StoreError::NotFound(id))?;
        self.detach(id);
        self.placements.remove(&id);

        for orphan in self.contents.remove(&id).unwrap_or_default() {
            self.placements.insert(orphan, Placement::Void);
        }
        Ok(entity)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn require(&self, id: EntityId) -> Result<&Entity, StoreError> {
        self.get(id).ok_or(StoreError::NotFound(id))
    }

    pub fn require_mut(&mut self, id: EntityId) -> Result<&mut Entity, StoreError> {
        self.get_mut(id).ok_or(StoreError::NotFound(id))
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn placement_of(&self, id: EntityId) -> Option<Placement> {
        self.placements.get(&id).copied()
    }

    /// The container the entity currently sits in.
    pub fn location_of(&self, id: EntityId) -> Option<EntityId> {
        self.placement_of(id).and_then(Placement::container)
    }

    /// Present and not in the void.
    pub fn is_live(&self, id: EntityId) -> bool {
        self.placement_of(id).is_some_and(|p| !p.is_void())
    }

    /// Live entities directly inside `container`, in arrival order.
    pub fn contents_of(&self, container: EntityId) -> &[EntityId] {
        self.contents
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Both entities sit directly in the same container.
    pub fn colocated(&self, a: EntityId, b: EntityId) -> bool {
        match (self.location_of(a), self.location_of(b)) {
            (Some(here), Some(there)) => here == there,
            _ => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Entity, Placement)> + '_ {
        self.entities.values().map(|entity| {
            let placement = self
                .placements
                .get(&entity.id())
                .copied()
                .unwrap_or(Placement::Void);
            (entity, placement)
        })
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Move an entity into `container`.
    pub fn move_to(&mut self, id: EntityId, container: EntityId) -> Result<(), StoreError> {
        if !self.entities.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        if !self.entities.contains_key(&container) {
            return Err(StoreError::ContainerNotFound(container));
        }
        if self.would_cycle(id, container) {
            return Err(StoreError::Containment {
                entity: id,
                container,
            });
        }
        self.set_placement(id, Placement::Inside(container));
        Ok(())
    }

    /// Take an entity out of the live world without deleting it.
    pub fn move_to_void(&mut self, id: EntityId) -> Result<(), StoreError> {
        if !self.entities.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        self.set_placement(id, Placement::Void);
        Ok(())
    }

    /// Put an entity at any placement.
    pub fn place(&mut self, id: EntityId, placement: Placement) -> Result<(), StoreError> {
        match placement {
            Placement::Inside(container) => self.move_to(id, container),
            Placement::Void => self.move_to_void(id),
            Placement::TopLevel => {
                if !self.entities.contains_key(&id) {
                    return Err(StoreError::NotFound(id));
                }
                self.set_placement(id, Placement::TopLevel);
                Ok(())
            }
        }
    }

    fn set_placement(&mut self, id: EntityId, placement: Placement) {
        self.detach(id);
        if let Placement::Inside(container) = placement {
            self.contents.entry(container).or_default().push(id);
        }
        self.placements.insert(id, placement);
    }

    fn detach(&mut self, id: EntityId) {
        let Some(Placement::Inside(old)) = self.placements.get(&id).copied() else {
            return;
        };
        if let Some(siblings) = self.contents.get_mut(&old) {
            siblings.retain(|sibling| *sibling != id);
            if siblings.is_empty() {
                self.contents.remove(&old);
            }
        }
    }

    /// Placing `id` inside `container` would make it contain itself.
    fn would_cycle(&self, id: EntityId, container: EntityId) -> bool {
        let mut cursor = Some(container);
        while let Some(current) = cursor {
            if current == id {
                return true;
            }
            cursor = self.location_of(current);
        }
        false
    }
}
