//! Persisted form of an entity
//!
//! The engine treats entity state as durable between calls; snapshots are what
//! crosses the persistence boundary. Placement travels with the snapshot even
//! though the aggregate itself doesn't own it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregates::{Entity, EntityProfile};
use crate::value_objects::{EntityName, Health, Placement};
use crate::EntityId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub name: EntityName,
    pub profile: EntityProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,
    pub placement: Placement,
    pub saved_at: DateTime<Utc>,
}

impl EntitySnapshot {
    pub fn capture(entity: &Entity, placement: Placement, saved_at: DateTime<Utc>) -> Self {
        Self {
            id: entity.id(),
            name: entity.name().clone(),
            profile: entity.profile().clone(),
            health: entity.health().copied(),
            placement,
            saved_at,
        }
    }

    /// Rebuild the aggregate; the placement is returned alongside it.
    pub fn restore(self) -> (Entity, Placement) {
        let entity = Entity::from_parts(self.id, self.name, self.profile, self.health);
        (entity, self.placement)
    }
}
