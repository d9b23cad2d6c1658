//! In-memory entity repository.

use async_trait::async_trait;
use dashmap::DashMap;
use emberhold_domain::{EntityId, EntitySnapshot};

use crate::infrastructure::ports::{EntityRepo, RepoError};

/// Snapshots held in a concurrent map. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryEntityRepo {
    snapshots: DashMap<EntityId, EntitySnapshot>,
}

impl InMemoryEntityRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[async_trait]
impl EntityRepo for InMemoryEntityRepo {
    async fn load(&self, id: EntityId) -> Result<Option<EntitySnapshot>, RepoError> {
        Ok(self.snapshots.get(&id).map(|entry| entry.value().clone()))
    }

    async fn save(&self, snapshot: &EntitySnapshot) -> Result<(), RepoError> {
        self.snapshots.insert(snapshot.id, snapshot.clone());
        Ok(())
    }

    async fn delete(&self, id: EntityId) -> Result<(), RepoError> {
        self.snapshots.remove(&id);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<EntitySnapshot>, RepoError> {
        Ok(self
            .snapshots
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}
