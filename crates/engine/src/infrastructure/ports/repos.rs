//! Repository port traits.

use async_trait::async_trait;
use emberhold_domain::{EntityId, EntitySnapshot};

use super::error::RepoError;

/// Durable storage for entity snapshots.
///
/// The world loads everything once at startup and afterwards only writes;
/// reads during play always come from the in-memory store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityRepo: Send + Sync {
    async fn load(&self, id: EntityId) -> Result<Option<EntitySnapshot>, RepoError>;
    /// Insert or overwrite.
    async fn save(&self, snapshot: &EntitySnapshot) -> Result<(), RepoError>;
    /// Deleting an unknown id is not an error.
    async fn delete(&self, id: EntityId) -> Result<(), RepoError>;
    async fn load_all(&self) -> Result<Vec<EntitySnapshot>, RepoError>;
}
