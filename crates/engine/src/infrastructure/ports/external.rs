//! Outbound notification and target resolution ports.

use emberhold_domain::{EntityId, Notification};

use super::types::TargetSpec;
use crate::stores::EntityStore;

/// Delivers game events to whoever is listening.
///
/// Called from inside the world actor, so implementations must not block:
/// hand the notification off and return.
#[cfg_attr(test, mockall::automock)]
pub trait NotifierPort: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Turns a typed target into an entity id from the actor's point of view.
pub trait TargetResolver: Send + Sync {
    fn resolve(&self, store: &EntityStore, actor: EntityId, spec: &TargetSpec) -> Option<EntityId>;
}
