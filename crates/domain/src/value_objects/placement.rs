//! Where an entity sits in the world

use serde::{Deserialize, Serialize};

use crate::EntityId;

/// Location relation of an entity.
///
/// ```text
/// TopLevel   - a root container such as a room
/// Inside(id) - contained by another entity
/// Void       - removed from the live world (still owned by the store)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "at", content = "container", rename_all = "camelCase")]
pub enum Placement {
    TopLevel,
    Inside(EntityId),
    Void,
}

impl Placement {
    /// The containing entity, if any.
    #[inline]
    pub fn container(self) -> Option<EntityId> {
        match self {
            Self::Inside(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn is_void(self) -> bool {
        matches!(self, Self::Void)
    }
}
