//! Name-based target resolution.

use emberhold_domain::{EntityId, EntityName};

use crate::infrastructure::ports::{TargetResolver, TargetSpec};
use crate::stores::EntityStore;

/// Looks for a target among the live entities sharing the actor's room,
/// then among the actor's own contents.
///
/// Case-insensitive. An exact name match beats a name prefix, which beats a
/// prefix of any later word ("pit" finds "Bottomless Pit"). Ties go to
/// whatever arrived first. The actor never resolves to itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalNameResolver;

impl LocalNameResolver {
    pub fn new() -> Self {
        Self
    }
}

impl TargetResolver for LocalNameResolver {
    fn resolve(&self, store: &EntityStore, actor: EntityId, spec: &TargetSpec) -> Option<EntityId> {
        let query = spec.as_str();
        let room = store.location_of(actor);

        let candidates: Vec<(EntityId, &EntityName)> = room
            .map(|room| store.contents_of(room))
            .unwrap_or_default()
            .iter()
            .chain(store.contents_of(actor))
            .copied()
            .filter(move |id| *id != actor && store.is_live(*id))
            .filter_map(move |id| store.get(id).map(|entity| (id, entity.name())))
            .collect();

        candidates
            .iter()
            .find(|(_, name)| name.matches(query))
            .or_else(|| candidates.iter().find(|(_, name)| name.starts_with(query)))
            .or_else(|| {
                candidates
                    .iter()
                    .find(|(_, name)| name.has_word_starting_with(query))
            })
            .map(|(id, _)| *id)
    }
}
