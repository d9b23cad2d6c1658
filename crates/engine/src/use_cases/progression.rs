//! Progression engine.
//!
//! Experience awards and the level-up step that may follow one.

use emberhold_domain::{DomainError, EntityId, Experience, GameEvent, LevelChange};

use crate::stores::{EntityStore, Outbox};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    #[error("Character not found: {0}")]
    NotFound(EntityId),
    #[error("Entity {0} cannot gain experience")]
    NotACharacter(EntityId),
    #[error("Experience award must be positive")]
    InvalidAmount,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressionEngine;

impl ProgressionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Add `amount` experience to a character.
    ///
    /// Emits `ExperienceGained`, plus `LevelUp` when the award crosses one or
    /// more level thresholds (applied once, from the final level).
    pub fn grant_experience(
        &self,
        store: &mut EntityStore,
        outbox: &mut Outbox,
        character_id: EntityId,
        amount: u64,
    ) -> Result<LevelChange, ProgressionError> {
        if amount == 0 {
            return Err(ProgressionError::InvalidAmount);
        }
        let character = store
            .get_mut(character_id)
            .ok_or(ProgressionError::NotFound(character_id))?;

        let change = character
            .gain_experience(amount)
            .map_err(|e| match e {
                DomainError::Validation(_) => ProgressionError::InvalidAmount,
                _ => ProgressionError::NotACharacter(character_id),
            })?;
        let total = character.experience().map_or(0, Experience::points);

        tracing::debug!(entity_id = %character_id, amount, total, "Experience granted");
        outbox.notify(
            character_id,
            GameEvent::ExperienceGained {
                character: character_id,
                amount,
                total,
            },
        );

        if let LevelChange::LeveledUp {
            from,
            to,
            max_health,
            max_health_delta,
        } = change
        {
            tracing::info!(
                entity_id = %character_id,
                from = from.get(),
                to = to.get(),
                max_health,
                "Character leveled up"
            );
            outbox.notify(
                character_id,
                GameEvent::LevelUp {
                    character: character_id,
                    level: to.get(),
                    max_health,
                    max_health_delta,
                },
            );
        }

        outbox.touch(character_id);
        Ok(change)
    }
}
