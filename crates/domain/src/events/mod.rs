//! Domain Events
//!
//! Notification payloads emitted by the engine when observable state changes.
//! They leave the core one-way through the notifier port; the presentation
//! layer decides how to render them.
//!
//! ## Mutation Outcomes
//!
//! The `entity_events` and `combat_events` submodules contain return types
//! from entity mutations, communicating what happened when state was modified.

pub mod combat_events;
pub mod entity_events;

pub use combat_events::*;
pub use entity_events::*;

use serde::{Deserialize, Serialize};

use crate::EntityId;

/// Why a character died
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DeathCause {
    /// Leapt into a pit
    #[serde(rename_all = "camelCase")]
    Pit {
        pit: EntityId,
        pit_name: String,
        victims: u64,
        milestone: bool,
    },
    /// Took lethal damage
    Damage,
    /// Killed themselves
    SelfInflicted,
}

/// Notification payload for significant state changes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    #[serde(rename_all = "camelCase")]
    HitLanded {
        attacker: EntityId,
        attacker_name: String,
        target: EntityId,
        target_name: String,
        damage: u32,
        remaining_health: Option<u32>,
        hits: u64,
        milestone: bool,
    },
    #[serde(rename_all = "camelCase")]
    ExperienceGained {
        character: EntityId,
        amount: u64,
        total: u64,
    },
    #[serde(rename_all = "camelCase")]
    LevelUp {
        character: EntityId,
        level: u32,
        max_health: u32,
        max_health_delta: u32,
    },
    #[serde(rename_all = "camelCase")]
    Healed {
        character: EntityId,
        amount: u32,
        health: u32,
        max_health: u32,
    },
    #[serde(rename_all = "camelCase")]
    Died {
        character: EntityId,
        name: String,
        cause: DeathCause,
    },
    #[serde(rename_all = "camelCase")]
    Respawned {
        character: EntityId,
        name: String,
        location: Option<EntityId>,
        health: u32,
    },
    #[serde(rename_all = "camelCase")]
    ObjectDestroyed {
        object: EntityId,
        name: String,
        destroyer: Option<EntityId>,
        respawn_in_secs: u64,
    },
    #[serde(rename_all = "camelCase")]
    ObjectRespawned {
        object: EntityId,
        name: String,
        location: EntityId,
    },
}

impl GameEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::HitLanded { .. } => "hit_landed",
            Self::ExperienceGained { .. } => "experience_gained",
            Self::LevelUp { .. } => "level_up",
            Self::Healed { .. } => "healed",
            Self::Died { .. } => "died",
            Self::Respawned { .. } => "respawned",
            Self::ObjectDestroyed { .. } => "object_destroyed",
            Self::ObjectRespawned { .. } => "object_respawned",
        }
    }
}

/// An event addressed to one entity.
///
/// The recipient is either the acting entity or a room; a room recipient
/// means "everyone in here" and the presentation layer fans it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub recipient: EntityId,
    pub event: GameEvent,
}

impl Notification {
    pub fn new(recipient: EntityId, event: GameEvent) -> Self {
        Self { recipient, event }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = GameEvent::ExperienceGained {
            character: EntityId::new(),
            amount: 1,
            total: 42,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "experienceGained");
        assert_eq!(json["total"], 42);
        assert_eq!(event.event_type(), "experience_gained");
    }

    #[test]
    fn death_cause_round_trips() {
        let cause = DeathCause::Pit {
            pit: EntityId::new(),
            pit_name: "Bottomless Pit".into(),
            victims: 5,
            milestone: true,
        };
        let json = serde_json::to_string(&cause).unwrap();
        let back: DeathCause = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cause);
    }
}
