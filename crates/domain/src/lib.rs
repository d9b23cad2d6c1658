//! Emberhold domain model.
//!
//! Pure types and rules: no async, no I/O. The engine crate owns the world
//! state and drives these aggregates.

extern crate self as emberhold_domain;

pub mod aggregates;
pub mod error;
pub mod events;
pub mod ids;
pub mod snapshot;
pub mod value_objects;

pub use aggregates::{
    Entity, EntityKind, EntityProfile, HitAffordance, DEFAULT_RESPAWN_DELAY_SECS,
    MAX_RESPAWN_DELAY_SECS,
};
pub use error::DomainError;
pub use events::{
    DamageOutcome, DeathCause, GameEvent, HealOutcome, HitOutcome, LevelChange, Notification,
};
pub use ids::EntityId;
pub use snapshot::EntitySnapshot;
pub use value_objects::{EntityName, Experience, Health, Level, Placement};
