//! Aggregates - consistency boundaries with private state.
//!
//! Mutations return outcome enums from `crate::events` instead of booleans.

pub mod entity;

pub use entity::{
    Entity, EntityKind, EntityProfile, HitAffordance, DEFAULT_RESPAWN_DELAY_SECS,
    MAX_RESPAWN_DELAY_SECS,
};
