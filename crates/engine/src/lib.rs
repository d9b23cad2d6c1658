//! Emberhold Engine library.
//!
//! Authoritative game state for a text-based multiplayer world: who is
//! where, who has how much health and experience, what happens when
//! something is hit, and when destroyed things come back.
//!
//! ## Structure
//!
//! - `stores/` - entity store, scheduler and outbox (plain synchronous state)
//! - `use_cases/` - combat, progression, lifecycle and the command surface
//! - `world` - everything the mutation loop owns
//! - `infrastructure/` - ports plus adapters (persistence, notifier, resolver, clock)
//! - `api/` - the world actor and protocol dispatch
//! - `app` - application composition

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod seed;
pub mod stores;
pub mod use_cases;
pub mod world;

/// Scenario tests driving the whole engine.
#[cfg(test)]
mod e2e_tests;

pub use app::App;
pub use config::EngineConfig;
pub use world::World;
