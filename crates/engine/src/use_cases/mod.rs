//! Use cases - gameplay rules orchestrated over the world's state.
//!
//! - `progression` - experience awards and level-ups
//! - `combat` - hit and damage resolution
//! - `lifecycle` - death, destruction and timed respawn
//! - `commands` - the inbound command surface built on the above

pub mod combat;
pub mod commands;
pub mod lifecycle;
pub mod progression;

pub use combat::{CombatError, CombatResolver};
pub use commands::{CommandError, GameCommands, HealReport, HitReport, Precondition};
pub use lifecycle::{CharacterRespawn, LifecycleError, LifecycleManager, RespawnFire, RespawnOrder};
pub use progression::{ProgressionEngine, ProgressionError};
