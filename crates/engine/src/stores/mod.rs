//! In-memory state owned by the world.
//!
//! - `EntityStore` - entities, placements and the contents index
//! - `Scheduler` - deferred one-shot timers keyed by owner
//! - `Outbox` - notifications and dirty ids waiting to be flushed

pub mod entity_store;
pub mod outbox;
pub mod scheduler;

pub use entity_store::{EntityStore, StoreError};
pub use outbox::{Outbox, OutboxBatch};
pub use scheduler::{FiredTimer, Scheduler, TimerHandle};
