//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Persistence (in-memory map or JSON files on disk)
//! - Notification delivery (channel to a driver, or just the log)
//! - Target resolution (how a typed name becomes an entity id)
//! - Clock (for testing)

mod error;
mod external;
mod repos;
mod testing;
mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::EntityRepo;

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{NotifierPort, TargetResolver};

// =============================================================================
// Testability Ports
// =============================================================================
pub use testing::ClockPort;

// =============================================================================
// Types
// =============================================================================
pub use types::TargetSpec;

// =============================================================================
// Errors
// =============================================================================
pub use error::RepoError;

// =============================================================================
// Mocks (test only)
// =============================================================================
#[cfg(test)]
pub use external::MockNotifierPort;
#[cfg(test)]
pub use repos::MockEntityRepo;
#[cfg(test)]
pub use testing::MockClockPort;
