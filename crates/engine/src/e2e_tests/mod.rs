//! Engine scenario tests.
//!
//! These drive the command surface and the world actor the way a driver
//! would, checking gameplay properties end to end:
//! - progression (level formula, multi-level awards)
//! - combat (training and destructible targets)
//! - lifecycle (death, destruction, timed respawn)
//! - a full session through the world actor under paused time
//!
//! # Running
//!
//! ```bash
//! cargo test -p emberhold-engine --lib e2e_tests
//! ```

mod e2e_helpers;
mod lifecycle_tests;
mod progression_tests;
mod session_tests;

pub use e2e_helpers::*;
