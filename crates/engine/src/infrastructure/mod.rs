//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod notifier;
pub mod persistence;
pub mod ports;
pub mod resolver;
