//! Emberhold Protocol - shared types between the engine and a presentation layer
//!
//! This crate contains the wire-level shapes a transport collaborator uses to
//! drive the engine and render what comes back:
//! - Inbound commands (`ClientMessage`, `ClientCommand`)
//! - Outbound replies and notifications (`ServerMessage`)
//! - Read models (`StatsView`, `ObjectView`)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, uuid, serde_json, and thiserror
//! 2. **No business logic** - Pure data types and serialization
//! 3. **No domain IDs** - use raw `uuid::Uuid` in DTOs

pub mod messages;
pub mod responses;

pub use messages::{ClientCommand, ClientMessage, ProtocolError, ServerMessage};
pub use responses::{CommandReply, ErrorKind, ObjectView, StatsView};
