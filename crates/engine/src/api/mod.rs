//! API layer - entry points into the world.
//!
//! - `actor` - the serialized world task and the handle callers talk to
//! - `dispatch` - protocol commands in, protocol replies out

pub mod actor;
pub mod dispatch;

pub use actor::{WorldActor, WorldError, WorldHandle, WorldRequest};
pub use dispatch::{dispatch, error_message, notification_message, reply_message};
