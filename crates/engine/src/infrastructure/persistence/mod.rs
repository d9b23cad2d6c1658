//! Persistence adapters for `EntityRepo`.
//!
//! - `InMemoryEntityRepo` - process-local, used when no data directory is set
//! - `JsonFileEntityRepo` - one `<id>.json` file per entity
//! - `PersistenceWriter` - background task applying writes in order

mod json_file;
mod memory;
mod writer;

pub use json_file::JsonFileEntityRepo;
pub use memory::InMemoryEntityRepo;
pub use writer::{PersistOp, PersistenceWriter};
