pub mod error;
pub mod memory;

pub use error::DatabaseError;
pub use memory::{MemoryTable, RecordId};
