//! Storage media the manager can sit on top of

mod file;
mod memory;
mod traits;

pub use file::FileBackend;
pub use memory::MemoryBackend;
pub use traits::{ChangeSink, StorageBackend};
