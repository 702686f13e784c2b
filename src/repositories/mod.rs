pub mod coordinate_log;
pub mod event_store;

pub use coordinate_log::CoordinateLog;
pub use event_store::{EventStore, JsonFileStore, MemoryStore};
