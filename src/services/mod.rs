//! Services around the engine: persistence and export

pub mod export;
pub mod storage;

pub use export::{export_and_clear, LogDocument};
pub use storage::{JsonFileStorage, LogStorage, MemoryStorage};
