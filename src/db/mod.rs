pub mod export;
pub mod migrations;
pub mod repository;
pub mod storage;

pub use repository::{KvStore, SqliteStore};
#[cfg(test)]
pub use repository::MemoryStore;
pub use storage::{ImportSummary, PrayerStorage};
