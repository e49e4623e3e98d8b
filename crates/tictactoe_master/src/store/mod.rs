//! Persistence for game statistics.

mod error;
mod kv;
mod stats;

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use stats::{STATS_KEY, Stats, StatsRepository};
