//! Cache Module
//!
//! Read-through caching over a TTL-only key-value store.

mod entry;
mod gate;
mod key;
mod redis_store;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use gate::{CacheGate, ResponseEnvelope, ResponseInit, CACHE_TAG_HEADER};
pub use key::{CacheKey, CacheTtl, Resource};
pub use redis_store::RedisStore;
pub use stats::{CacheStats, GateCounters};
pub use store::{KvStore, MemoryStore};
