//! Cache Module
//!
//! In-memory string cache with least-recently-used eviction.
//!
//! Nodes live in an arena and are chained into a circular doubly-linked
//! ring by index. A hashmap maps each key to its node's index. Both sit
//! behind a single mutex in [`LruCache`].

mod integrity;
mod lru;
mod node;
mod ring;
mod stats;


// Re-export public types
pub use integrity::IntegrityError;
pub use lru::LruCache;
pub use stats::CacheStats;
