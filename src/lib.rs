//! ring_lru - A fixed-capacity, thread-safe LRU cache
//!
//! Keys and values are strings. The recency list is a circular ring of
//! arena-allocated nodes addressed by index, kept in step with a hashmap
//! behind one mutex. Ships with an interactive prompt and an HTTP front-end.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repl;

pub use api::AppState;
pub use cache::LruCache;
pub use config::{Config, Frontend};
pub use error::CacheError;
