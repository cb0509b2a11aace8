//! LRU Cache Module
//!
//! Thread-safe facade over the recency ring and the node store.
//!
//! One mutex guards the ring, the store and the counters together. Every
//! public operation takes it first, so each call is atomic with respect to
//! every other call on the same cache.

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::integrity::{self, IntegrityError};
use crate::cache::node::NodeId;
use crate::cache::ring::RecencyRing;
use crate::cache::CacheStats;
use crate::error::{CacheError, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand.
const PREALLOCATE_LIMIT: usize = 1024;

// == Cache State ==
/// Everything behind the lock.
#[derive(Debug)]
struct CacheState {
    /// Owns the nodes, ordered MRU to LRU
    ring: RecencyRing,
    /// Key to node handle
    store: HashMap<String, NodeId>,
    stats: CacheStats,
}

// == LRU Cache ==
/// Fixed-capacity string cache with least-recently-used eviction.
///
/// `get` promotes the entry to most recently used. `set` on an existing key
/// overwrites the value but leaves its position alone, so an update does not
/// postpone eviction.
///
/// ```
/// use ring_lru::cache::LruCache;
///
/// let cache = LruCache::new(2).unwrap();
/// cache.set("a", "1");
/// cache.set("b", "2");
/// cache.get("a");
/// cache.set("c", "3");
///
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.get("a").as_deref(), Some("1"));
/// ```
#[derive(Debug)]
pub struct LruCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl LruCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Errors
    /// `CacheError::InvalidCapacity` when `capacity` is 0.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(0));
        }

        let reserve = capacity.min(PREALLOCATE_LIMIT);
        debug!(capacity, "cache created");

        Ok(Self {
            capacity,
            state: Mutex::new(CacheState {
                ring: RecencyRing::with_capacity(reserve),
                store: HashMap::with_capacity(reserve),
                stats: CacheStats::new(),
            }),
        })
    }

    /// Creates a cache from a signed capacity as typed by a user.
    ///
    /// Zero and negative requests are rejected with the requested value.
    pub fn with_requested_capacity(requested: i64) -> Result<Self> {
        match usize::try_from(requested) {
            Ok(capacity) if capacity > 0 => Self::new(capacity),
            _ => Err(CacheError::InvalidCapacity(requested)),
        }
    }

    /// Creates a cache pre-filled from entries listed most recently used
    /// first, such as the output of [`LruCache::entries_by_recency`].
    ///
    /// New keys past `capacity` are skipped. A repeated key keeps its first
    /// position and takes the later value, the same as `set` on an existing
    /// key.
    pub fn from_entries<K, V, I>(capacity: usize, entries: I) -> Result<Self>
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let cache = Self::new(capacity)?;
        {
            let mut guard = cache.state.lock();
            let state = &mut *guard;

            for (key, value) in entries {
                let key = key.into();
                if let Some(&id) = state.store.get(&key) {
                    state.ring[id].value = value.into();
                    continue;
                }
                if state.store.len() == capacity {
                    continue;
                }
                let id = state.ring.insert_at_tail(key.clone(), value.into());
                state.store.insert(key, id);
            }
        }
        Ok(cache)
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    ///
    /// The node is unlinked and an equivalent node is inserted at the head;
    /// the store is repointed at the new node.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        let Some(&id) = state.store.get(key) else {
            state.stats.record_miss();
            return None;
        };

        let node = state.ring.remove(id);
        let value = node.value.clone();
        let promoted = state.ring.insert_at_head(node.key, node.value);
        if let Some(handle) = state.store.get_mut(key) {
            *handle = promoted;
        }

        state.stats.record_hit();
        Some(value)
    }

    // == Set ==
    /// Stores `value` under `key`. Returns true when the key already existed.
    ///
    /// An existing key is updated in place without changing its recency. A
    /// new key evicts the least recently used entry if the cache is full and
    /// then enters as the most recently used one.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();

        let mut guard = self.state.lock();
        let state = &mut *guard;

        if let Some(&id) = state.store.get(&key) {
            state.ring[id].value = value;
            return true;
        }

        if state.store.len() >= self.capacity {
            let tail = state.ring.tail();
            let evicted = state.ring.remove(tail);
            state.store.remove(&evicted.key);
            state.stats.record_eviction();
            debug!(key = %evicted.key, "evicted least recently used entry");
        }

        let id = state.ring.insert_at_head(key.clone(), value);
        state.store.insert(key, id);
        false
    }

    // == Delete ==
    /// Removes `key`. Returns false if it was not present.
    pub fn delete(&self, key: &str) -> bool {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        match state.store.remove(key) {
            Some(id) => {
                state.ring.remove(id);
                true
            }
            None => false,
        }
    }

    // == Accessors ==
    /// Maximum number of entries, fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current number of entries; never exceeds `capacity()`.
    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().store.is_empty()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.lock();
        let mut stats = state.stats.clone();
        stats.total_entries = state.store.len();
        stats
    }

    /// Keys from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        let state = self.state.lock();
        state.ring.iter().map(|node| node.key.clone()).collect()
    }

    /// Key/value pairs from most to least recently used.
    pub fn entries_by_recency(&self) -> Vec<(String, String)> {
        let state = self.state.lock();
        state
            .ring
            .iter()
            .map(|node| (node.key.clone(), node.value.clone()))
            .collect()
    }

    // == Integrity ==
    /// Verifies that the ring and the store agree.
    pub fn check_integrity(&self) -> std::result::Result<(), IntegrityError> {
        let state = self.state.lock();
        integrity::verify(&state.ring, &state.store, self.capacity)
    }
}
