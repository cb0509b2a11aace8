//! Integrity Checking Module
//!
//! Cross-checks the recency ring against the node store. Every public cache
//! operation must leave both structures in a state this check accepts.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::cache::node::NodeId;
use crate::cache::ring::RecencyRing;

// == Integrity Error ==
/// First inconsistency found between the ring and the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("empty store but ring head is set")]
    HeadNotEmpty,

    #[error("store holds {stored} entries but ring head is empty")]
    HeadMissing { stored: usize },

    #[error("cache size {len} exceeds capacity {capacity}")]
    OverCapacity { len: usize, capacity: usize },

    /// A link or store handle points at a vacant slot
    #[error("dangling node handle reached from {from}")]
    DanglingLink { from: String },

    #[error("broken bidirectional link at node {key}")]
    BrokenLink { key: String },

    /// Ring node whose store entry is missing or points elsewhere
    #[error("store does not point at ring node for key {key}")]
    StoreMismatch { key: String },

    #[error("store key {key} resolves to node keyed {found}")]
    KeyMismatch { key: String, found: String },

    #[error("ring walk visited {walked} nodes but store holds {stored}")]
    CycleMismatch { walked: usize, stored: usize },

    #[error("node for key {key} is in the store but not on the ring")]
    Unreachable { key: String },

    #[error("arena holds {live} nodes but store holds {stored}")]
    OrphanedNodes { live: usize, stored: usize },
}

// == Verify ==
/// Walks one lap of the ring from the head and checks every invariant that
/// ties it to the store.
pub fn verify(
    ring: &RecencyRing,
    store: &HashMap<String, NodeId>,
    capacity: usize,
) -> Result<(), IntegrityError> {
    let stored = store.len();

    if stored == 0 {
        if !ring.head().is_nil() {
            return Err(IntegrityError::HeadNotEmpty);
        }
        return check_orphans(ring, stored);
    }

    if stored > capacity {
        return Err(IntegrityError::OverCapacity {
            len: stored,
            capacity,
        });
    }

    let head = ring.head();
    if head.is_nil() {
        return Err(IntegrityError::HeadMissing { stored });
    }

    let mut visited = HashSet::with_capacity(stored);
    let mut cursor = head;
    let mut from = String::from("head");

    while visited.insert(cursor) {
        let node = ring
            .get(cursor)
            .ok_or_else(|| IntegrityError::DanglingLink { from: from.clone() })?;

        let next = ring.get(node.next);
        let prev = ring.get(node.prev);
        let (Some(next), Some(prev)) = (next, prev) else {
            return Err(IntegrityError::DanglingLink {
                from: node.key.clone(),
            });
        };
        if next.prev != cursor || prev.next != cursor {
            return Err(IntegrityError::BrokenLink {
                key: node.key.clone(),
            });
        }

        if store.get(&node.key) != Some(&cursor) {
            return Err(IntegrityError::StoreMismatch {
                key: node.key.clone(),
            });
        }

        if visited.len() > stored {
            return Err(IntegrityError::CycleMismatch {
                walked: visited.len(),
                stored,
            });
        }

        from = node.key.clone();
        cursor = node.next;
    }

    // The walk must close on the head, not on some node inside the lap
    if cursor != head || visited.len() != stored {
        return Err(IntegrityError::CycleMismatch {
            walked: visited.len(),
            stored,
        });
    }

    for (key, &id) in store {
        let node = ring
            .get(id)
            .ok_or_else(|| IntegrityError::DanglingLink { from: key.clone() })?;
        if &node.key != key {
            return Err(IntegrityError::KeyMismatch {
                key: key.clone(),
                found: node.key.clone(),
            });
        }
        if !visited.contains(&id) {
            return Err(IntegrityError::Unreachable { key: key.clone() });
        }
    }

    check_orphans(ring, stored)
}

fn check_orphans(ring: &RecencyRing, stored: usize) -> Result<(), IntegrityError> {
    let live = ring.live_nodes();
    if live != stored {
        return Err(IntegrityError::OrphanedNodes { live, stored });
    }
    Ok(())
}
