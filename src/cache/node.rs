//! Node Arena Module
//!
//! Owns every list node in a slot vector. Nodes refer to each other through
//! stable `NodeId` indices instead of references.

use std::ops::{Index, IndexMut};

// == Node Handle ==
/// Stable index of a node inside a [`NodeArena`].
///
/// `NodeId::NIL` is the reserved empty marker: it never addresses a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Sentinel used for the head of an empty ring.
    pub const NIL: NodeId = NodeId(usize::MAX);

    /// Returns true for the empty marker.
    pub fn is_nil(self) -> bool {
        self == Self::NIL
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::NIL
    }
}

// == Node ==
/// One cached entry and its position in the recency ring.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: String,
    pub value: String,
    pub prev: NodeId,
    pub next: NodeId,
}

impl Node {
    /// Creates an unlinked node.
    pub fn new(key: String, value: String) -> Self {
        Self {
            key,
            value,
            prev: NodeId::NIL,
            next: NodeId::NIL,
        }
    }
}

// == Node Arena ==
/// Slot storage for nodes. Freed slots are recycled through a free list so a
/// full cache stops allocating once it has warmed up.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Option<Node>>,
    free: Vec<usize>,
    live: usize,
}

impl NodeArena {
    // == Constructor ==
    /// Creates an arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    // == Insert ==
    /// Stores a node and returns its handle, reusing a freed slot if any.
    pub fn insert(&mut self, node: Node) -> NodeId {
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };
        self.live += 1;
        NodeId(idx)
    }

    // == Remove ==
    /// Takes the node out of its slot and frees the slot.
    ///
    /// Returns None for the sentinel or an already vacant slot.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.live -= 1;
        Some(node)
    }

    /// Non-panicking lookup.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of occupied slots.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {:?}", id),
        }
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node handle {:?}", id),
        }
    }
}
