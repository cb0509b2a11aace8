//! Recency Ring Module
//!
//! Circular doubly-linked list ordered from most recently used (head) to
//! least recently used (tail = `head.prev`). There is no tail field: because
//! the list is circular, the tail is always one step behind the head.
//!
//! These primitives are not synchronized. Callers hold the cache lock.

use std::ops::{Index, IndexMut};

use crate::cache::node::{Node, NodeArena, NodeId};

// == Recency Ring ==
#[derive(Debug, Default)]
pub struct RecencyRing {
    arena: NodeArena,
    head: NodeId,
}

impl RecencyRing {
    // == Constructor ==
    /// Creates an empty ring whose arena is sized for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: NodeArena::with_capacity(capacity),
            head: NodeId::NIL,
        }
    }

    /// Most recently used node, or `NodeId::NIL` when empty.
    pub fn head(&self) -> NodeId {
        self.head
    }

    /// Least recently used node, or `NodeId::NIL` when empty.
    pub fn tail(&self) -> NodeId {
        if self.is_empty() {
            NodeId::NIL
        } else {
            self.arena[self.head].prev
        }
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_nil()
    }

    // == Insert At Head ==
    /// Allocates a node and makes it the new head.
    ///
    /// On an empty ring the node links to itself. Otherwise it is spliced
    /// between the current tail and the current head, which also covers the
    /// single-node ring where both are the same node.
    pub fn insert_at_head(&mut self, key: String, value: String) -> NodeId {
        let id = self.arena.insert(Node::new(key, value));

        if self.head.is_nil() {
            let node = &mut self.arena[id];
            node.next = id;
            node.prev = id;
        } else {
            let head = self.head;
            let tail = self.arena[head].prev;

            let node = &mut self.arena[id];
            node.next = head;
            node.prev = tail;

            self.arena[tail].next = id;
            self.arena[head].prev = id;
        }

        self.head = id;
        id
    }

    // == Insert At Tail ==
    /// Allocates a node and makes it the new tail.
    ///
    /// Inserting at the head and then stepping the head forward leaves the new
    /// node directly behind the head, which is the tail position.
    pub fn insert_at_tail(&mut self, key: String, value: String) -> NodeId {
        let id = self.insert_at_head(key, value);
        self.head = self.arena[self.head].next;
        id
    }

    // == Remove ==
    /// Unlinks a node, frees its slot and hands the node back.
    ///
    /// # Panics
    /// If `id` does not address a live node.
    pub fn remove(&mut self, id: NodeId) -> Node {
        let (prev, next) = {
            let node = &self.arena[id];
            (node.prev, node.next)
        };

        if next == id {
            self.head = NodeId::NIL;
        } else {
            if id == self.head {
                self.head = next;
            }
            self.arena[prev].next = next;
            self.arena[next].prev = prev;
        }

        match self.arena.remove(id) {
            Some(node) => node,
            None => unreachable!("node {:?} vanished while unlinking", id),
        }
    }

    /// Non-panicking lookup used by the integrity checker.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    #[cfg(test)]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.arena.get_mut(id)
    }

    /// Number of nodes owned by the arena.
    pub fn live_nodes(&self) -> usize {
        self.arena.live()
    }

    // == Iter ==
    /// Walks from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            ring: self,
            cursor: self.head,
            remaining: self.arena.live(),
        }
    }
}

impl Index<NodeId> for RecencyRing {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }
}

impl IndexMut<NodeId> for RecencyRing {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.arena[id]
    }
}

// == Iterator ==
/// Head-to-tail iterator; stops after one lap.
pub struct Iter<'a> {
    ring: &'a RecencyRing,
    cursor: NodeId,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 || self.cursor.is_nil() {
            return None;
        }
        let node = self.ring.get(self.cursor)?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(node)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn keys(ring: &RecencyRing) -> Vec<&str> {
        ring.iter().map(|n| n.key.as_str()).collect()
    }

    fn push_tail(ring: &mut RecencyRing, key: &str) -> NodeId {
        ring.insert_at_tail(key.to_string(), key.to_uppercase())
    }

    fn push_head(ring: &mut RecencyRing, key: &str) -> NodeId {
        ring.insert_at_head(key.to_string(), key.to_uppercase())
    }

    /// Asserts both link directions agree for every node on one lap.
    fn assert_linked(ring: &RecencyRing) {
        for node in ring.iter() {
            let next = &ring[node.next];
            let prev = &ring[node.prev];
            assert_eq!(ring[next.prev].key, node.key);
            assert_eq!(ring[prev.next].key, node.key);
        }
    }

    #[test]
    fn test_ring_new_is_empty() {
        let ring = RecencyRing::with_capacity(4);
        assert!(ring.is_empty());
        assert!(ring.head().is_nil());
        assert!(ring.tail().is_nil());
        assert_eq!(ring.iter().count(), 0);
    }

    #[test]
    fn test_single_node_links_to_itself() {
        let mut ring = RecencyRing::default();
        let a = push_head(&mut ring, "a");

        assert_eq!(ring.head(), a);
        assert_eq!(ring.tail(), a);
        assert_eq!(ring[a].next, a);
        assert_eq!(ring[a].prev, a);
    }

    #[test]
    fn test_insert_at_head_order() {
        let mut ring = RecencyRing::default();
        push_head(&mut ring, "a");
        push_head(&mut ring, "b");
        push_head(&mut ring, "c");

        assert_eq!(keys(&ring), vec!["c", "b", "a"]);
        assert_eq!(ring[ring.tail()].key, "a");
        assert_linked(&ring);
    }

    #[test]
    fn test_insert_at_tail_order() {
        let mut ring = RecencyRing::default();
        push_tail(&mut ring, "a");
        push_tail(&mut ring, "b");
        push_tail(&mut ring, "c");

        // First insert stays at the head; each later one lands behind it
        assert_eq!(keys(&ring), vec!["a", "b", "c"]);
        assert_eq!(ring[ring.head()].key, "a");
        assert_eq!(ring[ring.tail()].key, "c");
        assert_linked(&ring);
    }

    #[test]
    fn test_insert_at_tail_into_empty() {
        let mut ring = RecencyRing::default();
        let a = push_tail(&mut ring, "a");

        // Stepping forward on a one-node ring lands on the same node
        assert_eq!(ring.head(), a);
        assert_eq!(ring.tail(), a);
    }

    #[test]
    fn test_remove_only_node_empties_ring() {
        let mut ring = RecencyRing::default();
        let a = push_head(&mut ring, "a");

        let node = ring.remove(a);
        assert_eq!(node.key, "a");
        assert!(ring.is_empty());
        assert_eq!(ring.live_nodes(), 0);
    }

    #[test]
    fn test_remove_head_advances_head() {
        let mut ring = RecencyRing::default();
        let a = push_tail(&mut ring, "a");
        push_tail(&mut ring, "b");
        push_tail(&mut ring, "c");

        ring.remove(a);
        assert_eq!(keys(&ring), vec!["b", "c"]);
        assert_eq!(ring[ring.tail()].key, "c");
        assert_linked(&ring);
    }

    #[test]
    fn test_remove_tail() {
        let mut ring = RecencyRing::default();
        push_tail(&mut ring, "a");
        push_tail(&mut ring, "b");
        let c = push_tail(&mut ring, "c");

        assert_eq!(ring.tail(), c);
        ring.remove(c);
        assert_eq!(keys(&ring), vec!["a", "b"]);
        assert_eq!(ring[ring.tail()].key, "b");
        assert_linked(&ring);
    }

    #[test]
    fn test_remove_middle() {
        let mut ring = RecencyRing::default();
        push_tail(&mut ring, "a");
        let b = push_tail(&mut ring, "b");
        push_tail(&mut ring, "c");

        ring.remove(b);
        assert_eq!(keys(&ring), vec!["a", "c"]);
        assert_linked(&ring);
    }

    #[test]
    fn test_two_node_ring_remove_either() {
        let mut ring = RecencyRing::default();
        let a = push_tail(&mut ring, "a");
        let b = push_tail(&mut ring, "b");

        ring.remove(b);
        assert_eq!(ring.head(), a);
        assert_eq!(ring[a].next, a);
        assert_eq!(ring[a].prev, a);

        let b = push_head(&mut ring, "b");
        ring.remove(a);
        assert_eq!(ring.head(), b);
        assert_eq!(ring[b].next, b);
        assert_eq!(ring[b].prev, b);
    }

    #[test]
    fn test_move_to_front_by_remove_and_reinsert() {
        let mut ring = RecencyRing::default();
        push_tail(&mut ring, "a");
        push_tail(&mut ring, "b");
        let c = push_tail(&mut ring, "c");

        let node = ring.remove(c);
        ring.insert_at_head(node.key, node.value);

        assert_eq!(keys(&ring), vec!["c", "a", "b"]);
        assert_eq!(ring.live_nodes(), 3);
        assert_linked(&ring);
    }
}
