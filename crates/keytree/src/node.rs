//! Arena node types for the keyed tree

use std::fmt;
use std::mem;

/// Handle to a node stored in a [`Tree`](crate::Tree) arena
///
/// Handles are stable for the lifetime of the tree that issued them and are
/// meaningless for any other tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Get the arena slot this handle points at
    pub const fn get(self) -> usize {
        self.0
    }

    /// Shift a handle when its arena is appended behind `by` existing slots
    pub(crate) const fn offset(self, by: usize) -> Self {
        NodeId(self.0 + by)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// A single entry of a [`Tree`](crate::Tree)
///
/// A node is created with the key of the parent it expects (`parent_id`).
/// The back-reference to that parent (`parent`) is only set once the parent
/// is actually part of the tree; until then the node is the root, awaiting
/// its parent.
///
/// Only the id, the parent id and the payload are carried by the record
/// stream. Parent and child links are rebuilt on deserialization.
#[derive(Debug, Clone)]
pub struct Node<K, T> {
    id: K,
    parent_id: K,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: T,
}

impl<K, T> Node<K, T> {
    pub(crate) fn new(id: K, parent_id: K, data: T) -> Self {
        Self {
            id,
            parent_id,
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    /// The primary key of this node
    pub fn id(&self) -> &K {
        &self.id
    }

    /// The primary key this node expects its parent to have
    pub fn parent_id(&self) -> &K {
        &self.parent_id
    }

    /// Handle of the attached parent, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Handles of the children, in attachment order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Replace the payload, returning the previous one
    ///
    /// Encodability of the new payload is not checked here; an unencodable
    /// payload only fails once the tree is serialized.
    pub fn set_data(&mut self, data: T) -> T {
        mem::replace(&mut self.data, data)
    }

    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns true if no parent is attached to this node
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    /// Rewrite every handle held by this node after an arena append
    pub(crate) fn rebase(&mut self, by: usize) {
        self.parent = self.parent.map(|parent| parent.offset(by));
        for child in &mut self.children {
            *child = child.offset(by);
        }
    }
}

impl<K: fmt::Display, T: fmt::Display> fmt::Display for Node<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (parent {}) - {}", self.id, self.parent_id, self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        assert_eq!(NodeId::new(5).get(), 5);
        assert_eq!(usize::from(NodeId::new(7)), 7);
        assert_eq!(NodeId::new(3).offset(4), NodeId::new(7));
        assert_eq!(NodeId::new(2).to_string(), "NodeId(2)");
    }

    #[test]
    fn test_new_node() {
        let node = Node::new(1u32, 0u32, "payload");
        assert_eq!(*node.id(), 1);
        assert_eq!(*node.parent_id(), 0);
        assert_eq!(node.parent(), None);
        assert!(node.children().is_empty());
        assert!(node.is_root());
        assert!(node.is_leaf());
        assert_eq!(*node.data(), "payload");
    }

    #[test]
    fn test_children_keep_order() {
        let mut node = Node::new(1u32, 0u32, ());
        node.push_child(NodeId::new(4));
        node.push_child(NodeId::new(2));
        node.push_child(NodeId::new(9));
        assert_eq!(
            node.children(),
            &[NodeId::new(4), NodeId::new(2), NodeId::new(9)]
        );
        assert!(!node.is_leaf());
    }

    #[test]
    fn test_set_parent() {
        let mut node = Node::new(2u32, 1u32, ());
        node.set_parent(NodeId::new(0));
        assert_eq!(node.parent(), Some(NodeId::new(0)));
        assert!(!node.is_root());
    }

    #[test]
    fn test_set_data() {
        let mut node = Node::new(1u32, 0u32, 10);
        assert_eq!(node.set_data(20), 10);
        *node.data_mut() += 1;
        assert_eq!(node.into_data(), 21);
    }

    #[test]
    fn test_rebase() {
        let mut node = Node::new(1u32, 0u32, ());
        node.set_parent(NodeId::new(1));
        node.push_child(NodeId::new(2));
        node.push_child(NodeId::new(3));
        node.rebase(10);
        assert_eq!(node.parent(), Some(NodeId::new(11)));
        assert_eq!(node.children(), &[NodeId::new(12), NodeId::new(13)]);
    }

    #[test]
    fn test_display() {
        let node = Node::new(3u32, 2u32, "leaf");
        assert_eq!(node.to_string(), "3 (parent 2) - leaf");
    }
}
