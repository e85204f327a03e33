//! The keyed tree and its mutation and lookup operations

use std::fmt::Debug;
use std::hash::Hash;

use derive_more::Display;
use log::{debug, trace};

use crate::index::Index;
use crate::node::{Node, NodeId};
use crate::traverse::TraversalOrder;

/// Result of [`Tree::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum AddOutcome {
    /// The node was created and attached
    #[display(fmt = "added")]
    Added,
    /// A node with the same primary key is already in the tree
    #[display(fmt = "key already present")]
    Existed,
    /// The declared parent is not in the tree (yet)
    #[display(fmt = "parent not present")]
    MissingParent,
    /// Attaching the node would make it its own ancestor
    #[display(fmt = "would create a cycle")]
    Cycle,
}

impl AddOutcome {
    /// Returns true if the tree was mutated
    pub fn added(self) -> bool {
        matches!(self, AddOutcome::Added)
    }

    /// Returns true if the key was already present
    pub fn existed(self) -> bool {
        matches!(self, AddOutcome::Existed)
    }

    /// The `(added, existed)` pair
    pub fn as_flags(self) -> (bool, bool) {
        (self.added(), self.existed())
    }
}

/// A mutable tree whose nodes are addressed by a unique primary key
///
/// Nodes live in an arena owned by the tree and refer to each other through
/// [`NodeId`] handles; an [`Index`] maps primary keys to handles.
///
/// The tree can be built out of order in one direction: the root may declare
/// a parent key that is not present yet, and adding a node with that key
/// later makes it the new root (re-rooting). Every other node needs its
/// parent to exist when it is added.
///
/// # Example
///
/// ```
/// use keytree::{TraversalOrder, Tree};
///
/// let mut tree = Tree::new();
/// tree.add(2u32, 1, "child");
/// tree.add(1, 0, "root");
/// tree.add(3, 1, "sibling");
///
/// assert_eq!(tree.ids(TraversalOrder::BreadthFirst), vec![1, 2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Tree<K, T> {
    nodes: Vec<Node<K, T>>,
    root: Option<NodeId>,
    index: Index<K>,
}

impl<K, T> Default for Tree<K, T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            index: Index::default(),
        }
    }
}

impl<K, T> Tree<K, T> {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Count total nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The topmost node, `None` for an empty tree
    ///
    /// The root's declared parent may not be present yet.
    pub fn root(&self) -> Option<&Node<K, T>> {
        self.root.map(|root| &self.nodes[root.get()])
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Get a node by its handle
    ///
    /// Returns `None` if the handle was not issued by this tree.
    pub fn get(&self, handle: NodeId) -> Option<&Node<K, T>> {
        self.nodes.get(handle.get())
    }

    pub fn index(&self) -> &Index<K> {
        &self.index
    }

    pub(crate) fn node(&self, handle: NodeId) -> &Node<K, T> {
        &self.nodes[handle.get()]
    }

    fn push(&mut self, node: Node<K, T>) -> NodeId {
        let handle = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        handle
    }
}

impl<K, T> Tree<K, T>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Add a node under the node whose key is `parent_id`
    ///
    /// * An existing `id` is left untouched ([`AddOutcome::Existed`]).
    /// * Into an empty tree the node becomes the root, whatever `parent_id`
    ///   says.
    /// * If the current root is awaiting `id` as its parent, the new node
    ///   becomes the root and the old root its child. This is refused when
    ///   the new node would in turn await a node already in the tree, the old
    ///   root being the simplest case: every present node ends up below the
    ///   new root, and a root awaiting its own descendant could not be
    ///   rebuilt from its record stream. Like a first root, the new root may
    ///   await its own key.
    /// * Otherwise `parent_id` must already be in the tree, and the node is
    ///   appended as its last child.
    ///
    /// Nothing is mutated unless [`AddOutcome::Added`] is returned, so a
    /// rejected add can be retried once the parent exists.
    pub fn add(&mut self, id: K, parent_id: K, data: T) -> AddOutcome {
        if self.index.contains(&id) {
            debug!("add {:?} rejected: key already present", id);
            return AddOutcome::Existed;
        }

        let Some(root) = self.root else {
            let handle = self.push(Node::new(id.clone(), parent_id, data));
            self.index.insert(id, handle);
            self.root = Some(handle);
            return AddOutcome::Added;
        };

        if self.node(root).parent_id() == &id {
            // Every present key sits below the new root, so awaiting any of
            // them (the old root included) closes a cycle
            if self.index.contains(&parent_id) {
                debug!(
                    "add {:?} rejected: parent {:?} would make it its own ancestor",
                    id, parent_id
                );
                return AddOutcome::Cycle;
            }

            let handle = self.push(Node::new(id.clone(), parent_id, data));
            self.nodes[handle.get()].push_child(root);
            self.nodes[root.get()].set_parent(handle);
            trace!("re-rooted tree at {:?}", id);
            self.index.insert(id, handle);
            self.root = Some(handle);
            return AddOutcome::Added;
        }

        let Some(parent) = self.index.find(&parent_id) else {
            debug!(
                "add {:?} rejected: parent {:?} not present",
                id, parent_id
            );
            return AddOutcome::MissingParent;
        };

        let handle = self.push(Node::new(id.clone(), parent_id, data));
        self.nodes[parent.get()].push_child(handle);
        self.nodes[handle.get()].set_parent(parent);
        self.index.insert(id, handle);
        AddOutcome::Added
    }

    /// Get a node by its primary key
    pub fn find(&self, id: &K) -> Option<&Node<K, T>> {
        self.index.find(id).map(|handle| self.node(handle))
    }

    /// Get mutable access to the payload of a node
    ///
    /// Only the payload can change once a node is in the tree; its keys and
    /// links stay under the tree's control.
    pub fn find_mut(&mut self, id: &K) -> Option<&mut T> {
        let handle = self.index.find(id)?;
        self.nodes.get_mut(handle.get()).map(Node::data_mut)
    }

    /// Replace the payload of a node, returning the previous one
    ///
    /// Returns `None`, and drops `data`, if `id` is not in the tree.
    pub fn set_data(&mut self, id: &K, data: T) -> Option<T> {
        let handle = self.index.find(id)?;
        Some(self.nodes[handle.get()].set_data(data))
    }

    pub fn contains(&self, id: &K) -> bool {
        self.index.contains(id)
    }

    /// Get the attached parent of a node
    ///
    /// Returns `None` for the root and for unknown keys.
    pub fn parent(&self, id: &K) -> Option<&Node<K, T>> {
        let parent = self.find(id)?.parent()?;
        Some(self.node(parent))
    }

    /// Iterate over the children of a node, in attachment order
    ///
    /// Returns `None` if `id` is not in the tree.
    pub fn children(&self, id: &K) -> Option<impl Iterator<Item = &Node<K, T>> + '_> {
        let node = self.find(id)?;
        Some(node.children().iter().map(move |&child| self.node(child)))
    }

    /// Get all ancestors of a node, from its parent up to the root
    ///
    /// Returns an empty vector for the root and `None` if `id` is not in the
    /// tree.
    pub fn find_parents(&self, id: &K) -> Option<Vec<&Node<K, T>>> {
        let mut parents = Vec::new();
        let mut current = self.find(id)?.parent();
        while let Some(handle) = current {
            let parent = self.node(handle);
            parents.push(parent);
            current = parent.parent();
        }
        Some(parents)
    }

    /// Attach `other` below the node its root is awaiting
    ///
    /// `other`'s root must declare a parent key present in this tree, no key
    /// of `other` may already be present here, and `other` may not hold the
    /// key this tree's root is awaiting. These conditions are
    /// checked before anything moves: on failure this tree is unchanged and
    /// `other` is handed back as it was. On success every node of `other`
    /// belongs to this tree, with the old root appended as the last child of
    /// its parent.
    ///
    /// Merging an empty tree succeeds without doing anything.
    pub fn merge(&mut self, other: Tree<K, T>) -> Result<(), Tree<K, T>> {
        let Some(other_root) = other.root else {
            return Ok(());
        };

        let awaited = other.node(other_root).parent_id();
        let Some(anchor) = self.index.find(awaited) else {
            debug!("merge rejected: parent {:?} not present", awaited);
            return Err(other);
        };

        let collision = other
            .traverse(TraversalOrder::BreadthFirst)
            .map(Node::id)
            .find(|id| self.index.contains(id))
            .cloned();
        if let Some(id) = collision {
            debug!("merge rejected: key {:?} present in both trees", id);
            return Err(other);
        }

        // Grafting the key our own root awaits would put it below the root
        let root_awaits = self.root.map(|root| self.node(root).parent_id());
        if let Some(awaited) = root_awaits.filter(|awaited| other.index.contains(awaited)) {
            debug!("merge rejected: key {:?} is awaited by the root", awaited);
            return Err(other);
        }

        let offset = self.nodes.len();
        let moved = other.nodes.len();
        for mut node in other.nodes {
            node.rebase(offset);
            let id = node.id().clone();
            let handle = self.push(node);
            self.index.insert(id, handle);
        }

        let grafted = other_root.offset(offset);
        self.nodes[grafted.get()].set_parent(anchor);
        self.nodes[anchor.get()].push_child(grafted);
        trace!("merged {} nodes below {}", moved, anchor);
        Ok(())
    }

    /// Collect the primary keys in the given traversal order
    pub fn ids(&self, order: TraversalOrder) -> Vec<K> {
        self.traverse(order).map(|node| node.id().clone()).collect()
    }
}
