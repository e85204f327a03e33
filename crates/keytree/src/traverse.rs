//! Lazy traversal over a keyed tree

use std::collections::VecDeque;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::str::FromStr;

use derive_more::Display;

use crate::error::ParseOrderError;
use crate::node::{Node, NodeId};
use crate::tree::Tree;

/// Traversal order for walking the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum TraversalOrder {
    /// Visit level by level, siblings in attachment order
    #[default]
    #[display(fmt = "breadth-first")]
    BreadthFirst,
    /// Visit parent before children (pre-order), siblings in attachment order
    #[display(fmt = "depth-first")]
    DepthFirst,
}

impl FromStr for TraversalOrder {
    type Err = ParseOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" | "breadth" => Ok(TraversalOrder::BreadthFirst),
            "dfs" | "depth-first" | "depth" | "pre-order" => Ok(TraversalOrder::DepthFirst),
            _ => Err(ParseOrderError(s.to_string())),
        }
    }
}

/// Iterator over the nodes of a tree in a [`TraversalOrder`]
///
/// Nodes are produced one at a time as they are pulled. A walk is not
/// restartable; ask the tree for a new one to iterate again.
pub struct Traverse<'a, K, T> {
    tree: &'a Tree<K, T>,
    order: TraversalOrder,
    pending: VecDeque<NodeId>,
}

impl<'a, K, T> Traverse<'a, K, T> {
    fn new(tree: &'a Tree<K, T>, start: Option<NodeId>, order: TraversalOrder) -> Self {
        Self {
            tree,
            order,
            pending: start.into_iter().collect(),
        }
    }

    pub fn order(&self) -> TraversalOrder {
        self.order
    }
}

impl<'a, K, T> Iterator for Traverse<'a, K, T> {
    type Item = &'a Node<K, T>;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let node = match self.order {
            TraversalOrder::BreadthFirst => {
                let node = tree.node(self.pending.pop_front()?);
                self.pending.extend(node.children());
                node
            }
            TraversalOrder::DepthFirst => {
                let node = tree.node(self.pending.pop_back()?);
                // Reverse so the first child is on top of the stack
                self.pending.extend(node.children().iter().rev());
                node
            }
        };
        Some(node)
    }
}

impl<K, T> FusedIterator for Traverse<'_, K, T> {}

impl<K, T> Tree<K, T> {
    /// Walk the whole tree from the root in the specified order
    ///
    /// Walking an empty tree yields nothing.
    pub fn traverse(&self, order: TraversalOrder) -> Traverse<'_, K, T> {
        Traverse::new(self, self.root_id(), order)
    }
}

impl<K: Eq + Hash, T> Tree<K, T> {
    /// Walk the subtree below (and including) `id`
    ///
    /// Returns `None` if `id` is not in the tree.
    pub fn traverse_from(&self, id: &K, order: TraversalOrder) -> Option<Traverse<'_, K, T>> {
        let start = self.index().find(id)?;
        Some(Traverse::new(self, Some(start), order))
    }
}
