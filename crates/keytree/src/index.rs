//! Primary key lookup for tree nodes

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use log::warn;

use crate::node::NodeId;

/// Maps primary keys to node handles
///
/// The index answers existence and lookup questions only. It never checks
/// tree structure; keeping it in lock-step with the node graph is the job of
/// the owning [`Tree`](crate::Tree).
#[derive(Debug, Clone)]
pub struct Index<K> {
    entries: HashMap<K, NodeId>,
}

impl<K> Default for Index<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K> Index<K> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the indexed keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.entries.keys()
    }
}

impl<K: Eq + Hash> Index<K> {
    /// Look up the handle stored for `key`
    pub fn find(&self, key: &K) -> Option<NodeId> {
        self.entries.get(key).copied()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `node` under `key`
    ///
    /// Always succeeds. The tree checks for duplicates before inserting, so a
    /// displaced handle means the caller skipped that check; it is logged and
    /// handed back.
    pub(crate) fn insert(&mut self, key: K, node: NodeId) -> Option<NodeId>
    where
        K: Debug,
    {
        if let Some(previous) = self.find(&key) {
            warn!(
                "index entry for {:?} replaced: {} now points at {}",
                key, previous, node
            );
        }
        self.entries.insert(key, node)
    }
}
