use serde::{Deserialize, Serialize};

use crate::node::Node;

/// One serialized node: its key, the key of its parent and its payload
///
/// Parent and child links are not part of a record; they are rebuilt by
/// replaying records through [`Tree::add`](crate::Tree::add).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record<K, T> {
    pub id: K,
    #[serde(rename = "parentID")]
    pub parent_id: K,
    pub data: T,
}

/// Borrowed form of [`Record`], encoded straight from a node
#[derive(Debug, Serialize)]
pub(crate) struct RecordRef<'a, K, T> {
    id: &'a K,
    #[serde(rename = "parentID")]
    parent_id: &'a K,
    data: &'a T,
}

impl<'a, K, T> From<&'a Node<K, T>> for RecordRef<'a, K, T> {
    fn from(node: &'a Node<K, T>) -> Self {
        Self {
            id: node.id(),
            parent_id: node.parent_id(),
            data: node.data(),
        }
    }
}
