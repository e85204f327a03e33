use std::fmt;
use std::io;

use thiserror::Error;

use crate::tree::Tree;

/// Failures while streaming a tree to or from its record format
#[derive(Debug, Error)]
pub enum Error {
    /// A node's payload (or key) could not be encoded
    #[error("failed to encode record {position}")]
    Encode {
        position: usize,
        source: serde_json::Error,
    },

    /// The stream held something that is not a record
    #[error("failed to decode record {position}")]
    Decode {
        position: usize,
        source: serde_json::Error,
    },

    #[error("record stream i/o failed")]
    Io(#[from] io::Error),

    /// The reading side went away before every record was written
    #[error("record stream was dropped before the tree was fully written")]
    Cancelled,

    #[error("serializer thread panicked")]
    ProducerPanicked,
}

/// A traversal order name that is neither breadth-first nor depth-first
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown traversal order `{0}`, expected `bfs` or `dfs`")]
pub struct ParseOrderError(pub String);

/// A deserialization that stopped at a malformed record
///
/// Carries everything rebuilt before the failure.
pub struct PartialTree<K, T> {
    pub tree: Tree<K, T>,
    pub error: Error,
}

impl<K, T> PartialTree<K, T> {
    pub fn into_parts(self) -> (Tree<K, T>, Error) {
        (self.tree, self.error)
    }
}

impl<K, T> fmt::Debug for PartialTree<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartialTree")
            .field("nodes", &self.tree.len())
            .field("error", &self.error)
            .finish()
    }
}

impl<K, T> fmt::Display for PartialTree<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after rebuilding {} nodes",
            self.error,
            self.tree.len()
        )
    }
}

impl<K, T> std::error::Error for PartialTree<K, T> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
