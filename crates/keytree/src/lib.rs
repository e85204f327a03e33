//! Keyed Tree Library
//!
//! A mutable tree whose nodes are addressed by a unique primary key, with a
//! streaming record format that round-trips it.
//!
//! # Core Concepts
//!
//! - **Tree**: owns the nodes and a key index; built with [`Tree::add`],
//!   possibly out of order (a root may await its parent), and grown with
//!   [`Tree::merge`]
//! - **Node**: primary key, declared parent key, payload and ordered children
//! - **Traversal**: lazy breadth-first or depth-first walks
//! - **Stream**: records written in traversal order and replayed on read
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use keytree::prelude::*;
//!
//! let mut tree = Tree::new();
//! tree.add(1u32, 0, "a".to_string());
//! tree.add(2, 1, "b".to_string());
//! tree.add(3, 2, "c".to_string());
//!
//! let (stream, completion) = serialize(Arc::new(tree), TraversalOrder::BreadthFirst);
//! let rebuilt: Tree<u32, String> = deserialize(stream).expect("well-formed stream");
//! assert_eq!(completion.wait().expect("all records written"), 3);
//!
//! let parents: Vec<_> = rebuilt.find_parents(&3).unwrap().iter().map(|n| *n.id()).collect();
//! assert_eq!(parents, vec![2, 1]);
//! ```

mod error;
mod index;
mod node;
pub mod stream;
mod traverse;
mod tree;

pub use error::{Error, ParseOrderError, PartialTree};
pub use index::Index;
pub use node::{Node, NodeId};
pub use stream::{
    deserialize, deserialize_report, serialize, serialize_with, Completion, Record, RecordStream,
    Rebuilt, SerializeOptions,
};
pub use traverse::{TraversalOrder, Traverse};
pub use tree::{AddOutcome, Tree};

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::{
        deserialize, serialize, AddOutcome, Node, NodeId, TraversalOrder, Tree,
    };
}
