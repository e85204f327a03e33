//! Record stream encoding of a tree
//!
//! A tree is written as newline-separated JSON objects, one per node, in a
//! traversal order:
//!
//! ```text
//! {"id":1,"parentID":0,"data":"a"}
//! {"id":2,"parentID":1,"data":"b"}
//! ```
//!
//! There is no enclosing array and no header; the reader must use the same
//! key and payload types as the writer.

mod deserialize;
mod record;
mod serialize;

pub use deserialize::{deserialize, deserialize_report, Rebuilt};
pub use record::Record;
pub use serialize::{
    serialize, serialize_with, Completion, RecordStream, SerializeOptions, DEFAULT_CAPACITY,
};
