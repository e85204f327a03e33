use std::fmt::Debug;
use std::hash::Hash;
use std::io::Read;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::error::{Error, PartialTree};
use crate::stream::record::Record;
use crate::tree::Tree;

/// A tree rebuilt from a record stream, with replay statistics
#[derive(Debug)]
pub struct Rebuilt<K, T> {
    pub tree: Tree<K, T>,
    /// Records decoded from the stream
    pub records: usize,
    /// Records decoded but refused by [`Tree::add`]
    pub skipped: usize,
}

/// Rebuild a tree from a record stream
///
/// Records are decoded one at a time and replayed through [`Tree::add`] on a
/// fresh tree, so the stream must list parents before their children, as
/// [`Tree::write_records`] and [`serialize`](crate::serialize) do. The first
/// record always becomes the root.
///
/// A malformed record stops the rebuild; the error carries the partially
/// rebuilt tree.
pub fn deserialize<K, T, R>(reader: R) -> Result<Tree<K, T>, PartialTree<K, T>>
where
    K: DeserializeOwned + Eq + Hash + Clone + Debug,
    T: DeserializeOwned,
    R: Read,
{
    deserialize_report(reader).map(|rebuilt| rebuilt.tree)
}

/// Like [`deserialize`], also counting the records the tree refused
///
/// A refused record (duplicate key, parent not yet present) is not an error:
/// it is logged and skipped.
pub fn deserialize_report<K, T, R>(reader: R) -> Result<Rebuilt<K, T>, PartialTree<K, T>>
where
    K: DeserializeOwned + Eq + Hash + Clone + Debug,
    T: DeserializeOwned,
    R: Read,
{
    let mut tree = Tree::new();
    let mut records = 0;
    let mut skipped = 0;

    let stream = serde_json::Deserializer::from_reader(reader).into_iter::<Record<K, T>>();
    for (position, record) in stream.enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(source) => {
                let error = if source.is_io() {
                    Error::Io(source.into())
                } else {
                    Error::Decode { position, source }
                };
                warn!("stopped rebuilding at record {}: {}", position, error);
                return Err(PartialTree { tree, error });
            }
        };
        records += 1;

        let id = record.id.clone();
        let outcome = tree.add(record.id, record.parent_id, record.data);
        if !outcome.added() {
            warn!("skipped record {} ({:?}): {}", position, id, outcome);
            skipped += 1;
        }
    }

    debug!("rebuilt {} nodes from {} records", tree.len(), records);
    Ok(Rebuilt {
        tree,
        records,
        skipped,
    })
}
