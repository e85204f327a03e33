use std::cmp;
use std::io::{self, BufRead, Read, Write};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, warn};
use serde::Serialize;

use crate::error::Error;
use crate::stream::record::RecordRef;
use crate::traverse::TraversalOrder;
use crate::tree::Tree;

/// Number of encoded records that may wait between the serializer thread
/// and the reader
pub const DEFAULT_CAPACITY: usize = 16;

/// Settings for [`serialize_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Order in which records are emitted
    pub order: TraversalOrder,
    /// Records buffered ahead of the reader; `0` hands each record over
    /// directly
    pub capacity: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            order: TraversalOrder::default(),
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SerializeOptions {
    pub fn new(order: TraversalOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Encode every node in `order`, handing each newline-terminated record to
/// `sink`. Stops at the first failure.
fn encode_records<K, T, F>(
    tree: &Tree<K, T>,
    order: TraversalOrder,
    mut sink: F,
) -> Result<usize, Error>
where
    K: Serialize,
    T: Serialize,
    F: FnMut(&[u8]) -> Result<(), Error>,
{
    let mut buffer = Vec::new();
    let mut written = 0;
    for (position, node) in tree.traverse(order).enumerate() {
        buffer.clear();
        serde_json::to_writer(&mut buffer, &RecordRef::from(node))
            .map_err(|source| Error::Encode { position, source })?;
        buffer.push(b'\n');
        sink(&buffer)?;
        written += 1;
    }
    Ok(written)
}

impl<K, T> Tree<K, T>
where
    K: Serialize,
    T: Serialize,
{
    /// Write the tree to `writer` as a stream of records, one per line, in
    /// the given traversal order
    ///
    /// Returns the number of records written.
    pub fn write_records<W: Write>(
        &self,
        order: TraversalOrder,
        mut writer: W,
    ) -> Result<usize, Error> {
        let written = encode_records(self, order, |record| {
            writer.write_all(record).map_err(Error::from)
        })?;
        writer.flush()?;
        Ok(written)
    }
}

/// Stream `tree` as records from a background thread, in `order`
///
/// See [`serialize_with`].
pub fn serialize<K, T>(tree: Arc<Tree<K, T>>, order: TraversalOrder) -> (RecordStream, Completion)
where
    K: Serialize + Send + Sync + 'static,
    T: Serialize + Send + Sync + 'static,
{
    serialize_with(tree, SerializeOptions::new(order))
}

/// Stream `tree` as records from a background thread
///
/// The thread walks the tree and encodes one record at a time into a bounded
/// channel; it blocks while `options.capacity` records are waiting. The
/// returned [`RecordStream`] reads them back as bytes until the walk ends.
/// [`Completion`] reports how the walk ended.
///
/// Dropping the stream early stops the thread at its next record, and the
/// completion then reports [`Error::Cancelled`].
pub fn serialize_with<K, T>(
    tree: Arc<Tree<K, T>>,
    options: SerializeOptions,
) -> (RecordStream, Completion)
where
    K: Serialize + Send + Sync + 'static,
    T: Serialize + Send + Sync + 'static,
{
    let (sender, receiver) = flume::bounded::<Vec<u8>>(options.capacity);

    let handle = thread::spawn(move || {
        let produced = encode_records(&tree, options.order, |record| {
            sender.send(record.to_vec()).map_err(|_| Error::Cancelled)
        });
        match &produced {
            Ok(count) => debug!("serialized {} records {}", count, options.order),
            Err(Error::Cancelled) => debug!("serialization cancelled by the reader"),
            Err(err) => warn!("serialization failed: {}", err),
        }
        produced
    });

    (RecordStream::new(receiver), Completion { handle })
}

/// Byte stream of records produced by [`serialize`]
///
/// Reaches end-of-stream once the producer has finished, successfully or
/// not. Read it to the end before relying on [`Completion::wait`] for a
/// complete result.
pub struct RecordStream {
    records: flume::Receiver<Vec<u8>>,
    current: Vec<u8>,
    offset: usize,
}

impl RecordStream {
    fn new(records: flume::Receiver<Vec<u8>>) -> Self {
        Self {
            records,
            current: Vec::new(),
            offset: 0,
        }
    }

    /// Stop reading; the producer exits at its next record
    pub fn cancel(self) {
        drop(self);
    }
}

impl BufRead for RecordStream {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        while self.offset >= self.current.len() {
            match self.records.recv() {
                Ok(record) => {
                    self.current = record;
                    self.offset = 0;
                }
                // Sender gone: the producer has finished
                Err(flume::RecvError::Disconnected) => return Ok(&[]),
            }
        }
        Ok(&self.current[self.offset..])
    }

    fn consume(&mut self, amt: usize) {
        self.offset = cmp::min(self.offset + amt, self.current.len());
    }
}

impl Read for RecordStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let available = self.fill_buf()?;
        let count = cmp::min(available.len(), buf.len());
        buf[..count].copy_from_slice(&available[..count]);
        self.consume(count);
        Ok(count)
    }
}

/// Outcome of a background serialization
pub struct Completion {
    handle: JoinHandle<Result<usize, Error>>,
}

impl Completion {
    /// Returns true once the producer has stopped, without blocking
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the producer to stop
    ///
    /// Returns the number of records written, or the first error met. The
    /// producer only stops once its records have been read or the stream
    /// has been dropped, so waiting while still holding an undrained stream
    /// blocks.
    pub fn wait(self) -> Result<usize, Error> {
        self.handle.join().unwrap_or(Err(Error::ProducerPanicked))
    }
}
