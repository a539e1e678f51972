//! The minimal ordered key/value capability set every upper layer needs.

use chainidx_types::Result;

/// One `(key, value)` pair yielded by a [`Backend`] iterator.
pub type KvPair = (Box<[u8]>, Box<[u8]>);

/// An ordered byte-keyed key/value store.
///
/// The store is polymorphic over this capability set; one concrete
/// implementation ([`crate::rocks::RocksBackend`]) is provided.
pub trait Backend: Send + Sync {
    /// Fetches the value stored at `key`, or `None` if absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Writes `value` at `key`. Returns only after the write is durable.
    ///
    /// # Errors
    /// Returns [`chainidx_types::Error::ReadOnly`] if the store was opened
    /// read-only.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Removes `key`, if present.
    ///
    /// # Errors
    /// Returns [`chainidx_types::Error::ReadOnly`] if the store was opened
    /// read-only.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// `true` if `key` is present.
    fn has(&self, key: &[u8]) -> Result<bool>;

    /// Returns a forward iterator yielding every `(key, value)` with
    /// `lower <= key < upper`, in ascending byte order.
    ///
    /// The iterator's lifetime must be released on every exit path; the
    /// returned value releases its backend-side snapshot on drop.
    fn new_iterator(&self, lower: &[u8], upper: &[u8]) -> Result<Box<dyn Iterator<Item = Result<KvPair>> + '_>>;

    /// Creates a new atomic batch accumulator.
    fn new_batch(&self) -> Box<dyn Batch + '_>;

    /// `true` if this handle was opened read-only.
    fn is_read_only(&self) -> bool;

    /// Requests a background compaction over the whole keyspace. Best
    /// effort; implementations that have no compaction concept may no-op.
    fn compact(&self) -> Result<()>;
}

/// An accumulator of put/delete operations, committed atomically.
///
/// Operations added to a batch are invisible to readers until
/// [`Batch::commit`] returns successfully. Batches are not safe for
/// concurrent use and are owned by their constructing writer.
pub trait Batch {
    /// Buffers a put. Invisible to readers until `commit`.
    fn put(&mut self, key: &[u8], value: &[u8]);

    /// Buffers a delete. Invisible to readers until `commit`.
    fn delete(&mut self, key: &[u8]);

    /// Number of operations buffered so far.
    fn len(&self) -> usize;

    /// `true` if no operations have been buffered.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all buffered operations without committing them.
    fn reset(&mut self);

    /// Commits every buffered operation atomically and durably. On success,
    /// all writes become visible to readers at once; on failure, persisted
    /// state is left unchanged.
    ///
    /// # Errors
    /// Returns [`chainidx_types::Error::BatchTooLarge`] if the backend
    /// rejects the batch for size, or a wrapped backend error.
    fn commit(self: Box<Self>) -> Result<()>;
}
