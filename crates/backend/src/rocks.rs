//! RocksDB-backed implementation of [`crate::traits::Backend`].

use chainidx_types::{Error, Result};
use rocksdb::{DB, IteratorMode, Options, WriteBatch, WriteOptions};

use crate::config::BackendConfig;
use crate::traits::{Backend, Batch, KvPair};

/// Upper bound sentinel appended to an inclusive key prefix to form a
/// half-open `[lower, upper)` scan range, per the key schema's convention.
pub const UPPER_BOUND_SENTINEL: u8 = 0xff;

/// Appends [`UPPER_BOUND_SENTINEL`] to `prefix`, forming the exclusive
/// upper bound for a prefix scan.
#[must_use]
pub fn prefix_upper_bound(prefix: &[u8]) -> Vec<u8> {
    let mut upper = prefix.to_vec();
    upper.push(UPPER_BOUND_SENTINEL);
    upper
}

/// A RocksDB-backed [`Backend`].
pub struct RocksBackend {
    db: DB,
    read_only: bool,
    disable_wal: bool,
}

impl RocksBackend {
    /// Opens (creating if absent) a RocksDB database at `config.path`.
    ///
    /// # Errors
    /// Returns a wrapped backend error if RocksDB fails to open the store.
    pub fn open(config: &BackendConfig) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_max_open_files(config.max_open_files);
        opts.set_write_buffer_size(config.write_buffer_mb * 1024 * 1024);
        opts.increase_parallelism(config.compaction_concurrency);
        opts.set_max_background_jobs(config.compaction_concurrency);

        let block_cache = rocksdb::Cache::new_lru_cache(config.cache_mb * 1024 * 1024);
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_block_cache(&block_cache);
        opts.set_block_based_table_factory(&block_opts);

        let db = if config.read_only {
            DB::open_for_read_only(&opts, &config.path, false)
        } else {
            DB::open(&opts, &config.path)
        }
        .map_err(|err| Error::backend("open", err))?;

        Ok(Self {
            db,
            read_only: config.read_only,
            disable_wal: config.disable_wal,
        })
    }

    /// Write options honoring `disable_wal`. Durability ("returns only
    /// after the write is durable", §4.1) requires `sync(true)` whenever
    /// the WAL is in play; with the WAL disabled there is nothing to sync.
    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();
        opts.disable_wal(self.disable_wal);
        opts.set_sync(!self.disable_wal);
        opts
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            Err(Error::ReadOnly)
        } else {
            Ok(())
        }
    }
}

impl Backend for RocksBackend {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.db
            .get(key)
            .map_err(|err| Error::backend("get", err))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.check_writable()?;
        self.db
            .put_opt(key, value, &self.write_options())
            .map_err(|err| Error::backend("put", err))
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.check_writable()?;
        self.db
            .delete_opt(key, &self.write_options())
            .map_err(|err| Error::backend("delete", err))
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        self.db
            .get(key)
            .map(|value| value.is_some())
            .map_err(|err| Error::backend("has", err))
    }

    fn new_iterator(&self, lower: &[u8], upper: &[u8]) -> Result<Box<dyn Iterator<Item = Result<KvPair>> + '_>> {
        let mut read_opts = rocksdb::ReadOptions::default();
        read_opts.set_iterate_lower_bound(lower.to_vec());
        read_opts.set_iterate_upper_bound(upper.to_vec());

        tracing::debug!(lower = ?lower, upper = ?upper, "opening prefix iterator");

        let raw = self.db.iterator_opt(IteratorMode::Start, read_opts);
        Ok(Box::new(RocksIterator { inner: raw }))
    }

    fn new_batch(&self) -> Box<dyn Batch + '_> {
        Box::new(RocksBatch {
            db: &self.db,
            batch: WriteBatch::default(),
            op_count: 0,
            write_opts: self.write_options(),
            read_only: self.read_only,
        })
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn compact(&self) -> Result<()> {
        self.db.compact_range(None::<&[u8]>, None::<&[u8]>);
        Ok(())
    }
}

/// Wraps RocksDB's bounded iterator, releasing its backend-side snapshot on
/// drop (§4.1: "its lifetime must be explicitly released").
struct RocksIterator<'a> {
    inner: rocksdb::DBIteratorWithThreadMode<'a, DB>,
}

impl Iterator for RocksIterator<'_> {
    type Item = Result<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|item| item.map_err(|err| Error::backend("iterator next", err)))
    }
}

impl Drop for RocksIterator<'_> {
    fn drop(&mut self) {
        tracing::debug!("releasing prefix iterator");
    }
}

/// A [`Batch`] backed by [`rocksdb::WriteBatch`].
struct RocksBatch<'a> {
    db: &'a DB,
    batch: WriteBatch,
    op_count: usize,
    write_opts: WriteOptions,
    read_only: bool,
}

impl Batch for RocksBatch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) {
        self.batch.put(key, value);
        self.op_count += 1;
    }

    fn delete(&mut self, key: &[u8]) {
        self.batch.delete(key);
        self.op_count += 1;
    }

    fn len(&self) -> usize {
        self.op_count
    }

    fn reset(&mut self) {
        self.batch.clear();
        self.op_count = 0;
    }

    fn commit(self: Box<Self>) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        let op_count = self.op_count;
        self.db
            .write_opt(self.batch, &self.write_opts)
            .map_err(|err| Error::backend("batch commit", err))?;
        tracing::debug!(ops = op_count, "committed batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, RocksBackend) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend = RocksBackend::open(&config).unwrap();
        (dir, backend)
    }

    #[test]
    fn put_get_delete_roundtrip() {
        let (_dir, backend) = open_temp();
        assert_eq!(backend.get(b"a").unwrap(), None);
        backend.put(b"a", b"1").unwrap();
        assert_eq!(backend.get(b"a").unwrap(), Some(b"1".to_vec()));
        assert!(backend.has(b"a").unwrap());
        backend.delete(b"a").unwrap();
        assert_eq!(backend.get(b"a").unwrap(), None);
    }

    #[test]
    fn prefix_iterator_respects_bounds() {
        let (_dir, backend) = open_temp();
        backend.put(b"/p/01", b"a").unwrap();
        backend.put(b"/p/02", b"b").unwrap();
        backend.put(b"/q/01", b"c").unwrap();

        let upper = prefix_upper_bound(b"/p/");
        let items: Vec<_> = backend
            .new_iterator(b"/p/", &upper)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(&*items[0].0, b"/p/01");
        assert_eq!(&*items[1].0, b"/p/02");
    }

    #[test]
    fn batch_is_atomic_and_invisible_until_commit() {
        let (_dir, backend) = open_temp();
        let mut batch = backend.new_batch();
        batch.put(b"x", b"1");
        batch.put(b"y", b"2");
        assert_eq!(backend.get(b"x").unwrap(), None);
        batch.commit().unwrap();
        assert_eq!(backend.get(b"x").unwrap(), Some(b"1".to_vec()));
        assert_eq!(backend.get(b"y").unwrap(), Some(b"2".to_vec()));
    }

    #[test]
    fn read_only_backend_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let config = BackendConfig {
                path: dir.path().to_path_buf(),
                ..BackendConfig::default()
            };
            RocksBackend::open(&config).unwrap();
        }
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            read_only: true,
            ..BackendConfig::default()
        };
        let backend = RocksBackend::open(&config).unwrap();
        assert!(matches!(backend.put(b"a", b"1"), Err(Error::ReadOnly)));
    }
}
