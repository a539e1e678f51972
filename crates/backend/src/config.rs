//! Backend configuration.

use std::path::PathBuf;

/// Configuration accepted by every backend factory.
///
/// Fields mirror the knobs an embedded LSM-tree store needs; a backend that
/// doesn't use a particular knob (e.g. an in-memory test backend ignoring
/// `cache_mb`) is free to ignore it.
#[derive(Clone, Debug)]
pub struct BackendConfig {
    /// On-disk directory for the store.
    pub path: PathBuf,
    /// Block-cache size in megabytes.
    pub cache_mb: usize,
    /// Maximum number of open SST files.
    pub max_open_files: i32,
    /// Write-buffer (memtable) size in megabytes.
    pub write_buffer_mb: usize,
    /// Disables the write-ahead log. Durability for unflushed writes is
    /// then bounded by the memtable only.
    pub disable_wal: bool,
    /// Opens the store read-only; every writer method then fails fast with
    /// [`chainidx_types::Error::ReadOnly`].
    pub read_only: bool,
    /// Background compaction thread count.
    pub compaction_concurrency: i32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./chainidx-data"),
            cache_mb: 512,
            max_open_files: -1,
            write_buffer_mb: 64,
            disable_wal: false,
            read_only: false,
            compaction_concurrency: 4,
        }
    }
}
