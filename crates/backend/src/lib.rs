//! Ordered key/value backend abstraction and its RocksDB implementation.

pub mod config;
pub mod registry;
pub mod rocks;
pub mod traits;

pub use config::BackendConfig;
pub use registry::{BackendFactory, open_backend, register_backend, register_rocksdb_backend};
pub use rocks::{RocksBackend, prefix_upper_bound};
pub use traits::{Backend, Batch, KvPair};
