//! Process-wide registry mapping a backend tag to its constructor.
//!
//! The only module-level mutable state in the engine (§9 "Global state"):
//! one lazy singleton, populated at startup. Registering a duplicate tag is
//! a programmer error and panics, per the engine's propagation policy (§7:
//! "the engine never panics on data-driven input; it only panics on
//! programmer errors such as registering a duplicate backend factory").

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;

use chainidx_types::{Error, Result};

use crate::config::BackendConfig;
use crate::traits::Backend;

/// A backend constructor function.
pub type BackendFactory = Arc<dyn Fn(&BackendConfig) -> Result<Arc<dyn Backend>> + Send + Sync>;

fn registry() -> &'static Mutex<HashMap<&'static str, BackendFactory>> {
    static REGISTRY: OnceLock<Mutex<HashMap<&'static str, BackendFactory>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Registers `factory` under `tag`.
///
/// # Panics
/// Panics if `tag` is already registered — a duplicate registration is a
/// programmer error, not a data-driven failure.
pub fn register_backend(tag: &'static str, factory: BackendFactory) {
    let mut registry = registry().lock();
    assert!(
        !registry.contains_key(tag),
        "backend tag {tag:?} is already registered"
    );
    registry.insert(tag, factory);
}

/// Opens a backend previously registered under `tag`.
///
/// # Errors
/// Returns [`chainidx_types::Error::InvalidArgument`] if no factory is
/// registered under `tag`.
pub fn open_backend(tag: &str, config: &BackendConfig) -> Result<Arc<dyn Backend>> {
    let factory = {
        let registry = registry().lock();
        registry
            .get(tag)
            .cloned()
            .ok_or_else(|| Error::InvalidArgument(format!("unknown backend tag {tag:?}")))?
    };
    factory(config)
}

/// Registers the bundled RocksDB backend under the tag `"rocksdb"`.
///
/// Safe to call more than once from independent call sites within the same
/// process only if each caller is certain no other caller has registered
/// it yet — the usual pattern is to call this once during process startup.
pub fn register_rocksdb_backend() {
    register_backend(
        "rocksdb",
        Arc::new(|config: &BackendConfig| {
            crate::rocks::RocksBackend::open(config)
                .map(|backend| Arc::new(backend) as Arc<dyn Backend>)
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "already registered")]
    fn duplicate_registration_panics() {
        register_backend("dup-test-tag", Arc::new(|_| unreachable!()));
        register_backend("dup-test-tag", Arc::new(|_| unreachable!()));
    }

    #[test]
    fn opening_unknown_tag_is_an_input_error() {
        let config = BackendConfig::default();
        assert!(matches!(
            open_backend("does-not-exist", &config),
            Err(Error::InvalidArgument(_))
        ));
    }
}
