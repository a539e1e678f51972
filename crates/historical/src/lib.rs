//! Per-address historical balance snapshots and as-of-block reconstruction
//! (§4.6).
//!
//! Snapshots are append-only, keyed by a per-address monotonic sequence
//! persisted at `/meta/balance-seq/{addr}`. A `/index/balance/{addr}/latest`
//! cell holds the current balance so `GetAddressBalance(addr, 0)` is a
//! single point lookup; any other height replays history up to that block.

pub mod genesis;

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use parking_lot::Mutex;

use chainidx_backend::Backend;
use chainidx_codec::{decode, decode_big_int, decode_u64, encode, encode_big_int, encode_u64};
use chainidx_types::{BalanceSnapshot, CancelToken, Error, HistoricalReader, HistoricalWriter, Result, SignedU256};

pub use genesis::GenesisInitWrapper;

/// Historical balance storage, backed by one ordered key/value handle.
pub struct HistoricalStore {
    backend: Arc<dyn Backend>,
    /// Guards the read-increment-write of the per-address sequence counter.
    seq_lock: Mutex<()>,
}

impl HistoricalStore {
    /// Wraps `backend` in a [`HistoricalStore`].
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            seq_lock: Mutex::new(()),
        }
    }

    fn latest_balance(&self, address: Address) -> Result<U256> {
        match self.backend.get(&chainidx_keys::balance_latest(address))? {
            Some(bytes) => decode_big_int(&bytes),
            None => Ok(U256::ZERO),
        }
    }

    fn next_seq(&self, address: Address) -> Result<u64> {
        let key = chainidx_keys::balance_seq_counter(address);
        match self.backend.get(&key)? {
            Some(bytes) => decode_u64(&bytes),
            None => Ok(0),
        }
    }
}

impl HistoricalReader for HistoricalStore {
    fn get_address_balance(&self, address: Address, block: u64, token: &CancelToken) -> Result<U256> {
        token.check()?;
        if block == 0 {
            return self.latest_balance(address);
        }
        let lower = chainidx_keys::balance_history_prefix(address);
        let upper = chainidx_backend::prefix_upper_bound(&lower);
        let mut running = U256::ZERO;
        for item in self.backend.new_iterator(&lower, &upper)? {
            token.check()?;
            let (_, value) = item?;
            let snapshot: BalanceSnapshot = decode(&value)?;
            if snapshot.block_number > block {
                break;
            }
            running = snapshot.balance;
        }
        Ok(running)
    }

    fn get_balance_history(
        &self,
        address: Address,
        from: u64,
        to: u64,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<BalanceSnapshot>> {
        token.check()?;
        if from > to {
            return Err(Error::InvalidArgument(format!("from ({from}) > to ({to})")));
        }
        let lower = chainidx_keys::balance_history_prefix(address);
        let upper = chainidx_backend::prefix_upper_bound(&lower);
        let mut matched = Vec::new();
        for item in self.backend.new_iterator(&lower, &upper)? {
            token.check()?;
            let (_, value) = item?;
            let snapshot: BalanceSnapshot = decode(&value)?;
            if snapshot.block_number >= from && snapshot.block_number <= to {
                matched.push(snapshot);
            }
        }
        Ok(chainidx_types::paginate(matched.into_iter(), offset, limit))
    }
}

impl HistoricalWriter for HistoricalStore {
    fn update_balance(&self, address: Address, block: u64, delta: SignedU256, causing_tx_hash: B256) -> Result<U256> {
        let _guard = self.seq_lock.lock();
        let latest = self.latest_balance(address)?;
        let Some(balance) = delta.apply(latest) else {
            return Err(Error::InvalidArgument(format!(
                "balance update for {address} at block {block} would go negative"
            )));
        };
        let seq = self.next_seq(address)?;
        let snapshot = BalanceSnapshot {
            block_number: block,
            balance,
            delta,
            causing_tx_hash,
        };
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::balance_history(address, seq), &encode(&snapshot)?);
        batch.put(&chainidx_keys::balance_seq_counter(address), &encode_u64(seq + 1));
        batch.put(&chainidx_keys::balance_latest(address), &encode_big_int(balance));
        batch.commit()?;
        Ok(balance)
    }

    fn set_balance(&self, address: Address, block: u64, balance: U256) -> Result<()> {
        let latest = self.latest_balance(address)?;
        let delta = if balance >= latest {
            SignedU256::positive(balance - latest)
        } else {
            SignedU256::negative(latest - balance)
        };
        self.update_balance(address, block, delta, B256::ZERO)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use chainidx_backend::{BackendConfig, RocksBackend};

    fn open_store() -> (tempfile::TempDir, HistoricalStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
        (dir, HistoricalStore::new(backend))
    }

    #[test]
    fn e3_balance_history_and_as_of_block() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let addr = address!("0000000000000000000000000000000000000d");
        let h1 = B256::repeat_byte(1);
        let h2 = B256::repeat_byte(2);

        store
            .update_balance(addr, 1, SignedU256::positive(U256::from(1000u64)), h1)
            .unwrap();
        store
            .update_balance(addr, 2, SignedU256::positive(U256::from(2000u64)), h2)
            .unwrap();

        assert_eq!(store.get_address_balance(addr, 0, &token).unwrap(), U256::from(3000u64));
        assert_eq!(store.get_address_balance(addr, 1, &token).unwrap(), U256::from(1000u64));

        let history = store.get_balance_history(addr, 1, 10, 10, 0, &token).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].block_number, 1);
        assert_eq!(history[1].block_number, 2);
    }

    #[test]
    fn negative_balance_is_rejected() {
        let (_dir, store) = open_store();
        let addr = address!("0000000000000000000000000000000000000e");
        let err = store
            .update_balance(addr, 1, SignedU256::negative(U256::from(1u64)), B256::ZERO)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn set_balance_is_update_balance_with_computed_delta() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let addr = address!("0000000000000000000000000000000000000f");
        store.set_balance(addr, 1, U256::from(500u64)).unwrap();
        assert_eq!(store.get_address_balance(addr, 0, &token).unwrap(), U256::from(500u64));
        store.set_balance(addr, 2, U256::from(100u64)).unwrap();
        assert_eq!(store.get_address_balance(addr, 0, &token).unwrap(), U256::from(100u64));
    }

    #[test]
    fn sequence_counter_persists_across_reopens_of_the_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let addr = address!("0000000000000000000000000000000000001a");
        {
            let config = BackendConfig {
                path: dir.path().to_path_buf(),
                ..BackendConfig::default()
            };
            let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
            let store = HistoricalStore::new(backend);
            store
                .update_balance(addr, 1, SignedU256::positive(U256::from(1u64)), B256::ZERO)
                .unwrap();
        }
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
        let store = HistoricalStore::new(backend);
        let token = CancelToken::new();
        store
            .update_balance(addr, 2, SignedU256::positive(U256::from(1u64)), B256::ZERO)
            .unwrap();
        let history = store.get_balance_history(addr, 0, 10, 10, 0, &token).unwrap();
        assert_eq!(history.len(), 2);
    }
}
