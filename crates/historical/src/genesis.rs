//! Optional genesis-initialization wrapper (§4.6).
//!
//! An embedder that also holds an RPC client to the live chain may want
//! `GetAddressBalance` to transparently backfill an address's genesis
//! balance the first time it is queried, instead of returning a bare zero
//! for an address the engine has never seen a transfer for. This wrapper
//! intercepts exactly that case; it never changes behavior once an address
//! has any recorded history.

use std::collections::HashSet;
use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::Mutex;

use chainidx_types::{CancelToken, HistoricalReader, HistoricalWriter, Result, RpcClient, SignedU256};

/// Below this height, a zero balance with no history is ambiguous between
/// "genuinely zero" and "never backfilled" — only queries at a height below
/// this bound trigger the one-shot RPC lookup.
const GENESIS_LOOKBACK_HEIGHT: u64 = 1000;

/// Wraps a [`HistoricalReader`]/[`HistoricalWriter`] pair with an
/// [`RpcClient`]-backed genesis backfill.
///
/// On `get_address_balance`, if the underlying store reports zero balance
/// and the address has no recorded history, and the queried block is below
/// [`GENESIS_LOOKBACK_HEIGHT`], the wrapper queries the external node for
/// the address's balance at block 0 and, if non-zero, persists it via
/// `set_balance` before returning. A per-address one-shot guard prevents
/// concurrent callers from triggering the RPC lookup twice, and the
/// backfill path never recurses back into itself.
pub struct GenesisInitWrapper<S, R> {
    store: S,
    rpc: R,
    /// Addresses for which a genesis backfill has already been attempted
    /// (successful or not) — the one-shot guard.
    attempted: Mutex<HashSet<Address>>,
}

impl<S, R> GenesisInitWrapper<S, R>
where
    S: HistoricalReader + HistoricalWriter,
    R: RpcClient,
{
    /// Wraps `store` with genesis backfill via `rpc`.
    #[must_use]
    pub fn new(store: S, rpc: R) -> Self {
        Self {
            store,
            rpc,
            attempted: Mutex::new(HashSet::new()),
        }
    }

    /// Exposes the wrapped store for callers that need the other
    /// `Historical*` methods unmodified.
    pub fn inner(&self) -> &S {
        &self.store
    }

    fn try_backfill(&self, address: Address, block: u64, token: &CancelToken) -> Result<()> {
        if block >= GENESIS_LOOKBACK_HEIGHT {
            return Ok(());
        }
        {
            let mut attempted = self.attempted.lock();
            if !attempted.insert(address) {
                return Ok(());
            }
        }
        let has_history = !self
            .store
            .get_balance_history(address, 0, u64::MAX, 1, 0, token)?
            .is_empty();
        if has_history {
            return Ok(());
        }
        let genesis_balance = self.rpc.balance_at(address, 0)?;
        if genesis_balance.is_zero() {
            return Ok(());
        }
        self.store.set_balance(address, 0, genesis_balance)?;
        tracing::debug!(%address, %genesis_balance, "backfilled genesis balance");
        Ok(())
    }
}

impl<S, R> HistoricalReader for GenesisInitWrapper<S, R>
where
    S: HistoricalReader + HistoricalWriter,
    R: RpcClient,
{
    fn get_address_balance(&self, address: Address, block: u64, token: &CancelToken) -> Result<U256> {
        let balance = self.store.get_address_balance(address, block, token)?;
        if !balance.is_zero() {
            return Ok(balance);
        }
        self.try_backfill(address, block, token)?;
        self.store.get_address_balance(address, block, token)
    }

    fn get_balance_history(
        &self,
        address: Address,
        from: u64,
        to: u64,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<chainidx_types::BalanceSnapshot>> {
        self.store.get_balance_history(address, from, to, limit, offset, token)
    }
}

impl<S, R> HistoricalWriter for GenesisInitWrapper<S, R>
where
    S: HistoricalReader + HistoricalWriter,
    R: RpcClient,
{
    fn update_balance(&self, address: Address, block: u64, delta: SignedU256, causing_tx_hash: alloy_primitives::B256) -> Result<U256> {
        self.store.update_balance(address, block, delta, causing_tx_hash)
    }

    fn set_balance(&self, address: Address, block: u64, balance: U256) -> Result<()> {
        self.store.set_balance(address, block, balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HistoricalStore;
    use alloy_primitives::{address, B256};
    use chainidx_backend::{Backend, BackendConfig, RocksBackend};

    struct StubRpc {
        balance: U256,
    }

    impl RpcClient for StubRpc {
        fn balance_at(&self, _address: Address, _block_number: u64) -> Result<U256> {
            Ok(self.balance)
        }
    }

    fn open_wrapper(genesis_balance: U256) -> (tempfile::TempDir, GenesisInitWrapper<HistoricalStore, StubRpc>) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
        let store = HistoricalStore::new(backend);
        let wrapper = GenesisInitWrapper::new(store, StubRpc { balance: genesis_balance });
        (dir, wrapper)
    }

    #[test]
    fn backfills_genesis_balance_once_for_address_with_no_history() {
        let (_dir, wrapper) = open_wrapper(U256::from(500u64));
        let token = CancelToken::new();
        let addr = address!("0000000000000000000000000000000000aa11");

        assert_eq!(wrapper.get_address_balance(addr, 10, &token).unwrap(), U256::from(500u64));
        // A second query doesn't re-trigger the RPC path (idempotent either way).
        assert_eq!(wrapper.get_address_balance(addr, 10, &token).unwrap(), U256::from(500u64));
    }

    #[test]
    fn does_not_backfill_when_genesis_balance_is_zero() {
        let (_dir, wrapper) = open_wrapper(U256::ZERO);
        let token = CancelToken::new();
        let addr = address!("0000000000000000000000000000000000aa22");
        assert_eq!(wrapper.get_address_balance(addr, 10, &token).unwrap(), U256::ZERO);
    }

    #[test]
    fn does_not_backfill_above_the_lookback_height() {
        let (_dir, wrapper) = open_wrapper(U256::from(500u64));
        let token = CancelToken::new();
        let addr = address!("0000000000000000000000000000000000aa33");
        assert_eq!(wrapper.get_address_balance(addr, 50_000, &token).unwrap(), U256::ZERO);
    }

    #[test]
    fn does_not_backfill_when_address_already_has_recorded_history() {
        let (_dir, wrapper) = open_wrapper(U256::from(999u64));
        let token = CancelToken::new();
        let addr = address!("0000000000000000000000000000000000aa44");
        wrapper
            .inner()
            .update_balance(addr, 5, SignedU256::positive(U256::from(10u64)), B256::ZERO)
            .unwrap();

        assert_eq!(wrapper.get_address_balance(addr, 10, &token).unwrap(), U256::from(10u64));
    }
}
