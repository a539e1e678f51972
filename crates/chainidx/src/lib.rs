//! `chainidx`: the embedding facade (§4.10).
//!
//! [`Engine`] owns one backend handle and wires every per-concern store atop
//! it, re-exposing every reader/writer trait from `chainidx-types` as
//! inherent methods. It carries no business logic of its own: every method
//! here is a one-line delegation to the crate that owns the behavior,
//! mirroring how the teacher's umbrella crate only re-exports its
//! sub-crates without adding logic.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use alloy_primitives::{Address, B256, U256};

use chainidx_backend::{Backend, BackendConfig};
use chainidx_consensus::ConsensusStore;
use chainidx_core::CoreStore;
use chainidx_derivatives::DerivativesStore;
use chainidx_events::EventsStore;
use chainidx_historical::HistoricalStore;
use chainidx_logs::LogStore;
use chainidx_search::SearchEngine;
use chainidx_types::{
    AbiReader, AbiWriter, AnalyticsReader, BalanceSnapshot, BlacklistEvent, Block, BurnEvent, CancelToken,
    BlockSigners, ContractCreation, ContractVerificationReader, ContractVerificationWriter, DepositMintProposal,
    DerivativesReader, DerivativesWriter, EmergencyPauseEvent, EpochInfo, Erc20Transfer, Erc721Transfer,
    GasTipUpdateEvent, GovernanceProposal, HistoricalReader, HistoricalWriter, InternalTransaction, Log, LogFilter,
    LogReader, LogWriter, MintEvent, MinterConfigEvent, ProposalStatus, ProposalVote, RankedAddress, Reader, Receipt,
    Result, SearchKind, SearchReader, SearchResult, SignedU256, SystemContractReader, SystemContractWriter,
    Transaction, TxLocation, ValidatorChangeEvent, ValidatorSigningActivity, ValidatorSigningStats, WbftBlockExtra,
    WbftReader, WbftWriter, Writer,
};

/// Ensures the bundled RocksDB backend factory is registered exactly once
/// per process, however many times [`Engine::open`] is called (the
/// registry itself panics on a second registration under the same tag).
fn ensure_rocksdb_registered() {
    static REGISTERED: OnceLock<()> = OnceLock::new();
    REGISTERED.get_or_init(chainidx_backend::register_rocksdb_backend);
}

/// The embedding surface: one open backend handle plus every per-concern
/// store atop it.
pub struct Engine {
    backend: Arc<dyn Backend>,
    core: Arc<CoreStore>,
    logs: LogStore,
    historical: HistoricalStore,
    derivatives: DerivativesStore,
    consensus: ConsensusStore,
    events: Arc<EventsStore>,
    search: SearchEngine,
}

impl Engine {
    /// Opens an engine backed by the bundled RocksDB implementation at
    /// `config.path`, honoring every other field of `config` (cache size,
    /// read-only, WAL, etc).
    ///
    /// # Errors
    /// Returns a backend error if the store fails to open.
    pub fn open(config: &BackendConfig) -> Result<Self> {
        ensure_rocksdb_registered();
        let backend = chainidx_backend::open_backend("rocksdb", config)?;
        Ok(Self::from_backend(backend))
    }

    /// Opens an engine at `path` with default configuration, forced
    /// read-only: every writer method then fails fast with
    /// [`chainidx_types::Error::ReadOnly`] before touching the backend.
    ///
    /// # Errors
    /// Returns a backend error if the store fails to open.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self> {
        let config = BackendConfig {
            path: path.as_ref().to_path_buf(),
            read_only: true,
            ..BackendConfig::default()
        };
        Self::open(&config)
    }

    /// Wires every per-concern store atop an already-open `backend`. Useful
    /// for tests and for embedders selecting a non-default backend tag via
    /// [`chainidx_backend::open_backend`] directly.
    #[must_use]
    pub fn from_backend(backend: Arc<dyn Backend>) -> Self {
        let core = Arc::new(CoreStore::new(Arc::clone(&backend)));
        let logs = LogStore::new(Arc::clone(&backend));
        let historical = HistoricalStore::new(Arc::clone(&backend));
        let derivatives = DerivativesStore::new(Arc::clone(&backend));
        let consensus = ConsensusStore::new(Arc::clone(&backend));
        let events = Arc::new(EventsStore::new(Arc::clone(&backend)));
        let search = SearchEngine::new(
            Arc::clone(&core) as Arc<dyn Reader>,
            Arc::clone(&events) as Arc<dyn AbiReader>,
            Arc::clone(&events) as Arc<dyn ContractVerificationReader>,
        );
        Self {
            backend,
            core,
            logs,
            historical,
            derivatives,
            consensus,
            events,
            search,
        }
    }

    /// `true` if this handle was opened read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.backend.is_read_only()
    }

    /// Requests a background compaction over the whole keyspace.
    ///
    /// # Errors
    /// Returns a wrapped backend error if compaction fails to start.
    pub fn compact(&self) -> Result<()> {
        self.backend.compact()
    }
}

impl Reader for Engine {
    fn get_latest_height(&self, token: &CancelToken) -> Result<u64> {
        self.core.get_latest_height(token)
    }
    fn get_block_count(&self, token: &CancelToken) -> Result<u64> {
        self.core.get_block_count(token)
    }
    fn get_transaction_count(&self, token: &CancelToken) -> Result<u64> {
        self.core.get_transaction_count(token)
    }
    fn get_block(&self, height: u64, token: &CancelToken) -> Result<Block> {
        self.core.get_block(height, token)
    }
    fn get_block_by_hash(&self, hash: B256, token: &CancelToken) -> Result<Block> {
        self.core.get_block_by_hash(hash, token)
    }
    fn get_blocks(&self, from: u64, to: u64, token: &CancelToken) -> Result<Vec<Block>> {
        self.core.get_blocks(from, to, token)
    }
    fn has_block(&self, height: u64, token: &CancelToken) -> Result<bool> {
        self.core.has_block(height, token)
    }
    fn get_transaction(&self, hash: B256, token: &CancelToken) -> Result<Transaction> {
        self.core.get_transaction(hash, token)
    }
    fn has_transaction(&self, hash: B256, token: &CancelToken) -> Result<bool> {
        self.core.has_transaction(hash, token)
    }
    fn get_transactions_by_address(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<B256>> {
        self.core.get_transactions_by_address(address, limit, offset, token)
    }
    fn get_receipt(&self, hash: B256, token: &CancelToken) -> Result<Receipt> {
        self.core.get_receipt(hash, token)
    }
    fn get_receipts(&self, hashes: &[B256], token: &CancelToken) -> Result<Vec<Receipt>> {
        self.core.get_receipts(hashes, token)
    }
    fn get_receipts_by_block_number(&self, height: u64, token: &CancelToken) -> Result<Vec<Receipt>> {
        self.core.get_receipts_by_block_number(height, token)
    }
    fn get_receipts_by_block_hash(&self, hash: B256, token: &CancelToken) -> Result<Vec<Receipt>> {
        self.core.get_receipts_by_block_hash(hash, token)
    }
}

impl Writer for Engine {
    fn set_latest_height(&self, height: u64) -> Result<()> {
        self.core.set_latest_height(height)
    }
    fn set_block(&self, block: &Block) -> Result<()> {
        self.core.set_block(block)
    }
    fn set_blocks(&self, blocks: &[Block]) -> Result<()> {
        self.core.set_blocks(blocks)
    }
    fn set_transaction(&self, tx: &Transaction, location: TxLocation) -> Result<()> {
        self.core.set_transaction(tx, location)
    }
    fn set_receipt(&self, receipt: &Receipt) -> Result<()> {
        self.core.set_receipt(receipt)
    }
    fn set_receipts(&self, receipts: &[Receipt]) -> Result<()> {
        self.core.set_receipts(receipts)
    }
    fn add_transaction_to_address_index(&self, address: Address, tx_hash: B256) -> Result<()> {
        self.core.add_transaction_to_address_index(address, tx_hash)
    }
    fn delete_block(&self, height: u64) -> Result<()> {
        self.core.delete_block(height)
    }
}

impl AnalyticsReader for Engine {
    fn get_top_miners(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>> {
        self.core.get_top_miners(from, to, limit, token)
    }
    fn get_top_addresses_by_tx_count(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>> {
        self.core.get_top_addresses_by_tx_count(from, to, limit, token)
    }
    fn get_top_addresses_by_gas_used(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>> {
        self.core.get_top_addresses_by_gas_used(from, to, limit, token)
    }
}

impl LogReader for Engine {
    fn get_logs(&self, filter: &LogFilter, token: &CancelToken) -> Result<Vec<Log>> {
        self.logs.get_logs(filter, token)
    }
}

impl LogWriter for Engine {
    fn set_log(&self, log: &Log) -> Result<()> {
        self.logs.set_log(log)
    }
    fn set_logs(&self, logs: &[Log]) -> Result<()> {
        self.logs.set_logs(logs)
    }
}

impl HistoricalReader for Engine {
    fn get_address_balance(&self, address: Address, block: u64, token: &CancelToken) -> Result<U256> {
        self.historical.get_address_balance(address, block, token)
    }
    fn get_balance_history(&self, address: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<BalanceSnapshot>> {
        self.historical.get_balance_history(address, from, to, limit, offset, token)
    }
}

impl HistoricalWriter for Engine {
    fn update_balance(&self, address: Address, block: u64, delta: SignedU256, causing_tx_hash: B256) -> Result<U256> {
        self.historical.update_balance(address, block, delta, causing_tx_hash)
    }
    fn set_balance(&self, address: Address, block: u64, balance: U256) -> Result<()> {
        self.historical.set_balance(address, block, balance)
    }
}

impl WbftReader for Engine {
    fn get_wbft_block_extra(&self, height: u64, token: &CancelToken) -> Result<WbftBlockExtra> {
        self.consensus.get_wbft_block_extra(height, token)
    }
    fn get_epoch_info(&self, epoch: u64, token: &CancelToken) -> Result<EpochInfo> {
        self.consensus.get_epoch_info(epoch, token)
    }
    fn get_latest_epoch(&self, token: &CancelToken) -> Result<u64> {
        self.consensus.get_latest_epoch(token)
    }
    fn get_block_signers(&self, height: u64, token: &CancelToken) -> Result<BlockSigners> {
        self.consensus.get_block_signers(height, token)
    }
    fn get_validator_activity(&self, validator: Address, height: u64, token: &CancelToken) -> Result<ValidatorSigningActivity> {
        self.consensus.get_validator_activity(validator, height, token)
    }
    fn get_validator_signing_stats(&self, validator: Address, from: u64, to: u64, token: &CancelToken) -> Result<ValidatorSigningStats> {
        self.consensus.get_validator_signing_stats(validator, from, to, token)
    }
    fn get_all_validators_signing_stats(&self, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<(Address, ValidatorSigningStats)>> {
        self.consensus.get_all_validators_signing_stats(from, to, limit, offset, token)
    }
}

impl WbftWriter for Engine {
    fn set_wbft_block_extra(&self, extra: &WbftBlockExtra) -> Result<()> {
        self.consensus.set_wbft_block_extra(extra)
    }
    fn set_validator_activity(&self, activity: &ValidatorSigningActivity) -> Result<()> {
        self.consensus.set_validator_activity(activity)
    }
}

impl DerivativesReader for Engine {
    fn get_contract_creation(&self, contract: Address, token: &CancelToken) -> Result<ContractCreation> {
        self.derivatives.get_contract_creation(contract, token)
    }
    fn get_contracts_by_creator(&self, creator: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<ContractCreation>> {
        self.derivatives.get_contracts_by_creator(creator, limit, offset, token)
    }
    fn get_erc20_transfers_by_contract(&self, contract: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc20Transfer>> {
        self.derivatives.get_erc20_transfers_by_contract(contract, limit, offset, token)
    }
    fn get_erc20_transfers_by_sender(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc20Transfer>> {
        self.derivatives.get_erc20_transfers_by_sender(address, limit, offset, token)
    }
    fn get_erc20_transfers_by_recipient(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc20Transfer>> {
        self.derivatives.get_erc20_transfers_by_recipient(address, limit, offset, token)
    }
    fn get_erc20_balance(&self, address: Address, contract: Address, token: &CancelToken) -> Result<U256> {
        self.derivatives.get_erc20_balance(address, contract, token)
    }
    fn get_erc721_transfers_by_contract(&self, contract: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc721Transfer>> {
        self.derivatives.get_erc721_transfers_by_contract(contract, limit, offset, token)
    }
    fn get_erc721_owner(&self, contract: Address, token_id: U256, token: &CancelToken) -> Result<Address> {
        self.derivatives.get_erc721_owner(contract, token_id, token)
    }
    fn get_internal_transactions(&self, tx_hash: B256, token: &CancelToken) -> Result<Vec<InternalTransaction>> {
        self.derivatives.get_internal_transactions(tx_hash, token)
    }
    fn get_internal_transactions_by_sender(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<InternalTransaction>> {
        self.derivatives.get_internal_transactions_by_sender(address, limit, offset, token)
    }
    fn get_internal_transactions_by_recipient(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<InternalTransaction>> {
        self.derivatives.get_internal_transactions_by_recipient(address, limit, offset, token)
    }
}

impl DerivativesWriter for Engine {
    fn set_contract_creation(&self, creation: &ContractCreation) -> Result<()> {
        self.derivatives.set_contract_creation(creation)
    }
    fn set_erc20_transfer(&self, transfer: &Erc20Transfer) -> Result<()> {
        self.derivatives.set_erc20_transfer(transfer)
    }
    fn set_erc721_transfer(&self, transfer: &Erc721Transfer) -> Result<()> {
        self.derivatives.set_erc721_transfer(transfer)
    }
    fn set_internal_transaction(&self, itx: &InternalTransaction) -> Result<()> {
        self.derivatives.set_internal_transaction(itx)
    }
}

impl SystemContractReader for Engine {
    fn get_mint_events(&self, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<MintEvent>> {
        self.events.get_mint_events(from, to, limit, offset, token)
    }
    fn get_mint_events_by_actor(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<MintEvent>> {
        self.events.get_mint_events_by_actor(actor, from, to, limit, offset, token)
    }
    fn get_burn_events(&self, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<BurnEvent>> {
        self.events.get_burn_events(from, to, limit, offset, token)
    }
    fn get_burn_events_by_actor(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<BurnEvent>> {
        self.events.get_burn_events_by_actor(actor, from, to, limit, offset, token)
    }
    fn get_minter_config_history(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<MinterConfigEvent>> {
        self.events.get_minter_config_history(actor, from, to, limit, offset, token)
    }
    fn get_validator_changes(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<ValidatorChangeEvent>> {
        self.events.get_validator_changes(actor, from, to, limit, offset, token)
    }
    fn get_blacklist_events(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<BlacklistEvent>> {
        self.events.get_blacklist_events(actor, from, to, limit, offset, token)
    }
    fn get_emergency_pause_history(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<EmergencyPauseEvent>> {
        self.events.get_emergency_pause_history(actor, from, to, limit, offset, token)
    }
    fn get_gas_tip_history(&self, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<GasTipUpdateEvent>> {
        self.events.get_gas_tip_history(from, to, limit, offset, token)
    }
    fn is_minter(&self, address: Address, token: &CancelToken) -> Result<bool> {
        self.events.is_minter(address, token)
    }
    fn is_validator(&self, address: Address, token: &CancelToken) -> Result<bool> {
        self.events.is_validator(address, token)
    }
    fn is_blacklisted(&self, address: Address, token: &CancelToken) -> Result<bool> {
        self.events.is_blacklisted(address, token)
    }
    fn get_active_minters(&self, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Address>> {
        self.events.get_active_minters(limit, offset, token)
    }
    fn get_active_validators(&self, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Address>> {
        self.events.get_active_validators(limit, offset, token)
    }
    fn get_blacklisted_addresses(&self, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Address>> {
        self.events.get_blacklisted_addresses(limit, offset, token)
    }
    fn get_total_supply(&self, token: &CancelToken) -> Result<U256> {
        self.events.get_total_supply(token)
    }
    fn get_proposal(&self, contract: Address, id: u64, token: &CancelToken) -> Result<GovernanceProposal> {
        self.events.get_proposal(contract, id, token)
    }
    fn get_proposals(&self, contract: Address, status: ProposalStatus, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<GovernanceProposal>> {
        self.events.get_proposals(contract, status, limit, offset, token)
    }
    fn get_vote(&self, contract: Address, id: u64, voter: Address, token: &CancelToken) -> Result<ProposalVote> {
        self.events.get_vote(contract, id, voter, token)
    }
    fn get_votes(&self, contract: Address, id: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<ProposalVote>> {
        self.events.get_votes(contract, id, limit, offset, token)
    }
    fn get_deposit_mint_proposal(&self, contract: Address, id: u64, token: &CancelToken) -> Result<DepositMintProposal> {
        self.events.get_deposit_mint_proposal(contract, id, token)
    }
}

impl SystemContractWriter for Engine {
    fn set_mint_event(&self, event: &MintEvent) -> Result<()> {
        self.events.set_mint_event(event)
    }
    fn set_burn_event(&self, event: &BurnEvent) -> Result<()> {
        self.events.set_burn_event(event)
    }
    fn set_minter_config_event(&self, event: &MinterConfigEvent) -> Result<()> {
        self.events.set_minter_config_event(event)
    }
    fn set_validator_change_event(&self, event: &ValidatorChangeEvent) -> Result<()> {
        self.events.set_validator_change_event(event)
    }
    fn set_blacklist_event(&self, event: &BlacklistEvent) -> Result<()> {
        self.events.set_blacklist_event(event)
    }
    fn set_gas_tip_update(&self, event: &GasTipUpdateEvent) -> Result<()> {
        self.events.set_gas_tip_update(event)
    }
    fn set_emergency_pause_event(&self, event: &EmergencyPauseEvent) -> Result<()> {
        self.events.set_emergency_pause_event(event)
    }
    fn apply_total_supply_delta(&self, delta: SignedU256) -> Result<U256> {
        self.events.apply_total_supply_delta(delta)
    }
    fn set_proposal(&self, proposal: &GovernanceProposal) -> Result<()> {
        self.events.set_proposal(proposal)
    }
    fn update_proposal_status(&self, contract: Address, id: u64, status: ProposalStatus, executed_at: Option<u64>) -> Result<()> {
        self.events.update_proposal_status(contract, id, status, executed_at)
    }
    fn set_vote(&self, vote: &ProposalVote) -> Result<()> {
        self.events.set_vote(vote)
    }
    fn set_deposit_mint_proposal(&self, proposal: &DepositMintProposal) -> Result<()> {
        self.events.set_deposit_mint_proposal(proposal)
    }
}

impl ContractVerificationReader for Engine {
    fn is_verified(&self, address: Address, token: &CancelToken) -> Result<bool> {
        self.events.is_verified(address, token)
    }
}

impl ContractVerificationWriter for Engine {
    fn set_verified(&self, address: Address, verified: bool) -> Result<()> {
        self.events.set_verified(address, verified)
    }
}

impl AbiReader for Engine {
    fn get_abi(&self, address: Address, token: &CancelToken) -> Result<String> {
        self.events.get_abi(address, token)
    }
}

impl AbiWriter for Engine {
    fn set_abi(&self, address: Address, abi_json: &str) -> Result<()> {
        self.events.set_abi(address, abi_json)
    }
}

impl SearchReader for Engine {
    fn search(&self, query: &str, types: &[SearchKind], limit: usize, token: &CancelToken) -> Result<Vec<SearchResult>> {
        self.search.search(query, types, limit, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Bytes};
    use chainidx_types::{Error, TxKind};

    fn open_engine() -> (tempfile::TempDir, Engine) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        (dir, Engine::open(&config).unwrap())
    }

    fn sample_block(number: u64) -> Block {
        Block {
            number,
            hash: B256::repeat_byte(number as u8 + 1),
            parent_hash: B256::ZERO,
            coinbase: address!("0000000000000000000000000000000000000a"),
            timestamp: 1_700_000_000 + number,
            gas_limit: 30_000_000,
            gas_used: 0,
            base_fee_per_gas: None,
            extra_data: Bytes::new(),
            transactions: Vec::new(),
        }
    }

    #[test]
    fn engine_wires_core_store_through_reader_and_writer() {
        let (_dir, engine) = open_engine();
        let token = CancelToken::new();
        engine.set_block(&sample_block(42)).unwrap();
        assert_eq!(engine.get_block(42, &token).unwrap().number, 42);
        assert!(engine.has_block(42, &token).unwrap());
    }

    #[test]
    fn engine_wires_search_through_reader_state() {
        let (_dir, engine) = open_engine();
        let token = CancelToken::new();
        engine.set_block(&sample_block(7)).unwrap();
        let results = engine.search("7", &[], 10, &token).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].block_number, Some(7));
    }

    #[test]
    fn opening_twice_in_one_process_does_not_panic_on_duplicate_registration() {
        let dir1 = tempfile::tempdir().unwrap();
        let dir2 = tempfile::tempdir().unwrap();
        let config1 = BackendConfig { path: dir1.path().to_path_buf(), ..BackendConfig::default() };
        let config2 = BackendConfig { path: dir2.path().to_path_buf(), ..BackendConfig::default() };
        let _engine1 = Engine::open(&config1).unwrap();
        let _engine2 = Engine::open(&config2).unwrap();
    }

    #[test]
    fn read_only_engine_rejects_writes() {
        let dir = tempfile::tempdir().unwrap();
        {
            let config = BackendConfig { path: dir.path().to_path_buf(), ..BackendConfig::default() };
            let engine = Engine::open(&config).unwrap();
            engine.set_block(&sample_block(1)).unwrap();
        }
        let engine = Engine::open_read_only(dir.path()).unwrap();
        assert!(engine.is_read_only());
        let token = CancelToken::new();
        assert_eq!(engine.get_block(1, &token).unwrap().number, 1);
        assert!(matches!(engine.set_block(&sample_block(2)), Err(Error::ReadOnly)));
        let _ = TxKind::Legacy;
    }
}
