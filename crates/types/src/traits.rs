//! The engine's embedding API: the trait groups collaborators depend on.
//!
//! Every method accepts a [`CancelToken`] per the engine's concurrency
//! model (§5): long scans check it at least once per iterator step and at
//! least once per block in aggregation loops. Point lookups check it once
//! on entry.

use alloy_primitives::{Address, B256, U256};

use crate::balance::{BalanceSnapshot, SignedU256};
use crate::block::{Block, Receipt, Transaction, TxLocation};
use crate::cancel::CancelToken;
use crate::consensus::{
    BlockSigners, EpochInfo, ValidatorSigningActivity, ValidatorSigningStats, WbftBlockExtra,
};
use crate::derivatives::{ContractCreation, Erc20Transfer, Erc721Transfer, InternalTransaction};
use crate::error::Result;
use crate::events::{
    BlacklistEvent, BurnEvent, DepositMintProposal, EmergencyPauseEvent, GasTipUpdateEvent,
    GovernanceProposal, MinterConfigEvent, MintEvent, ProposalStatus, ProposalVote,
    ValidatorChangeEvent,
};
use crate::block::Log;
use crate::pagination::LogFilter;
use crate::search::{SearchKind, SearchResult};

/// One entry of a top-N ranking: an address paired with the ranked count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RankedAddress {
    /// The ranked address.
    pub address: Address,
    /// The ranking value (blocks mined, transactions sent, gas used).
    pub count: u64,
}

/// Read access to blocks, transactions and receipts.
pub trait Reader {
    /// Height of the most recently set block, or `0` if none has been set.
    fn get_latest_height(&self, token: &CancelToken) -> Result<u64>;
    /// Total number of blocks stored.
    fn get_block_count(&self, token: &CancelToken) -> Result<u64>;
    /// Total number of transactions stored.
    fn get_transaction_count(&self, token: &CancelToken) -> Result<u64>;
    /// Fetches the block at `height`.
    fn get_block(&self, height: u64, token: &CancelToken) -> Result<Block>;
    /// Fetches the block whose hash is `hash`, via the hash index.
    fn get_block_by_hash(&self, hash: B256, token: &CancelToken) -> Result<Block>;
    /// Fetches every block in `[from, to]`, inclusive.
    fn get_blocks(&self, from: u64, to: u64, token: &CancelToken) -> Result<Vec<Block>>;
    /// `true` if a block exists at `height`.
    fn has_block(&self, height: u64, token: &CancelToken) -> Result<bool>;
    /// Fetches the transaction with hash `hash`.
    fn get_transaction(&self, hash: B256, token: &CancelToken) -> Result<Transaction>;
    /// `true` if a transaction with hash `hash` exists.
    fn has_transaction(&self, hash: B256, token: &CancelToken) -> Result<bool>;
    /// Transaction hashes that have touched `address`, in insertion order.
    fn get_transactions_by_address(
        &self,
        address: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<B256>>;
    /// Fetches the receipt for transaction `hash`.
    fn get_receipt(&self, hash: B256, token: &CancelToken) -> Result<Receipt>;
    /// Fetches receipts for each of `hashes`, in the same order.
    fn get_receipts(&self, hashes: &[B256], token: &CancelToken) -> Result<Vec<Receipt>>;
    /// Fetches every receipt belonging to the block at `height`.
    fn get_receipts_by_block_number(&self, height: u64, token: &CancelToken) -> Result<Vec<Receipt>>;
    /// Fetches every receipt belonging to the block with hash `hash`.
    fn get_receipts_by_block_hash(&self, hash: B256, token: &CancelToken) -> Result<Vec<Receipt>>;
}

/// Write access to blocks, transactions and receipts.
pub trait Writer {
    /// Sets the latest known height.
    fn set_latest_height(&self, height: u64) -> Result<()>;
    /// Stores `block`, indexing it by height and by hash.
    fn set_block(&self, block: &Block) -> Result<()>;
    /// Stores every block in `blocks` as one atomic batch.
    fn set_blocks(&self, blocks: &[Block]) -> Result<()>;
    /// Stores `tx` at `location`, indexing it by hash.
    fn set_transaction(&self, tx: &Transaction, location: TxLocation) -> Result<()>;
    /// Stores `receipt`, keyed by its transaction hash.
    fn set_receipt(&self, receipt: &Receipt) -> Result<()>;
    /// Stores every receipt in `receipts` as one atomic batch.
    fn set_receipts(&self, receipts: &[Receipt]) -> Result<()>;
    /// Appends `tx_hash` to `address`'s transaction sequence.
    fn add_transaction_to_address_index(&self, address: Address, tx_hash: B256) -> Result<()>;
    /// Removes the block at `height` and its hash index. Idempotent:
    /// deleting an absent height returns `Ok(())`.
    fn delete_block(&self, height: u64) -> Result<()>;
}

/// Read access to the block-range aggregates noted in §9's "sorting
/// top-N results" design note: top miners by block count, and top
/// addresses by transaction count / gas used.
///
/// Implementations are expected to use a bounded min-heap rather than
/// sorting the full tally when `limit` is small relative to the number of
/// distinct addresses in range.
pub trait AnalyticsReader {
    /// The `limit` addresses that mined the most blocks in `[from, to]`,
    /// descending by block count.
    fn get_top_miners(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>>;
    /// The `limit` sender addresses with the most transactions in
    /// `[from, to]`, descending by transaction count.
    fn get_top_addresses_by_tx_count(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>>;
    /// The `limit` sender addresses with the most cumulative gas used in
    /// `[from, to]`, descending by gas used.
    fn get_top_addresses_by_gas_used(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>>;
}

/// Read access to the log index and filter evaluation.
pub trait LogReader {
    /// Evaluates `filter` and returns every matching log.
    ///
    /// Ordering is ascending `(block, tx index, log index)` only when the
    /// primary scan is by block; a union-by-address or union-by-topic scan
    /// is an unordered set.
    fn get_logs(&self, filter: &LogFilter, token: &CancelToken) -> Result<Vec<Log>>;
}

/// Write access to the log index.
pub trait LogWriter {
    /// Stores `log` and its four secondary index entries as one batch.
    fn set_log(&self, log: &Log) -> Result<()>;
    /// Stores every log in `logs` as one atomic batch.
    fn set_logs(&self, logs: &[Log]) -> Result<()>;
}

/// Read access to historical per-address balances.
pub trait HistoricalReader {
    /// Balance of `address` at `block` (`0` means "latest").
    fn get_address_balance(&self, address: Address, block: u64, token: &CancelToken) -> Result<U256>;
    /// Balance-history snapshots for `address` with `from <= block <= to`.
    fn get_balance_history(
        &self,
        address: Address,
        from: u64,
        to: u64,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<BalanceSnapshot>>;
}

/// Write access to historical per-address balances.
pub trait HistoricalWriter {
    /// Applies `delta` to `address`'s latest balance at `block`, appending a
    /// snapshot and rejecting the call if the result would be negative.
    fn update_balance(
        &self,
        address: Address,
        block: u64,
        delta: SignedU256,
        causing_tx_hash: B256,
    ) -> Result<U256>;
    /// Sets `address`'s balance to the absolute value `balance` at `block`,
    /// implemented as `update_balance` with `delta = balance - latest`.
    fn set_balance(&self, address: Address, block: u64, balance: U256) -> Result<()>;
}

/// Read access to the WBFT consensus audit trail.
pub trait WbftReader {
    /// Fetches the WBFT extra data for the block at `height`.
    fn get_wbft_block_extra(&self, height: u64, token: &CancelToken) -> Result<WbftBlockExtra>;
    /// Fetches the validator/candidate set for `epoch`.
    fn get_epoch_info(&self, epoch: u64, token: &CancelToken) -> Result<EpochInfo>;
    /// Most recently advanced epoch number.
    fn get_latest_epoch(&self, token: &CancelToken) -> Result<u64>;
    /// Prepare/Commit signers observed for the block at `height`.
    fn get_block_signers(&self, height: u64, token: &CancelToken) -> Result<BlockSigners>;
    /// Signing activity for `validator` at `height`, if recorded.
    fn get_validator_activity(
        &self,
        validator: Address,
        height: u64,
        token: &CancelToken,
    ) -> Result<ValidatorSigningActivity>;
    /// Aggregated signing stats for `validator` over `[from, to]`. Returns
    /// zeros, not `NotFound`, if the validator has no activity in range.
    fn get_validator_signing_stats(
        &self,
        validator: Address,
        from: u64,
        to: u64,
        token: &CancelToken,
    ) -> Result<ValidatorSigningStats>;
    /// Aggregated signing stats for every validator active over
    /// `[from, to]`. O(blocks × validators); callers are expected to cap
    /// the range.
    fn get_all_validators_signing_stats(
        &self,
        from: u64,
        to: u64,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<(Address, ValidatorSigningStats)>>;
}

/// Write access to the WBFT consensus audit trail.
pub trait WbftWriter {
    /// Stores `extra`, advancing `/meta/wbft/latest-epoch` if it carries a
    /// newer epoch boundary.
    fn set_wbft_block_extra(&self, extra: &WbftBlockExtra) -> Result<()>;
    /// Records `activity`, updating both the activity table and the two
    /// existence-only signer indexes.
    fn set_validator_activity(&self, activity: &ValidatorSigningActivity) -> Result<()>;
}

/// Read access to contract creation, token transfers and internal calls.
pub trait DerivativesReader {
    /// Creation record for `contract`, if it was observed being deployed.
    fn get_contract_creation(&self, contract: Address, token: &CancelToken) -> Result<ContractCreation>;
    /// Contracts created by `creator`.
    fn get_contracts_by_creator(
        &self,
        creator: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<ContractCreation>>;
    /// ERC-20 transfers for `contract`.
    fn get_erc20_transfers_by_contract(
        &self,
        contract: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<Erc20Transfer>>;
    /// ERC-20 transfers sent from `address`.
    fn get_erc20_transfers_by_sender(
        &self,
        address: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<Erc20Transfer>>;
    /// ERC-20 transfers received by `address`.
    fn get_erc20_transfers_by_recipient(
        &self,
        address: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<Erc20Transfer>>;
    /// Cached current ERC-20 balance of `address` for `contract`.
    fn get_erc20_balance(&self, address: Address, contract: Address, token: &CancelToken) -> Result<U256>;
    /// ERC-721 transfers for `contract`.
    fn get_erc721_transfers_by_contract(
        &self,
        contract: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<Erc721Transfer>>;
    /// Current owner of `(contract, token_id)`.
    fn get_erc721_owner(&self, contract: Address, token_id: U256, token: &CancelToken) -> Result<Address>;
    /// Internal (sub-)transactions executed within `tx_hash`.
    fn get_internal_transactions(&self, tx_hash: B256, token: &CancelToken) -> Result<Vec<InternalTransaction>>;
    /// Internal transactions sent from `address` across all transactions.
    fn get_internal_transactions_by_sender(
        &self,
        address: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<InternalTransaction>>;
    /// Internal transactions received by `address` across all transactions.
    fn get_internal_transactions_by_recipient(
        &self,
        address: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<InternalTransaction>>;
}

/// Write access to contract creation, token transfers and internal calls.
pub trait DerivativesWriter {
    /// Records a newly deployed contract and its reverse creator index.
    fn set_contract_creation(&self, creation: &ContractCreation) -> Result<()>;
    /// Records an ERC-20 transfer and its three cross-indexes.
    fn set_erc20_transfer(&self, transfer: &Erc20Transfer) -> Result<()>;
    /// Records an ERC-721 transfer, its cross-indexes, and updates current
    /// ownership for `(contract, token_id)`.
    fn set_erc721_transfer(&self, transfer: &Erc721Transfer) -> Result<()>;
    /// Appends a sub-call to `tx_hash`'s internal-transaction list and its
    /// sender/recipient indexes.
    fn set_internal_transaction(&self, itx: &InternalTransaction) -> Result<()>;
}

/// Read access to system-contract events: mint/burn, governance, validator
/// and blacklist history, and active-set membership.
pub trait SystemContractReader {
    /// Mint events in `[from, to]`.
    fn get_mint_events(&self, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<MintEvent>>;
    /// Mint events for `actor` in `[from, to]`.
    fn get_mint_events_by_actor(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<MintEvent>>;
    /// Burn events in `[from, to]`.
    fn get_burn_events(&self, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<BurnEvent>>;
    /// Burn events for `actor` in `[from, to]`.
    fn get_burn_events_by_actor(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<BurnEvent>>;
    /// Minter-configuration history for `actor` in `[from, to]`.
    fn get_minter_config_history(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<MinterConfigEvent>>;
    /// Validator-set changes for `actor` in `[from, to]`.
    fn get_validator_changes(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<ValidatorChangeEvent>>;
    /// Blacklist history for `actor` in `[from, to]`.
    fn get_blacklist_events(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<BlacklistEvent>>;
    /// Emergency-pause history for `actor` in `[from, to]`.
    fn get_emergency_pause_history(&self, actor: Address, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<EmergencyPauseEvent>>;
    /// Gas-tip update history in `[from, to]`.
    fn get_gas_tip_history(&self, from: u64, to: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<GasTipUpdateEvent>>;
    /// `true` if `address` is currently an authorized minter.
    fn is_minter(&self, address: Address, token: &CancelToken) -> Result<bool>;
    /// `true` if `address` is currently an active validator.
    fn is_validator(&self, address: Address, token: &CancelToken) -> Result<bool>;
    /// `true` if `address` is currently blacklisted.
    fn is_blacklisted(&self, address: Address, token: &CancelToken) -> Result<bool>;
    /// Currently authorized minters.
    fn get_active_minters(&self, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Address>>;
    /// Currently active validators.
    fn get_active_validators(&self, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Address>>;
    /// Currently blacklisted addresses.
    fn get_blacklisted_addresses(&self, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Address>>;
    /// Current total supply.
    fn get_total_supply(&self, token: &CancelToken) -> Result<U256>;
    /// Fetches proposal `(contract, id)`.
    fn get_proposal(&self, contract: Address, id: u64, token: &CancelToken) -> Result<GovernanceProposal>;
    /// Proposals for `contract` currently in `status`.
    fn get_proposals(&self, contract: Address, status: ProposalStatus, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<GovernanceProposal>>;
    /// A single member's vote on `(contract, id)`.
    fn get_vote(&self, contract: Address, id: u64, voter: Address, token: &CancelToken) -> Result<ProposalVote>;
    /// Every vote cast on `(contract, id)`.
    fn get_votes(&self, contract: Address, id: u64, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<ProposalVote>>;
    /// Fetches deposit-mint proposal `(contract, id)`.
    fn get_deposit_mint_proposal(&self, contract: Address, id: u64, token: &CancelToken) -> Result<DepositMintProposal>;
}

/// Write access to system-contract events.
pub trait SystemContractWriter {
    /// Records a mint event and its by-actor index.
    fn set_mint_event(&self, event: &MintEvent) -> Result<()>;
    /// Records a burn event and its by-actor index.
    fn set_burn_event(&self, event: &BurnEvent) -> Result<()>;
    /// Records a minter-configuration change and updates the minter set.
    fn set_minter_config_event(&self, event: &MinterConfigEvent) -> Result<()>;
    /// Records a validator-set change and updates the validator set.
    fn set_validator_change_event(&self, event: &ValidatorChangeEvent) -> Result<()>;
    /// Records a blacklist change and updates the blacklist set.
    fn set_blacklist_event(&self, event: &BlacklistEvent) -> Result<()>;
    /// Records a gas-tip update.
    fn set_gas_tip_update(&self, event: &GasTipUpdateEvent) -> Result<()>;
    /// Records an emergency-pause toggle.
    fn set_emergency_pause_event(&self, event: &EmergencyPauseEvent) -> Result<()>;
    /// Applies `delta` to the total-supply cell.
    fn apply_total_supply_delta(&self, delta: SignedU256) -> Result<U256>;
    /// Inserts or overwrites `proposal`, maintaining the status index.
    fn set_proposal(&self, proposal: &GovernanceProposal) -> Result<()>;
    /// Atomically transitions `(contract, id)` to `status`: deletes the old
    /// status-index entry, rewrites the proposal, writes the new entry.
    fn update_proposal_status(
        &self,
        contract: Address,
        id: u64,
        status: ProposalStatus,
        executed_at: Option<u64>,
    ) -> Result<()>;
    /// Records `vote`.
    fn set_vote(&self, vote: &ProposalVote) -> Result<()>;
    /// Inserts or overwrites `proposal`.
    fn set_deposit_mint_proposal(&self, proposal: &DepositMintProposal) -> Result<()>;
}

/// Read access to source-code-verification metadata (ABI text presence).
pub trait ContractVerificationReader {
    /// `true` if `address`'s source has been verified.
    fn is_verified(&self, address: Address, token: &CancelToken) -> Result<bool>;
}

/// Write access to source-code-verification metadata.
pub trait ContractVerificationWriter {
    /// Marks `address` as verified (or not).
    fn set_verified(&self, address: Address, verified: bool) -> Result<()>;
}

/// Read access to stored contract ABI text.
pub trait AbiReader {
    /// Fetches the stored ABI JSON text for `address`.
    fn get_abi(&self, address: Address, token: &CancelToken) -> Result<String>;
}

/// Write access to stored contract ABI text.
pub trait AbiWriter {
    /// Stores `abi_json` for `address`.
    fn set_abi(&self, address: Address, abi_json: &str) -> Result<()>;
}

/// The unified lookup used by interactive search surfaces.
pub trait SearchReader {
    /// Detects the shape of `query` and dispatches to the matching
    /// lookup(s), returning at most `limit` results with no partial
    /// matching.
    fn search(&self, query: &str, types: &[SearchKind], limit: usize, token: &CancelToken) -> Result<Vec<SearchResult>>;
}

/// An external collaborator able to answer on-chain balance queries,
/// consumed only by the historical-balance genesis-initialization wrapper.
pub trait RpcClient {
    /// Balance of `address` at `block_number` as observed by the node.
    fn balance_at(&self, address: Address, block_number: u64) -> Result<U256>;
}
