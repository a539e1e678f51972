//! Key construction for the ordered key/value schema.
//!
//! Every function here builds one key as a byte vector; none of them touch
//! a backend. Prefix scans pair a prefix from this module with the
//! backend's own upper-bound helper.

pub mod segments;

use alloy_primitives::{Address, B256, U256};
use segments::{addr, hash, narrow, wide, wide_u256};

fn join(parts: &[&str]) -> Vec<u8> {
    parts.join("/").into_bytes()
}

/// Parses the trailing `{h}/{ti}/{li}` segments off an index key whose
/// value is an existence marker — the log, ERC-20/721 and internal-tx
/// block/topic/address indexes all share this suffix shape.
///
/// Returns `None` if `key` has fewer than three `/`-delimited segments or
/// any of the trailing three fail to parse as their expected width.
#[must_use]
pub fn parse_block_tx_log_suffix(key: &[u8]) -> Option<(u64, u32, u32)> {
    let mut segments = key.rsplit(|&b| b == b'/');
    let log_index = segments.next()?;
    let tx_index = segments.next()?;
    let height = segments.next()?;
    Some((
        segments::parse_wide(height)?,
        segments::parse_narrow(tx_index)?,
        segments::parse_narrow(log_index)?,
    ))
}

/// Parses the trailing `{txhash}/{seq}` segments off an internal-transaction
/// sender/recipient index key.
///
/// Returns `None` if `key` has fewer than two `/`-delimited segments or
/// either trailing segment fails to parse.
#[must_use]
pub fn parse_tx_seq_suffix(key: &[u8]) -> Option<(B256, u32)> {
    let mut segments = key.rsplit(|&b| b == b'/');
    let seq = segments.next()?;
    let tx_hash = segments.next()?;
    Some((parse_hash(tx_hash)?, segments::parse_narrow(seq)?))
}

fn parse_hash(segment: &[u8]) -> Option<B256> {
    let text = std::str::from_utf8(segment).ok()?;
    let bytes = alloy_primitives::hex::decode(text).ok()?;
    B256::try_from(bytes.as_slice()).ok()
}

// --- /meta ---------------------------------------------------------------

/// `/meta/lh` — latest indexed height.
#[must_use]
pub fn latest_height() -> Vec<u8> {
    b"/meta/lh".to_vec()
}

/// `/meta/bc` — total block count.
#[must_use]
pub fn block_count() -> Vec<u8> {
    b"/meta/bc".to_vec()
}

/// `/meta/tc` — total transaction count.
#[must_use]
pub fn tx_count() -> Vec<u8> {
    b"/meta/tc".to_vec()
}

/// `/meta/supply` — total token supply.
#[must_use]
pub fn total_supply() -> Vec<u8> {
    b"/meta/supply".to_vec()
}

/// `/meta/wbft/latest-epoch` — latest known epoch number.
#[must_use]
pub fn wbft_latest_epoch() -> Vec<u8> {
    b"/meta/wbft/latest-epoch".to_vec()
}

/// `/meta/addr-seq/{addr}` — per-address tx-sequence counter.
#[must_use]
pub fn addr_seq_counter(address: Address) -> Vec<u8> {
    join(&["", "meta", "addr-seq", &addr(address)])
}

/// `/meta/balance-seq/{addr}` — per-address balance-history sequence counter.
#[must_use]
pub fn balance_seq_counter(address: Address) -> Vec<u8> {
    join(&["", "meta", "balance-seq", &addr(address)])
}

// --- /data/blocks, /data/txs, /data/receipts ------------------------------

/// `/data/blocks/{h}`.
#[must_use]
pub fn block(height: u64) -> Vec<u8> {
    join(&["", "data", "blocks", &wide(height)])
}

/// `/data/blocks/` prefix, for a full scan.
#[must_use]
pub fn block_prefix() -> Vec<u8> {
    b"/data/blocks/".to_vec()
}

/// `/data/txs/{h}/{i}`.
#[must_use]
pub fn tx(height: u64, index: u32) -> Vec<u8> {
    join(&["", "data", "txs", &wide(height), &narrow(index)])
}

/// `/data/txs/{h}/` prefix, every transaction in a block.
#[must_use]
pub fn tx_block_prefix(height: u64) -> Vec<u8> {
    join(&["", "data", "txs", &wide(height), ""])
}

/// `/data/receipts/{txhash}`.
#[must_use]
pub fn receipt(tx_hash: B256) -> Vec<u8> {
    join(&["", "data", "receipts", &hash(tx_hash)])
}

// --- /index/txh, /index/blockh, /index/addr, /index/time ------------------

/// `/index/txh/{txhash}` — transaction-hash lookup, value is a `TxLocation`.
#[must_use]
pub fn tx_hash_index(tx_hash: B256) -> Vec<u8> {
    join(&["", "index", "txh", &hash(tx_hash)])
}

/// `/index/blockh/{blockhash}` — block-hash lookup, value is a block height.
#[must_use]
pub fn block_hash_index(block_hash: B256) -> Vec<u8> {
    join(&["", "index", "blockh", &hash(block_hash)])
}

/// `/index/addr/{addr}/{seq}` — one address's transactions, sequence order.
#[must_use]
pub fn addr_tx_index(address: Address, seq: u64) -> Vec<u8> {
    join(&["", "index", "addr", &addr(address), &wide(seq)])
}

/// `/index/addr/{addr}/` prefix, every transaction touching `address`.
#[must_use]
pub fn addr_tx_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "addr", &addr(address), ""])
}

/// `/index/time/{ts}/{h}` — block lookup by timestamp.
#[must_use]
pub fn time_index(timestamp: u64, height: u64) -> Vec<u8> {
    join(&["", "index", "time", &wide(timestamp), &wide(height)])
}

// --- /index/balance --------------------------------------------------------

/// `/index/balance/{addr}/history/{seq}` — one balance-history entry.
#[must_use]
pub fn balance_history(address: Address, seq: u64) -> Vec<u8> {
    join(&["", "index", "balance", &addr(address), "history", &wide(seq)])
}

/// `/index/balance/{addr}/history/` prefix, an address's full history.
#[must_use]
pub fn balance_history_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "balance", &addr(address), "history", ""])
}

/// `/index/balance/{addr}/latest` — the address's current balance snapshot.
#[must_use]
pub fn balance_latest(address: Address) -> Vec<u8> {
    join(&["", "index", "balance", &addr(address), "latest"])
}

// --- /data/logs, /index/logs ------------------------------------------------

/// `/data/logs/{h}/{ti}/{li}`.
#[must_use]
pub fn log(height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "data", "logs", &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/logs/block/{h}/{ti}/{li}` — existence marker, every log in a block.
#[must_use]
pub fn log_block_index(height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "logs", "block", &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/logs/block/{h}/` prefix.
#[must_use]
pub fn log_block_prefix(height: u64) -> Vec<u8> {
    join(&["", "index", "logs", "block", &wide(height), ""])
}

/// `/index/logs/addr/{addr}/{h}/{ti}/{li}` — existence marker.
#[must_use]
pub fn log_addr_index(address: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "logs", "addr", &addr(address), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/logs/addr/{addr}/` prefix.
#[must_use]
pub fn log_addr_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "logs", "addr", &addr(address), ""])
}

/// `/index/logs/topic{position}/{topic}/{h}/{ti}/{li}` — existence marker.
///
/// `position` must be `0..4`; callers validate this before calling.
#[must_use]
pub fn log_topic_index(position: usize, topic: B256, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&[
        "",
        "index",
        "logs",
        &format!("topic{position}"),
        &hash(topic),
        &wide(height),
        &narrow(tx_index),
        &narrow(log_index),
    ])
}

/// `/index/logs/topic{position}/{topic}/` prefix.
#[must_use]
pub fn log_topic_prefix(position: usize, topic: B256) -> Vec<u8> {
    join(&["", "index", "logs", &format!("topic{position}"), &hash(topic), ""])
}

// --- /data/wbft, /index/wbft ------------------------------------------------

/// `/data/wbft/extra/{h}`.
#[must_use]
pub fn wbft_extra(height: u64) -> Vec<u8> {
    join(&["", "data", "wbft", "extra", &wide(height)])
}

/// `/data/wbft/epoch/{e}`.
#[must_use]
pub fn wbft_epoch(epoch: u64) -> Vec<u8> {
    join(&["", "data", "wbft", "epoch", &wide(epoch)])
}

/// `/index/wbft/activity/{validator}/{h}` — per-validator, per-block activity.
#[must_use]
pub fn wbft_activity(validator: Address, height: u64) -> Vec<u8> {
    join(&["", "index", "wbft", "activity", &addr(validator), &wide(height)])
}

/// `/index/wbft/activity/{validator}/` prefix, a validator's full history.
#[must_use]
pub fn wbft_activity_prefix(validator: Address) -> Vec<u8> {
    join(&["", "index", "wbft", "activity", &addr(validator), ""])
}

/// `/index/wbft/activity/` prefix, the entire activity table across every
/// validator — used to discover which validators were active in a block
/// range without going through epoch indirection.
#[must_use]
pub fn wbft_activity_table_prefix() -> Vec<u8> {
    join(&["", "index", "wbft", "activity", ""])
}

/// `/index/wbft/signers/prepare/{h}/{validator}` — existence marker.
#[must_use]
pub fn wbft_prepare_signer(height: u64, validator: Address) -> Vec<u8> {
    join(&["", "index", "wbft", "signers", "prepare", &wide(height), &addr(validator)])
}

/// `/index/wbft/signers/prepare/{h}/` prefix, every Prepare signer for a block.
#[must_use]
pub fn wbft_prepare_signers_prefix(height: u64) -> Vec<u8> {
    join(&["", "index", "wbft", "signers", "prepare", &wide(height), ""])
}

/// `/index/wbft/signers/commit/{h}/{validator}` — existence marker.
#[must_use]
pub fn wbft_commit_signer(height: u64, validator: Address) -> Vec<u8> {
    join(&["", "index", "wbft", "signers", "commit", &wide(height), &addr(validator)])
}

/// `/index/wbft/signers/commit/{h}/` prefix, every Commit signer for a block.
#[must_use]
pub fn wbft_commit_signers_prefix(height: u64) -> Vec<u8> {
    join(&["", "index", "wbft", "signers", "commit", &wide(height), ""])
}

// --- /data/gov, /index/gov --------------------------------------------------

/// `/data/gov/proposal/{contract}/{id}`.
#[must_use]
pub fn gov_proposal(contract: Address, id: u64) -> Vec<u8> {
    join(&["", "data", "gov", "proposal", &addr(contract), &wide(id)])
}

/// `/index/gov/proposal-status/{contract}/{status}/{id}`.
#[must_use]
pub fn gov_proposal_status_index(contract: Address, status: &str, id: u64) -> Vec<u8> {
    join(&["", "index", "gov", "proposal-status", &addr(contract), status, &wide(id)])
}

/// `/index/gov/proposal-status/{contract}/{status}/` prefix.
#[must_use]
pub fn gov_proposal_status_prefix(contract: Address, status: &str) -> Vec<u8> {
    join(&["", "index", "gov", "proposal-status", &addr(contract), status, ""])
}

/// `/data/gov/vote/{contract}/{id}/{voter}`.
#[must_use]
pub fn gov_vote(contract: Address, id: u64, voter: Address) -> Vec<u8> {
    join(&["", "data", "gov", "vote", &addr(contract), &wide(id), &addr(voter)])
}

/// `/data/gov/vote/{contract}/{id}/` prefix, every vote on one proposal.
#[must_use]
pub fn gov_votes_prefix(contract: Address, id: u64) -> Vec<u8> {
    join(&["", "data", "gov", "vote", &addr(contract), &wide(id), ""])
}

// --- /data/contract, /index/contract (derivatives) --------------------------

/// `/data/contract/{addr}`.
#[must_use]
pub fn contract_creation(address: Address) -> Vec<u8> {
    join(&["", "data", "contract", &addr(address)])
}

/// `/index/contract/by-creator/{creator}/{addr}`.
#[must_use]
pub fn contract_by_creator(creator: Address, contract: Address) -> Vec<u8> {
    join(&["", "index", "contract", "by-creator", &addr(creator), &addr(contract)])
}

/// `/index/contract/by-creator/{creator}/` prefix.
#[must_use]
pub fn contract_by_creator_prefix(creator: Address) -> Vec<u8> {
    join(&["", "index", "contract", "by-creator", &addr(creator), ""])
}

// --- /data/erc20, /index/erc20 ----------------------------------------------

/// `/data/erc20/transfer/{txhash}/{li}`.
#[must_use]
pub fn erc20_transfer(tx_hash: B256, log_index: u32) -> Vec<u8> {
    join(&["", "data", "erc20", "transfer", &hash(tx_hash), &narrow(log_index)])
}

/// `/index/erc20/by-contract/{contract}/{h}/{ti}/{li}`.
#[must_use]
pub fn erc20_by_contract(contract: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "erc20", "by-contract", &addr(contract), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/erc20/by-contract/{contract}/` prefix.
#[must_use]
pub fn erc20_by_contract_prefix(contract: Address) -> Vec<u8> {
    join(&["", "index", "erc20", "by-contract", &addr(contract), ""])
}

/// `/index/erc20/by-from/{addr}/{h}/{ti}/{li}`.
#[must_use]
pub fn erc20_by_from(address: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "erc20", "by-from", &addr(address), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/erc20/by-from/{addr}/` prefix.
#[must_use]
pub fn erc20_by_from_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "erc20", "by-from", &addr(address), ""])
}

/// `/index/erc20/by-to/{addr}/{h}/{ti}/{li}`.
#[must_use]
pub fn erc20_by_to(address: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "erc20", "by-to", &addr(address), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/erc20/by-to/{addr}/` prefix.
#[must_use]
pub fn erc20_by_to_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "erc20", "by-to", &addr(address), ""])
}

/// `/index/erc20/balance/{addr}/{contract}` — cached current token balance.
#[must_use]
pub fn erc20_balance(address: Address, contract: Address) -> Vec<u8> {
    join(&["", "index", "erc20", "balance", &addr(address), &addr(contract)])
}

// --- /data/erc721, /index/erc721 ---------------------------------------------

/// `/data/erc721/transfer/{txhash}/{li}`.
#[must_use]
pub fn erc721_transfer(tx_hash: B256, log_index: u32) -> Vec<u8> {
    join(&["", "data", "erc721", "transfer", &hash(tx_hash), &narrow(log_index)])
}

/// `/index/erc721/by-contract/{contract}/{h}/{ti}/{li}`.
#[must_use]
pub fn erc721_by_contract(contract: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "erc721", "by-contract", &addr(contract), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/erc721/by-contract/{contract}/` prefix.
#[must_use]
pub fn erc721_by_contract_prefix(contract: Address) -> Vec<u8> {
    join(&["", "index", "erc721", "by-contract", &addr(contract), ""])
}

/// `/index/erc721/by-from/{addr}/{h}/{ti}/{li}`.
#[must_use]
pub fn erc721_by_from(address: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "erc721", "by-from", &addr(address), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/erc721/by-from/{addr}/` prefix.
#[must_use]
pub fn erc721_by_from_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "erc721", "by-from", &addr(address), ""])
}

/// `/index/erc721/by-to/{addr}/{h}/{ti}/{li}`.
#[must_use]
pub fn erc721_by_to(address: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "erc721", "by-to", &addr(address), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/erc721/by-to/{addr}/` prefix.
#[must_use]
pub fn erc721_by_to_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "erc721", "by-to", &addr(address), ""])
}

/// `/index/erc721/owner/{contract}/{tokenid}` — current owner.
#[must_use]
pub fn erc721_owner(contract: Address, token_id: U256) -> Vec<u8> {
    join(&["", "index", "erc721", "owner", &addr(contract), &wide_u256(token_id)])
}

// --- /data/itx, /index/itx ----------------------------------------------------

/// `/data/itx/{txhash}/{seq}`.
#[must_use]
pub fn internal_tx(tx_hash: B256, seq: u32) -> Vec<u8> {
    join(&["", "data", "itx", &hash(tx_hash), &narrow(seq)])
}

/// `/data/itx/{txhash}/` prefix, every internal call of one transaction.
#[must_use]
pub fn internal_tx_prefix(tx_hash: B256) -> Vec<u8> {
    join(&["", "data", "itx", &hash(tx_hash), ""])
}

/// `/index/itx/by-sender/{addr}/{txhash}/{seq}`.
#[must_use]
pub fn internal_tx_by_sender(address: Address, tx_hash: B256, seq: u32) -> Vec<u8> {
    join(&["", "index", "itx", "by-sender", &addr(address), &hash(tx_hash), &narrow(seq)])
}

/// `/index/itx/by-sender/{addr}/` prefix.
#[must_use]
pub fn internal_tx_by_sender_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "itx", "by-sender", &addr(address), ""])
}

/// `/index/itx/by-recipient/{addr}/{txhash}/{seq}`.
#[must_use]
pub fn internal_tx_by_recipient(address: Address, tx_hash: B256, seq: u32) -> Vec<u8> {
    join(&["", "index", "itx", "by-recipient", &addr(address), &hash(tx_hash), &narrow(seq)])
}

/// `/index/itx/by-recipient/{addr}/` prefix.
#[must_use]
pub fn internal_tx_by_recipient_prefix(address: Address) -> Vec<u8> {
    join(&["", "index", "itx", "by-recipient", &addr(address), ""])
}

// --- /data/events, /index/events, /index/active -------------------------------

/// `/data/events/mint/{h}/{ti}/{li}`.
#[must_use]
pub fn mint_event(height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "data", "events", "mint", &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/data/events/mint/` prefix, every mint in range (combine with comparisons on the decoded record for `from`/`to`).
#[must_use]
pub fn mint_event_prefix() -> Vec<u8> {
    b"/data/events/mint/".to_vec()
}

/// `/index/events/mint/by-actor/{addr}/{h}/{ti}/{li}`.
#[must_use]
pub fn mint_event_by_actor(actor: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "events", "mint", "by-actor", &addr(actor), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/events/mint/by-actor/{addr}/` prefix.
#[must_use]
pub fn mint_event_by_actor_prefix(actor: Address) -> Vec<u8> {
    join(&["", "index", "events", "mint", "by-actor", &addr(actor), ""])
}

/// `/data/events/burn/{h}/{ti}/{li}`.
#[must_use]
pub fn burn_event(height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "data", "events", "burn", &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/data/events/burn/` prefix.
#[must_use]
pub fn burn_event_prefix() -> Vec<u8> {
    b"/data/events/burn/".to_vec()
}

/// `/index/events/burn/by-actor/{addr}/{h}/{ti}/{li}`.
#[must_use]
pub fn burn_event_by_actor(actor: Address, height: u64, tx_index: u32, log_index: u32) -> Vec<u8> {
    join(&["", "index", "events", "burn", "by-actor", &addr(actor), &wide(height), &narrow(tx_index), &narrow(log_index)])
}

/// `/index/events/burn/by-actor/{addr}/` prefix.
#[must_use]
pub fn burn_event_by_actor_prefix(actor: Address) -> Vec<u8> {
    join(&["", "index", "events", "burn", "by-actor", &addr(actor), ""])
}

/// `/data/events/minter-config/{addr}/{h}`.
#[must_use]
pub fn minter_config_event(actor: Address, height: u64) -> Vec<u8> {
    join(&["", "data", "events", "minter-config", &addr(actor), &wide(height)])
}

/// `/data/events/minter-config/{addr}/` prefix.
#[must_use]
pub fn minter_config_history_prefix(actor: Address) -> Vec<u8> {
    join(&["", "data", "events", "minter-config", &addr(actor), ""])
}

/// `/data/events/validator-change/{addr}/{h}`.
#[must_use]
pub fn validator_change_event(actor: Address, height: u64) -> Vec<u8> {
    join(&["", "data", "events", "validator-change", &addr(actor), &wide(height)])
}

/// `/data/events/validator-change/{addr}/` prefix.
#[must_use]
pub fn validator_change_history_prefix(actor: Address) -> Vec<u8> {
    join(&["", "data", "events", "validator-change", &addr(actor), ""])
}

/// `/data/events/blacklist/{addr}/{h}`.
#[must_use]
pub fn blacklist_event(actor: Address, height: u64) -> Vec<u8> {
    join(&["", "data", "events", "blacklist", &addr(actor), &wide(height)])
}

/// `/data/events/blacklist/{addr}/` prefix.
#[must_use]
pub fn blacklist_history_prefix(actor: Address) -> Vec<u8> {
    join(&["", "data", "events", "blacklist", &addr(actor), ""])
}

/// `/data/events/gas-tip/{h}`.
#[must_use]
pub fn gas_tip_event(height: u64) -> Vec<u8> {
    join(&["", "data", "events", "gas-tip", &wide(height)])
}

/// `/data/events/gas-tip/` prefix.
#[must_use]
pub fn gas_tip_history_prefix() -> Vec<u8> {
    b"/data/events/gas-tip/".to_vec()
}

/// `/data/events/emergency-pause/{addr}/{h}`.
#[must_use]
pub fn emergency_pause_event(actor: Address, height: u64) -> Vec<u8> {
    join(&["", "data", "events", "emergency-pause", &addr(actor), &wide(height)])
}

/// `/data/events/emergency-pause/{addr}/` prefix.
#[must_use]
pub fn emergency_pause_history_prefix(actor: Address) -> Vec<u8> {
    join(&["", "data", "events", "emergency-pause", &addr(actor), ""])
}

/// `/data/events/deposit-mint-proposal/{contract}/{id}`.
#[must_use]
pub fn deposit_mint_proposal(contract: Address, id: u64) -> Vec<u8> {
    join(&["", "data", "events", "deposit-mint-proposal", &addr(contract), &wide(id)])
}

/// `/index/active/minters/{addr}` — membership marker.
#[must_use]
pub fn active_minter(address: Address) -> Vec<u8> {
    join(&["", "index", "active", "minters", &addr(address)])
}

/// `/index/active/minters/` prefix.
#[must_use]
pub fn active_minters_prefix() -> Vec<u8> {
    b"/index/active/minters/".to_vec()
}

/// `/index/active/validators/{addr}` — membership marker.
#[must_use]
pub fn active_validator(address: Address) -> Vec<u8> {
    join(&["", "index", "active", "validators", &addr(address)])
}

/// `/index/active/validators/` prefix.
#[must_use]
pub fn active_validators_prefix() -> Vec<u8> {
    b"/index/active/validators/".to_vec()
}

/// `/index/active/blacklist/{addr}` — membership marker.
#[must_use]
pub fn active_blacklisted(address: Address) -> Vec<u8> {
    join(&["", "index", "active", "blacklist", &addr(address)])
}

/// `/index/active/blacklist/` prefix.
#[must_use]
pub fn active_blacklist_prefix() -> Vec<u8> {
    b"/index/active/blacklist/".to_vec()
}

// --- /data/abi, /data/verification --------------------------------------------

/// `/data/abi/{addr}` — stored ABI text.
#[must_use]
pub fn abi(address: Address) -> Vec<u8> {
    join(&["", "data", "abi", &addr(address)])
}

/// `/data/verification/{addr}` — presence implies "verified".
#[must_use]
pub fn verification(address: Address) -> Vec<u8> {
    join(&["", "data", "verification", &addr(address)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn block_keys_sort_numerically() {
        assert!(block(9) < block(10));
        assert!(block(99) < block(100));
    }

    #[test]
    fn tx_keys_sort_by_height_then_index() {
        assert!(tx(5, 9) < tx(5, 10));
        assert!(tx(5, 999) < tx(6, 0));
    }

    #[test]
    fn addr_tx_index_shares_prefix_per_address() {
        let a = address!("0000000000000000000000000000000000000001");
        let b = address!("0000000000000000000000000000000000000002");
        assert!(addr_tx_index(a, 1).starts_with(&addr_tx_prefix(a)));
        assert!(!addr_tx_index(a, 1).starts_with(&addr_tx_prefix(b)));
    }

    #[test]
    fn hash_and_addr_segments_are_lowercase_hex_without_prefix() {
        let a = address!("000000000000000000000000000000000000ab");
        let key = String::from_utf8(contract_creation(a)).unwrap();
        assert!(!key.contains("0x"));
        assert_eq!(key, format!("/data/contract/{}", segments::addr(a)));
    }

    #[test]
    fn log_topic_index_is_distinct_per_position() {
        let topic = B256::repeat_byte(7);
        assert_ne!(log_topic_prefix(0, topic), log_topic_prefix(1, topic));
    }

    #[test]
    fn block_tx_log_suffix_roundtrips() {
        let a = address!("0000000000000000000000000000000000000a");
        let key = log_addr_index(a, 42, 3, 7);
        assert_eq!(parse_block_tx_log_suffix(&key), Some((42, 3, 7)));
    }

    #[test]
    fn tx_seq_suffix_roundtrips() {
        let a = address!("0000000000000000000000000000000000000b");
        let tx_hash = B256::repeat_byte(0x5a);
        let key = internal_tx_by_sender(a, tx_hash, 9);
        assert_eq!(parse_tx_seq_suffix(&key), Some((tx_hash, 9)));
    }
}
