//! Address derivatives: contract creation, token transfers, internal calls.

use alloy_primitives::{Address, B256, Bytes, U256};

/// One deployed contract, keyed by its address.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ContractCreation {
    /// Deployed contract address.
    pub contract_address: Address,
    /// Address that sent the creation transaction.
    pub creator: Address,
    /// Hash of the creation transaction.
    pub tx_hash: B256,
    /// Height at which the contract was created.
    pub block_number: u64,
    /// Unix timestamp, seconds.
    pub timestamp: u64,
    /// Size in bytes of the deployed bytecode.
    pub bytecode_size: u64,
}

/// An ERC-20 `Transfer` log, cross-indexed by contract, sender and
/// recipient.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Erc20Transfer {
    /// Hash of the transaction that emitted this transfer.
    pub tx_hash: B256,
    /// Index of the originating log within its block.
    pub log_index: u32,
    /// Token contract address.
    pub contract: Address,
    /// Sending address.
    pub from: Address,
    /// Receiving address.
    pub to: Address,
    /// Amount transferred, token-native precision.
    pub value: U256,
    /// Height of the containing block.
    pub block_number: u64,
    /// Unix timestamp, seconds.
    pub timestamp: u64,
}

/// An ERC-721 `Transfer` log, additionally cross-indexed by
/// `(contract, token id)` to track current ownership.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Erc721Transfer {
    /// Hash of the transaction that emitted this transfer.
    pub tx_hash: B256,
    /// Index of the originating log within its block.
    pub log_index: u32,
    /// Token contract address.
    pub contract: Address,
    /// Sending address (the zero address denotes a mint).
    pub from: Address,
    /// Receiving address (the zero address denotes a burn).
    pub to: Address,
    /// Token id transferred.
    pub token_id: U256,
    /// Height of the containing block.
    pub block_number: u64,
    /// Unix timestamp, seconds.
    pub timestamp: u64,
}

/// A sub-call inside a transaction.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct InternalTransaction {
    /// Hash of the enclosing top-level transaction.
    pub tx_hash: B256,
    /// Position of this call within the transaction's call tree, in
    /// trace-emission order.
    pub sequence: u32,
    /// Caller of this sub-call.
    pub from: Address,
    /// Callee of this sub-call; `None` for a `CREATE`/`CREATE2` that has not
    /// yet been assigned an address at trace time.
    pub to: Option<Address>,
    /// Value transferred by this sub-call.
    pub value: U256,
    /// Call input data.
    pub input: Bytes,
    /// Call kind, e.g. `"call"`, `"delegatecall"`, `"create"`.
    pub call_type: String,
    /// Height of the containing block.
    pub block_number: u64,
}
