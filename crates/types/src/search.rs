//! The unified search surface's query and result shapes.

use alloy_primitives::{Address, B256, U256};

/// The category of a query or result, as detected by
/// [`crate::traits::SearchReader::search`]'s shape dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchKind {
    /// A block, matched by number or hash.
    Block,
    /// A transaction, matched by hash.
    Transaction,
    /// A plain externally-owned address.
    Address,
    /// An address with stored ABI/verification metadata.
    Contract,
}

/// Small per-result metadata accompanying a [`SearchResult`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchMetadata {
    /// Block number, if the result is block-shaped.
    pub block_number: Option<u64>,
    /// Unix timestamp, seconds, if known.
    pub timestamp: Option<u64>,
    /// Transaction count, if the result is a block.
    pub tx_count: Option<u64>,
    /// Sender address, if the result is a transaction.
    pub sender: Option<Address>,
    /// Value transferred, if the result is a transaction.
    pub value: Option<U256>,
    /// Gas used, if the result is a transaction.
    pub gas: Option<u64>,
}

/// One match returned by [`crate::traits::SearchReader::search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    /// What kind of entity this result represents.
    pub kind: SearchKind,
    /// Block number, for block results.
    pub block_number: Option<u64>,
    /// Block hash, for block results.
    pub block_hash: Option<B256>,
    /// Transaction hash, for transaction results.
    pub tx_hash: Option<B256>,
    /// Address, for address/contract results.
    pub address: Option<Address>,
    /// Accompanying metadata.
    pub metadata: SearchMetadata,
}
