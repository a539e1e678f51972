//! Blocks, transactions, receipts and logs.

use alloy_primitives::{Address, B256, Bytes, U256};

/// A finalized EVM block.
///
/// Owned by the primary blocks table; referenced by the hash index, the
/// timestamp index, and every transaction it contains.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Block height. Keys the primary blocks table.
    pub number: u64,
    /// Block hash.
    pub hash: B256,
    /// Parent block hash.
    pub parent_hash: B256,
    /// Block proposer / fee recipient.
    pub coinbase: Address,
    /// Unix timestamp, seconds.
    pub timestamp: u64,
    /// Gas limit for the block.
    pub gas_limit: u64,
    /// Gas actually used by all transactions in the block.
    pub gas_used: u64,
    /// Post-EIP-1559 base fee, if the chain has activated it at this height.
    pub base_fee_per_gas: Option<U256>,
    /// Opaque extra-data field; on WBFT chains this carries the encoded
    /// [`crate::consensus::WbftBlockExtra`].
    pub extra_data: Bytes,
    /// Transactions included in this block, in block order.
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Number of transactions in the block.
    #[must_use]
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// The EIP-2718 typed-transaction envelope tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxKind {
    /// Pre-EIP-2718 legacy transaction.
    Legacy,
    /// EIP-2930 access-list transaction.
    Eip2930,
    /// EIP-1559 dynamic-fee transaction.
    Eip1559,
    /// EIP-4844 blob transaction.
    Eip4844,
}

impl TxKind {
    /// The single-byte type tag used in the typed envelope.
    #[must_use]
    pub const fn type_byte(self) -> u8 {
        match self {
            Self::Legacy => 0x00,
            Self::Eip2930 => 0x01,
            Self::Eip1559 => 0x02,
            Self::Eip4844 => 0x03,
        }
    }

    /// Recovers a [`TxKind`] from its type byte.
    #[must_use]
    pub const fn from_type_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Self::Legacy),
            0x01 => Some(Self::Eip2930),
            0x02 => Some(Self::Eip1559),
            0x03 => Some(Self::Eip4844),
            _ => None,
        }
    }
}

/// One entry of an EIP-2930 access list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessListEntry {
    /// Address granted warm access.
    pub address: Address,
    /// Storage slots granted warm access.
    pub storage_keys: Vec<B256>,
}

/// An EVM transaction.
///
/// A transaction is indexed only as part of the block it belongs to; the
/// hash index points to a unique `(block height, tx index, block hash)`
/// location, never to the transaction body directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction hash.
    pub hash: B256,
    /// Typed-envelope tag; preserved across encode/decode.
    pub tx_kind: TxKind,
    /// Chain id, absent only for genuinely pre-EIP-155 legacy transactions.
    pub chain_id: Option<u64>,
    /// Sender-assigned nonce.
    pub nonce: u64,
    /// Recipient; `None` denotes a contract-creation transaction.
    pub to: Option<Address>,
    /// Value transferred, arbitrary precision.
    pub value: U256,
    /// Legacy / EIP-2930 gas price. `None` for EIP-1559/4844 transactions.
    pub gas_price: Option<U256>,
    /// EIP-1559/4844 max fee per gas.
    pub max_fee_per_gas: Option<U256>,
    /// EIP-1559/4844 max priority fee per gas.
    pub max_priority_fee_per_gas: Option<U256>,
    /// Gas limit.
    pub gas_limit: u64,
    /// Call data / init code.
    pub input: Bytes,
    /// EIP-2930/1559/4844 access list; empty for legacy transactions.
    pub access_list: Vec<AccessListEntry>,
    /// Sender, recovered by the fetcher and stored verbatim (the engine
    /// never performs signature recovery).
    pub from: Address,
    /// Location within its containing block, restored from the lookup key
    /// on read rather than trusted from the encoded payload.
    pub location: Option<TxLocation>,
}

impl Transaction {
    /// Height of the block this transaction was indexed under, if known.
    #[must_use]
    pub fn block_number(&self) -> Option<u64> {
        self.location.as_ref().map(|loc| loc.block_number)
    }

    /// Hash of the block this transaction was indexed under, if known.
    #[must_use]
    pub fn block_hash(&self) -> Option<B256> {
        self.location.as_ref().map(|loc| loc.block_hash)
    }

    /// Index of this transaction within its containing block, if known.
    #[must_use]
    pub fn tx_index(&self) -> Option<u32> {
        self.location.as_ref().map(|loc| loc.tx_index)
    }
}

/// `(block height, tx index in block, block hash)` — the unique location of
/// a transaction, used as the value of the tx-hash index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TxLocation {
    /// Height of the containing block.
    pub block_number: u64,
    /// Index of the transaction within the block.
    pub tx_index: u32,
    /// Hash of the containing block.
    pub block_hash: B256,
}

/// An emitted log (event) record.
///
/// Stored once as a full record at `/data/logs/...`; four secondary indexes
/// (address + up to four topics) hold an existence marker only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Log {
    /// Contract that emitted the log.
    pub address: Address,
    /// 0..4 indexed topics.
    pub topics: Vec<B256>,
    /// Non-indexed event data.
    pub data: Bytes,
    /// Height of the containing block.
    pub block_number: u64,
    /// Index of the containing transaction within its block.
    pub tx_index: u32,
    /// Hash of the transaction that emitted this log.
    pub tx_hash: B256,
    /// Index of this log within its block.
    pub log_index: u32,
}

impl Log {
    /// The topic at `position`, if the log has that many topics.
    #[must_use]
    pub fn topic(&self, position: usize) -> Option<&B256> {
        self.topics.get(position)
    }
}

/// A transaction receipt.
///
/// `tx_hash` is never trusted from the encoded payload at decode time — it
/// is restored by the caller from the `/data/receipts/{txhash}` lookup key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Hash of the transaction this receipt belongs to. Restored from the
    /// storage key on read, independent of the encoded body.
    pub tx_hash: B256,
    /// `true` if the transaction succeeded.
    pub status: bool,
    /// Cumulative gas used by the block up to and including this tx.
    pub cumulative_gas_used: u64,
    /// Gas used by this transaction alone.
    pub gas_used: u64,
    /// Logs emitted by this transaction.
    pub logs: Vec<Log>,
    /// Address of the contract created, if this was a successful creation.
    pub contract_address: Option<Address>,
    /// Type tag, matches the originating transaction's [`TxKind`].
    pub tx_kind: TxKind,
    /// Bloom filter over `address` and `topics` of every log in `logs`,
    /// computed by the fetcher and stored verbatim as a fast pre-reject
    /// ahead of the per-topic index; never load-bearing for correctness.
    pub logs_bloom: Box<[u8; 256]>,
}
