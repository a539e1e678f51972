//! Encoding and decoding for every value the engine persists.
//!
//! On-chain-shaped entities (blocks, transactions, receipts, logs) use
//! canonical RLP so the stored bytes match what a node would produce.
//! Everything else — balances, consensus audit records, derivative
//! indexes, system-contract events — uses bincode over their serde
//! derives. Integers get their own fixed-width and minimal encodings so
//! key segments sort lexicographically in numeric order.

pub mod integers;
pub mod rlp;
pub mod structs;

pub use integers::{decode_big_int, decode_u64, encode_big_int, encode_u64};
pub use rlp::{
    decode_block_header, decode_log_body, decode_receipt_body, decode_transaction_body, decode_tx_location,
    encode_block_header, encode_log_body, encode_receipt_body, encode_transaction_body, encode_tx_location,
};
pub use structs::{decode, encode};
