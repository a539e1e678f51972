//! The unified search surface (§4.9): one entry point that detects the
//! shape of a free-text query and dispatches to the matching lookup(s).
//!
//! Shape dispatch, exactly as specified:
//! - all decimal digits → a block number;
//! - 64 hex digits → tentatively a block hash, then (if that misses, or
//!   independently) a transaction hash;
//! - 40 hex digits → an address, classified `Contract` if a stored ABI
//!   exists for it and `Address` otherwise — both may be returned if
//!   `types` allows both.
//!
//! This crate never touches a backend directly: it is built entirely atop
//! the `Reader`/`AbiReader`/`ContractVerificationReader` traits so it has no
//! dependency on any one storage crate's concrete type, matching the
//! engine's "owned values + lookup keys, no cross-crate coupling beyond
//! trait seams" design (§9).

use std::sync::Arc;

use alloy_primitives::{Address, B256};

use chainidx_types::{
    AbiReader, CancelToken, ContractVerificationReader, Error, Reader, Result, SearchKind, SearchMetadata,
    SearchResult, SearchReader,
};

/// Dispatches a free-text query to block/transaction/address/contract
/// lookups, built atop whichever concrete stores the embedder wires in.
pub struct SearchEngine {
    reader: Arc<dyn Reader>,
    abi: Arc<dyn AbiReader>,
    verification: Arc<dyn ContractVerificationReader>,
}

impl SearchEngine {
    /// Wraps the reader traits `search` dispatches to.
    #[must_use]
    pub fn new(reader: Arc<dyn Reader>, abi: Arc<dyn AbiReader>, verification: Arc<dyn ContractVerificationReader>) -> Self {
        Self { reader, abi, verification }
    }

    fn type_allowed(types: &[SearchKind], kind: SearchKind) -> bool {
        types.is_empty() || types.contains(&kind)
    }

    fn block_result(&self, height: u64, token: &CancelToken) -> Option<SearchResult> {
        let block = self.reader.get_block(height, token).ok()?;
        Some(SearchResult {
            kind: SearchKind::Block,
            block_number: Some(block.number),
            block_hash: Some(block.hash),
            tx_hash: None,
            address: None,
            metadata: SearchMetadata {
                block_number: Some(block.number),
                timestamp: Some(block.timestamp),
                tx_count: Some(block.transaction_count() as u64),
                sender: None,
                value: None,
                gas: Some(block.gas_used),
            },
        })
    }

    fn block_by_hash_result(&self, hash: B256, token: &CancelToken) -> Option<SearchResult> {
        let block = self.reader.get_block_by_hash(hash, token).ok()?;
        Some(SearchResult {
            kind: SearchKind::Block,
            block_number: Some(block.number),
            block_hash: Some(block.hash),
            tx_hash: None,
            address: None,
            metadata: SearchMetadata {
                block_number: Some(block.number),
                timestamp: Some(block.timestamp),
                tx_count: Some(block.transaction_count() as u64),
                sender: None,
                value: None,
                gas: Some(block.gas_used),
            },
        })
    }

    fn tx_result(&self, hash: B256, token: &CancelToken) -> Option<SearchResult> {
        let tx = self.reader.get_transaction(hash, token).ok()?;
        let timestamp = tx
            .block_number()
            .and_then(|height| self.reader.get_block(height, token).ok())
            .map(|block| block.timestamp);
        Some(SearchResult {
            kind: SearchKind::Transaction,
            block_number: tx.block_number(),
            block_hash: tx.block_hash(),
            tx_hash: Some(tx.hash),
            address: None,
            metadata: SearchMetadata {
                block_number: tx.block_number(),
                timestamp,
                tx_count: None,
                sender: Some(tx.from),
                value: Some(tx.value),
                gas: Some(tx.gas_limit),
            },
        })
    }

    fn address_results(&self, address: Address, types: &[SearchKind], token: &CancelToken) -> Result<Vec<SearchResult>> {
        token.check()?;
        let is_contract = match self.abi.get_abi(address, token) {
            Ok(_) => true,
            Err(Error::NotFound) => false,
            Err(err) => return Err(err),
        };
        let mut results = Vec::new();
        if is_contract && Self::type_allowed(types, SearchKind::Contract) {
            results.push(SearchResult {
                kind: SearchKind::Contract,
                block_number: None,
                block_hash: None,
                tx_hash: None,
                address: Some(address),
                metadata: SearchMetadata::default(),
            });
        }
        if !is_contract && Self::type_allowed(types, SearchKind::Address) {
            results.push(SearchResult {
                kind: SearchKind::Address,
                block_number: None,
                block_hash: None,
                tx_hash: None,
                address: Some(address),
                metadata: SearchMetadata::default(),
            });
        }
        Ok(results)
    }
}

fn strip_hex_prefix(query: &str) -> &str {
    query.strip_prefix("0x").or_else(|| query.strip_prefix("0X")).unwrap_or(query)
}

fn parse_hash(hex_body: &str) -> Option<B256> {
    if hex_body.len() != 64 || !hex_body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let bytes = alloy_primitives::hex::decode(hex_body).ok()?;
    B256::try_from(bytes.as_slice()).ok()
}

fn parse_address(hex_body: &str) -> Option<Address> {
    if hex_body.len() != 40 || !hex_body.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let bytes = alloy_primitives::hex::decode(hex_body).ok()?;
    Address::try_from(bytes.as_slice()).ok()
}

impl SearchReader for SearchEngine {
    fn search(&self, query: &str, types: &[SearchKind], limit: usize, token: &CancelToken) -> Result<Vec<SearchResult>> {
        token.check()?;
        if limit == 0 {
            return Ok(Vec::new());
        }
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if !Self::type_allowed(types, SearchKind::Block) {
                return Ok(Vec::new());
            }
            let Ok(height) = trimmed.parse::<u64>() else {
                return Ok(Vec::new());
            };
            return Ok(self.block_result(height, token).into_iter().take(limit).collect());
        }

        let hex_body = strip_hex_prefix(trimmed);

        if let Some(hash) = parse_hash(hex_body) {
            let mut results = Vec::new();
            if Self::type_allowed(types, SearchKind::Block) {
                results.extend(self.block_by_hash_result(hash, token));
            }
            if Self::type_allowed(types, SearchKind::Transaction) {
                results.extend(self.tx_result(hash, token));
            }
            results.truncate(limit);
            return Ok(results);
        }

        if let Some(address) = parse_address(hex_body) {
            let mut results = self.address_results(address, types, token)?;
            results.truncate(limit);
            return Ok(results);
        }

        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use alloy_primitives::address;
    use alloy_primitives::Bytes;
    use chainidx_types::{Block, Receipt, Transaction};

    struct StubReader {
        blocks: Mutex<std::collections::HashMap<u64, Block>>,
        blocks_by_hash: Mutex<std::collections::HashMap<B256, u64>>,
        txs: Mutex<std::collections::HashMap<B256, Transaction>>,
    }

    impl Reader for StubReader {
        fn get_latest_height(&self, _token: &CancelToken) -> Result<u64> {
            Ok(0)
        }
        fn get_block_count(&self, _token: &CancelToken) -> Result<u64> {
            Ok(0)
        }
        fn get_transaction_count(&self, _token: &CancelToken) -> Result<u64> {
            Ok(0)
        }
        fn get_block(&self, height: u64, _token: &CancelToken) -> Result<Block> {
            self.blocks.lock().unwrap().get(&height).cloned().ok_or(Error::NotFound)
        }
        fn get_block_by_hash(&self, hash: B256, _token: &CancelToken) -> Result<Block> {
            let height = *self.blocks_by_hash.lock().unwrap().get(&hash).ok_or(Error::NotFound)?;
            self.blocks.lock().unwrap().get(&height).cloned().ok_or(Error::NotFound)
        }
        fn get_blocks(&self, _from: u64, _to: u64, _token: &CancelToken) -> Result<Vec<Block>> {
            Ok(Vec::new())
        }
        fn has_block(&self, height: u64, _token: &CancelToken) -> Result<bool> {
            Ok(self.blocks.lock().unwrap().contains_key(&height))
        }
        fn get_transaction(&self, hash: B256, _token: &CancelToken) -> Result<Transaction> {
            self.txs.lock().unwrap().get(&hash).cloned().ok_or(Error::NotFound)
        }
        fn has_transaction(&self, hash: B256, _token: &CancelToken) -> Result<bool> {
            Ok(self.txs.lock().unwrap().contains_key(&hash))
        }
        fn get_transactions_by_address(&self, _address: Address, _limit: usize, _offset: usize, _token: &CancelToken) -> Result<Vec<B256>> {
            Ok(Vec::new())
        }
        fn get_receipt(&self, _hash: B256, _token: &CancelToken) -> Result<Receipt> {
            Err(Error::NotFound)
        }
        fn get_receipts(&self, _hashes: &[B256], _token: &CancelToken) -> Result<Vec<Receipt>> {
            Ok(Vec::new())
        }
        fn get_receipts_by_block_number(&self, _height: u64, _token: &CancelToken) -> Result<Vec<Receipt>> {
            Ok(Vec::new())
        }
        fn get_receipts_by_block_hash(&self, _hash: B256, _token: &CancelToken) -> Result<Vec<Receipt>> {
            Ok(Vec::new())
        }
    }

    struct StubAbi {
        known: Mutex<std::collections::HashSet<Address>>,
    }

    impl AbiReader for StubAbi {
        fn get_abi(&self, address: Address, _token: &CancelToken) -> Result<String> {
            if self.known.lock().unwrap().contains(&address) {
                Ok("[]".to_string())
            } else {
                Err(Error::NotFound)
            }
        }
    }

    struct StubVerification;
    impl ContractVerificationReader for StubVerification {
        fn is_verified(&self, _address: Address, _token: &CancelToken) -> Result<bool> {
            Ok(true)
        }
    }

    fn sample_block(number: u64, hash: B256) -> Block {
        Block {
            number,
            hash,
            parent_hash: B256::ZERO,
            coinbase: Address::ZERO,
            timestamp: 1_700_000_000,
            gas_limit: 30_000_000,
            gas_used: 21_000,
            base_fee_per_gas: None,
            extra_data: Bytes::new(),
            transactions: Vec::new(),
        }
    }

    fn make_engine(contract_addr: Option<Address>) -> SearchEngine {
        let mut known = std::collections::HashSet::new();
        if let Some(addr) = contract_addr {
            known.insert(addr);
        }
        let reader: Arc<dyn Reader> = Arc::new(StubReader {
            blocks: Mutex::new(std::collections::HashMap::new()),
            blocks_by_hash: Mutex::new(std::collections::HashMap::new()),
            txs: Mutex::new(std::collections::HashMap::new()),
        });
        SearchEngine::new(reader, Arc::new(StubAbi { known: Mutex::new(known) }), Arc::new(StubVerification))
    }

    #[test]
    fn all_digit_query_resolves_block_by_number() {
        let reader = Arc::new(StubReader {
            blocks: Mutex::new(std::collections::HashMap::from([(100, sample_block(100, B256::repeat_byte(7)))])),
            blocks_by_hash: Mutex::new(std::collections::HashMap::new()),
            txs: Mutex::new(std::collections::HashMap::new()),
        });
        let engine = SearchEngine::new(reader, Arc::new(StubAbi { known: Mutex::new(Default::default()) }), Arc::new(StubVerification));
        let token = CancelToken::new();
        let results = engine.search("100", &[], 10, &token).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, SearchKind::Block);
        assert_eq!(results[0].block_number, Some(100));
    }

    #[test]
    fn forty_hex_digits_is_classified_by_abi_presence() {
        let contract = address!("00000000000000000000000000000000001234");
        let engine = make_engine(Some(contract));
        let token = CancelToken::new();
        let results = engine.search(&alloy_primitives::hex::encode(contract.as_slice()), &[], 10, &token).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, SearchKind::Contract);

        let plain = address!("0000000000000000000000000000000000abcd");
        let results = engine.search(&alloy_primitives::hex::encode(plain.as_slice()), &[], 10, &token).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].kind, SearchKind::Address);
    }

    #[test]
    fn empty_query_returns_no_results() {
        let engine = make_engine(None);
        let token = CancelToken::new();
        assert!(engine.search("", &[], 10, &token).unwrap().is_empty());
        assert!(engine.search("not-a-valid-shape!!", &[], 10, &token).unwrap().is_empty());
    }

    #[test]
    fn zero_limit_returns_no_results() {
        let engine = make_engine(None);
        let token = CancelToken::new();
        assert!(engine.search("100", &[], 0, &token).unwrap().is_empty());
    }
}
