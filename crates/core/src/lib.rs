//! Primary tables: blocks, transactions, receipts, the per-address
//! transaction sequence, and the `/meta` singleton counters.
//!
//! A transaction is indexed only as part of the block it belongs to
//! (§3): the hash index resolves to a [`chainidx_types::TxLocation`], never
//! to the encoded body directly, so [`CoreStore::get_transaction`] and
//! [`CoreStore::get_receipt`] are always two-hop lookups.

use std::sync::Arc;

use alloy_primitives::{Address, B256};
use parking_lot::Mutex;

use chainidx_backend::Backend;
use chainidx_codec::{
    decode_block_header, decode_receipt_body, decode_transaction_body, decode_tx_location, decode_u64,
    encode_block_header, encode_receipt_body, encode_tx_location, encode_u64,
};
use chainidx_types::{
    AnalyticsReader, Block, CancelToken, Error, RankedAddress, Reader, Receipt, Result, Transaction, TxLocation, Writer,
};

/// Primary blocks/transactions/receipts store, backed by one ordered
/// key/value handle.
///
/// Holds one [`Mutex`] guarding the per-address transaction-sequence
/// counter (§5: "per-address sequence counters... mutated only under a
/// per-engine lock"). Readers take no lock.
pub struct CoreStore {
    backend: Arc<dyn Backend>,
    addr_seq_lock: Mutex<()>,
}

impl CoreStore {
    /// Wraps `backend` in a [`CoreStore`].
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            addr_seq_lock: Mutex::new(()),
        }
    }

    fn read_u64_or_zero(&self, key: &[u8]) -> Result<u64> {
        match self.backend.get(key)? {
            Some(bytes) => decode_u64(&bytes),
            None => Ok(0),
        }
    }

    /// Reassembles the transactions of the block at `height` by scanning
    /// its `/data/txs/{h}/` range.
    fn load_block_transactions(&self, height: u64, block_hash: B256) -> Result<Vec<Transaction>> {
        let lower = chainidx_keys::tx_block_prefix(height);
        let upper = chainidx_backend::prefix_upper_bound(&lower);
        let mut transactions = Vec::new();
        for (index, item) in self.backend.new_iterator(&lower, &upper)?.enumerate() {
            let (_, value) = item?;
            let mut tx = decode_transaction_body(&value)?;
            tx.location = Some(TxLocation {
                block_number: height,
                #[allow(clippy::cast_possible_truncation, reason = "block tx counts fit in u32")]
                tx_index: index as u32,
                block_hash,
            });
            transactions.push(tx);
        }
        Ok(transactions)
    }
}

impl Reader for CoreStore {
    fn get_latest_height(&self, token: &CancelToken) -> Result<u64> {
        token.check()?;
        self.read_u64_or_zero(&chainidx_keys::latest_height())
    }

    fn get_block_count(&self, token: &CancelToken) -> Result<u64> {
        token.check()?;
        self.read_u64_or_zero(&chainidx_keys::block_count())
    }

    fn get_transaction_count(&self, token: &CancelToken) -> Result<u64> {
        token.check()?;
        self.read_u64_or_zero(&chainidx_keys::tx_count())
    }

    fn get_block(&self, height: u64, token: &CancelToken) -> Result<Block> {
        token.check()?;
        let bytes = self
            .backend
            .get(&chainidx_keys::block(height))?
            .ok_or(Error::NotFound)?;
        let mut block = decode_block_header(&bytes)?;
        block.number = height;
        block.transactions = self.load_block_transactions(height, block.hash)?;
        Ok(block)
    }

    fn get_block_by_hash(&self, hash: B256, token: &CancelToken) -> Result<Block> {
        token.check()?;
        let bytes = self
            .backend
            .get(&chainidx_keys::block_hash_index(hash))?
            .ok_or(Error::NotFound)?;
        let height = decode_u64(&bytes)?;
        self.get_block(height, token)
    }

    fn get_blocks(&self, from: u64, to: u64, token: &CancelToken) -> Result<Vec<Block>> {
        if from > to {
            return Err(Error::InvalidArgument(format!("from ({from}) > to ({to})")));
        }
        let mut blocks = Vec::new();
        for height in from..=to {
            token.check()?;
            match self.get_block(height, token) {
                Ok(block) => blocks.push(block),
                Err(Error::NotFound) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(blocks)
    }

    fn has_block(&self, height: u64, token: &CancelToken) -> Result<bool> {
        token.check()?;
        self.backend.has(&chainidx_keys::block(height))
    }

    fn get_transaction(&self, hash: B256, token: &CancelToken) -> Result<Transaction> {
        token.check()?;
        let location_bytes = self
            .backend
            .get(&chainidx_keys::tx_hash_index(hash))?
            .ok_or(Error::NotFound)?;
        let location = decode_tx_location(&location_bytes)?;
        let body = self
            .backend
            .get(&chainidx_keys::tx(location.block_number, location.tx_index))?
            .ok_or(Error::NotFound)?;
        let mut tx = decode_transaction_body(&body)?;
        tx.location = Some(location);
        Ok(tx)
    }

    fn has_transaction(&self, hash: B256, token: &CancelToken) -> Result<bool> {
        token.check()?;
        self.backend.has(&chainidx_keys::tx_hash_index(hash))
    }

    fn get_transactions_by_address(
        &self,
        address: Address,
        limit: usize,
        offset: usize,
        token: &CancelToken,
    ) -> Result<Vec<B256>> {
        token.check()?;
        let lower = chainidx_keys::addr_tx_prefix(address);
        let upper = chainidx_backend::prefix_upper_bound(&lower);
        let mut hashes = Vec::new();
        for (seen, item) in self.backend.new_iterator(&lower, &upper)?.enumerate() {
            token.check()?;
            if seen < offset {
                item?;
                continue;
            }
            if hashes.len() >= limit {
                break;
            }
            let (_, value) = item?;
            hashes.push(B256::from_slice(&value));
        }
        Ok(hashes)
    }

    fn get_receipt(&self, hash: B256, token: &CancelToken) -> Result<Receipt> {
        token.check()?;
        let bytes = self
            .backend
            .get(&chainidx_keys::receipt(hash))?
            .ok_or(Error::NotFound)?;
        let mut receipt = decode_receipt_body(&bytes)?;
        receipt.tx_hash = hash;
        Ok(receipt)
    }

    fn get_receipts(&self, hashes: &[B256], token: &CancelToken) -> Result<Vec<Receipt>> {
        hashes.iter().map(|hash| self.get_receipt(*hash, token)).collect()
    }

    fn get_receipts_by_block_number(&self, height: u64, token: &CancelToken) -> Result<Vec<Receipt>> {
        let block = self.get_block(height, token)?;
        block
            .transactions
            .iter()
            .map(|tx| self.get_receipt(tx.hash, token))
            .collect()
    }

    fn get_receipts_by_block_hash(&self, hash: B256, token: &CancelToken) -> Result<Vec<Receipt>> {
        let block = self.get_block_by_hash(hash, token)?;
        block
            .transactions
            .iter()
            .map(|tx| self.get_receipt(tx.hash, token))
            .collect()
    }
}

/// Keeps the top `limit` entries of `tally` by value, descending, using a
/// bounded min-heap rather than sorting the whole map (§9: "use a heap for
/// `limit << N` cases").
fn top_n(tally: std::collections::HashMap<Address, u64>, limit: usize) -> Vec<RankedAddress> {
    use std::cmp::Reverse;
    use std::collections::BinaryHeap;

    if limit == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<(u64, Address)>> = BinaryHeap::with_capacity(limit + 1);
    for (address, count) in tally {
        heap.push(Reverse((count, address)));
        if heap.len() > limit {
            heap.pop();
        }
    }
    let mut ranked: Vec<RankedAddress> = heap
        .into_iter()
        .map(|Reverse((count, address))| RankedAddress { address, count })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.address.cmp(&b.address)));
    ranked
}

impl AnalyticsReader for CoreStore {
    fn get_top_miners(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>> {
        if from > to {
            return Err(Error::InvalidArgument(format!("from ({from}) > to ({to})")));
        }
        let mut tally: std::collections::HashMap<Address, u64> = std::collections::HashMap::new();
        for height in from..=to {
            token.check()?;
            match self.get_block(height, token) {
                Ok(block) => *tally.entry(block.coinbase).or_default() += 1,
                Err(Error::NotFound) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(top_n(tally, limit))
    }

    fn get_top_addresses_by_tx_count(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>> {
        if from > to {
            return Err(Error::InvalidArgument(format!("from ({from}) > to ({to})")));
        }
        let mut tally: std::collections::HashMap<Address, u64> = std::collections::HashMap::new();
        for height in from..=to {
            token.check()?;
            match self.get_block(height, token) {
                Ok(block) => {
                    for tx in &block.transactions {
                        *tally.entry(tx.from).or_default() += 1;
                    }
                }
                Err(Error::NotFound) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(top_n(tally, limit))
    }

    fn get_top_addresses_by_gas_used(&self, from: u64, to: u64, limit: usize, token: &CancelToken) -> Result<Vec<RankedAddress>> {
        if from > to {
            return Err(Error::InvalidArgument(format!("from ({from}) > to ({to})")));
        }
        let mut tally: std::collections::HashMap<Address, u64> = std::collections::HashMap::new();
        for height in from..=to {
            token.check()?;
            let block = match self.get_block(height, token) {
                Ok(block) => block,
                Err(Error::NotFound) => continue,
                Err(err) => return Err(err),
            };
            for tx in &block.transactions {
                token.check()?;
                match self.get_receipt(tx.hash, token) {
                    Ok(receipt) => *tally.entry(tx.from).or_default() += receipt.gas_used,
                    Err(Error::NotFound) => {}
                    Err(err) => return Err(err),
                }
            }
        }
        Ok(top_n(tally, limit))
    }
}

impl Writer for CoreStore {
    fn set_latest_height(&self, height: u64) -> Result<()> {
        self.backend.put(&chainidx_keys::latest_height(), &encode_u64(height))
    }

    fn set_block(&self, block: &Block) -> Result<()> {
        self.set_blocks(std::slice::from_ref(block))
    }

    fn set_blocks(&self, blocks: &[Block]) -> Result<()> {
        if blocks.is_empty() {
            return Ok(());
        }
        let mut batch = self.backend.new_batch();
        let current_count = self.read_u64_or_zero(&chainidx_keys::block_count())?;
        for block in blocks {
            batch.put(&chainidx_keys::block(block.number), &encode_block_header(block));
            batch.put(&chainidx_keys::block_hash_index(block.hash), &encode_u64(block.number));
        }
        #[allow(clippy::cast_possible_truncation, reason = "batch sizes never approach u64::MAX")]
        let new_count = current_count + blocks.len() as u64;
        batch.put(&chainidx_keys::block_count(), &encode_u64(new_count));
        batch.commit()?;
        tracing::debug!(count = blocks.len(), "stored blocks");
        Ok(())
    }

    fn set_transaction(&self, tx: &Transaction, location: TxLocation) -> Result<()> {
        if tx.hash == B256::ZERO {
            return Err(Error::InvalidArgument("transaction hash must not be zero".to_string()));
        }
        let mut batch = self.backend.new_batch();
        batch.put(
            &chainidx_keys::tx(location.block_number, location.tx_index),
            &chainidx_codec::encode_transaction_body(tx),
        );
        batch.put(&chainidx_keys::tx_hash_index(tx.hash), &encode_tx_location(&location));
        let current_count = self.read_u64_or_zero(&chainidx_keys::tx_count())?;
        batch.put(&chainidx_keys::tx_count(), &encode_u64(current_count + 1));
        batch.commit()
    }

    fn set_receipt(&self, receipt: &Receipt) -> Result<()> {
        self.backend
            .put(&chainidx_keys::receipt(receipt.tx_hash), &encode_receipt_body(receipt))
    }

    fn set_receipts(&self, receipts: &[Receipt]) -> Result<()> {
        if receipts.is_empty() {
            return Ok(());
        }
        let mut batch = self.backend.new_batch();
        for receipt in receipts {
            batch.put(&chainidx_keys::receipt(receipt.tx_hash), &encode_receipt_body(receipt));
        }
        batch.commit()
    }

    fn add_transaction_to_address_index(&self, address: Address, tx_hash: B256) -> Result<()> {
        let _guard = self.addr_seq_lock.lock();
        let counter_key = chainidx_keys::addr_seq_counter(address);
        let seq = self.read_u64_or_zero(&counter_key)?;
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::addr_tx_index(address, seq), tx_hash.as_slice());
        batch.put(&counter_key, &encode_u64(seq + 1));
        batch.commit()
    }

    fn delete_block(&self, height: u64) -> Result<()> {
        let Some(header_bytes) = self.backend.get(&chainidx_keys::block(height))? else {
            return Ok(());
        };
        let header = decode_block_header(&header_bytes)?;
        let mut batch = self.backend.new_batch();
        batch.delete(&chainidx_keys::block(height));
        batch.delete(&chainidx_keys::block_hash_index(header.hash));
        batch.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, U256, address};
    use chainidx_backend::{BackendConfig, RocksBackend};
    use chainidx_types::TxKind;

    fn open_store() -> (tempfile::TempDir, CoreStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
        (dir, CoreStore::new(backend))
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

    fn sample_tx(hash_byte: u8) -> Transaction {
        Transaction {
            hash: B256::repeat_byte(hash_byte),
            tx_kind: TxKind::Legacy,
            chain_id: None,
            nonce: 0,
            to: Some(address!("0000000000000000000000000000000000000b")),
            value: U256::from(1u64),
            gas_price: Some(U256::from(1u64)),
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            gas_limit: 21_000,
            input: Bytes::new(),
            access_list: Vec::new(),
            from: address!("0000000000000000000000000000000000000c"),
            location: None,
        }
    }

    #[test]
    fn e1_block_lookup_by_height_and_presence() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let block = sample_block(100);
        store.set_block(&block).unwrap();

        assert_eq!(store.get_block(100, &token).unwrap().number, 100);
        assert!(store.has_block(100, &token).unwrap());
        assert!(!store.has_block(99, &token).unwrap());
    }

    #[test]
    fn hash_round_trip() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let block = sample_block(7);
        store.set_block(&block).unwrap();
        let fetched = store.get_block_by_hash(block.hash, &token).unwrap();
        assert_eq!(fetched.number, 7);
    }

    #[test]
    fn transaction_hash_round_trip_resolves_location() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let block = sample_block(5);
        store.set_block(&block).unwrap();
        let tx = sample_tx(0xaa);
        let location = TxLocation {
            block_number: 5,
            tx_index: 0,
            block_hash: block.hash,
        };
        store.set_transaction(&tx, location).unwrap();

        let fetched = store.get_transaction(tx.hash, &token).unwrap();
        assert_eq!(fetched.location.unwrap().block_number, 5);
        assert_eq!(fetched.hash, tx.hash);
    }

    #[test]
    fn receipt_hash_is_restored_from_key_not_body() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let hash = B256::repeat_byte(0x42);
        let receipt = Receipt {
            tx_hash: B256::ZERO,
            status: true,
            cumulative_gas_used: 100,
            gas_used: 50,
            logs: Vec::new(),
            contract_address: None,
            tx_kind: TxKind::Legacy,
            logs_bloom: Box::new([0u8; 256]),
        };
        store.backend.put(&chainidx_keys::receipt(hash), &encode_receipt_body(&receipt)).unwrap();

        let fetched = store.get_receipt(hash, &token).unwrap();
        assert_eq!(fetched.tx_hash, hash);
    }

    #[test]
    fn address_sequence_is_insertion_ordered_and_persists_across_counter_reads() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let addr = address!("00000000000000000000000000000000000001");
        let h1 = B256::repeat_byte(1);
        let h2 = B256::repeat_byte(2);
        store.add_transaction_to_address_index(addr, h2).unwrap();
        store.add_transaction_to_address_index(addr, h1).unwrap();

        let hashes = store.get_transactions_by_address(addr, 10, 0, &token).unwrap();
        assert_eq!(hashes, vec![h2, h1]);
    }

    #[test]
    fn idempotent_delete() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let block = sample_block(100);
        store.set_block(&block).unwrap();

        store.delete_block(100).unwrap();
        assert!(matches!(store.get_block(100, &token), Err(Error::NotFound)));
        assert!(matches!(store.get_block_by_hash(block.hash, &token), Err(Error::NotFound)));

        // Deleting an absent height is a no-op success.
        store.delete_block(100).unwrap();
    }

    #[test]
    fn blocks_batch_bumps_count_once() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        store.set_blocks(&[sample_block(1), sample_block(2), sample_block(3)]).unwrap();
        assert_eq!(store.get_block_count(&token).unwrap(), 3);
    }

    #[test]
    fn top_miners_ranks_by_block_count_descending() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let miner_a = address!("00000000000000000000000000000000000a11");
        let miner_b = address!("00000000000000000000000000000000000b22");

        let mut block1 = sample_block(1);
        block1.coinbase = miner_a;
        let mut block2 = sample_block(2);
        block2.coinbase = miner_a;
        let mut block3 = sample_block(3);
        block3.coinbase = miner_b;
        store.set_blocks(&[block1, block2, block3]).unwrap();

        let top = store.get_top_miners(1, 3, 10, &token).unwrap();
        assert_eq!(top[0], RankedAddress { address: miner_a, count: 2 });
        assert_eq!(top[1], RankedAddress { address: miner_b, count: 1 });
    }

    #[test]
    fn top_addresses_by_tx_count_and_gas_used() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let sender = address!("00000000000000000000000000000000000c33");

        let block = sample_block(10);
        store.set_block(&block).unwrap();
        let mut tx = sample_tx(0x01);
        tx.from = sender;
        let location = TxLocation {
            block_number: 10,
            tx_index: 0,
            block_hash: block.hash,
        };
        store.set_transaction(&tx, location).unwrap();
        let receipt = Receipt {
            tx_hash: tx.hash,
            status: true,
            cumulative_gas_used: 21_000,
            gas_used: 21_000,
            logs: Vec::new(),
            contract_address: None,
            tx_kind: TxKind::Legacy,
            logs_bloom: Box::new([0u8; 256]),
        };
        store.set_receipt(&receipt).unwrap();

        let by_tx_count = store.get_top_addresses_by_tx_count(10, 10, 5, &token).unwrap();
        assert_eq!(by_tx_count, vec![RankedAddress { address: sender, count: 1 }]);

        let by_gas = store.get_top_addresses_by_gas_used(10, 10, 5, &token).unwrap();
        assert_eq!(by_gas, vec![RankedAddress { address: sender, count: 21_000 }]);
    }
}
