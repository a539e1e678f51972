//! Contract creation, ERC-20/721 transfer and internal-transaction derived
//! indexes (§4.8/§4.8a).
//!
//! Each record is stored once in full, addressed by its own natural key
//! (contract address, `(tx_hash, log_index)`, or `(tx_hash, sequence)`).
//! Cross-indexes by contract/sender/recipient/creator hold only enough to
//! locate that record again: the block/tx/log position plus, where the data
//! key needs it, the transaction hash.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};

use chainidx_backend::Backend;
use chainidx_codec::{decode, decode_big_int, encode, encode_big_int};
use chainidx_types::{
    CancelToken, ContractCreation, DerivativesReader, DerivativesWriter, Erc20Transfer, Erc721Transfer,
    Error, InternalTransaction, Result, paginate,
};

/// Derivative-fact storage, backed by one ordered key/value handle.
pub struct DerivativesStore {
    backend: Arc<dyn Backend>,
}

impl DerivativesStore {
    /// Wraps `backend` in a [`DerivativesStore`].
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    fn scan_by_prefix<T, F>(&self, lower: &[u8], upper: &[u8], limit: usize, offset: usize, token: &CancelToken, load: F) -> Result<Vec<T>>
    where
        F: Fn(&Self, &[u8], &[u8]) -> Result<Option<T>>,
    {
        let mut matched = Vec::new();
        for item in self.backend.new_iterator(lower, upper)? {
            token.check()?;
            let (key, value) = item?;
            if let Some(record) = load(self, &key, &value)? {
                matched.push(record);
            }
        }
        Ok(paginate(matched.into_iter(), offset, limit))
    }

    fn erc20_balance_or_zero(&self, address: Address, contract: Address) -> Result<U256> {
        match self.backend.get(&chainidx_keys::erc20_balance(address, contract))? {
            Some(bytes) => decode_big_int(&bytes),
            None => Ok(U256::ZERO),
        }
    }

    fn erc20_transfer_at(&self, tx_hash: B256, log_index: u32) -> Result<Option<Erc20Transfer>> {
        match self.backend.get(&chainidx_keys::erc20_transfer(tx_hash, log_index))? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn erc721_transfer_at(&self, tx_hash: B256, log_index: u32) -> Result<Option<Erc721Transfer>> {
        match self.backend.get(&chainidx_keys::erc721_transfer(tx_hash, log_index))? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }
}

fn prefix_range(prefix: Vec<u8>) -> (Vec<u8>, Vec<u8>) {
    let upper = chainidx_backend::prefix_upper_bound(&prefix);
    (prefix, upper)
}

impl DerivativesReader for DerivativesStore {
    fn get_contract_creation(&self, contract: Address, token: &CancelToken) -> Result<ContractCreation> {
        token.check()?;
        let bytes = self
            .backend
            .get(&chainidx_keys::contract_creation(contract))?
            .ok_or(Error::NotFound)?;
        decode(&bytes)
    }

    fn get_contracts_by_creator(&self, creator: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<ContractCreation>> {
        token.check()?;
        let (lower, upper) = prefix_range(chainidx_keys::contract_by_creator_prefix(creator));
        self.scan_by_prefix(&lower, &upper, limit, offset, token, |store, key, _| {
            let Some(contract_addr) = key.rsplit(|&b| b == b'/').next() else {
                return Ok(None);
            };
            let Some(contract) = parse_address_segment(contract_addr) else {
                return Ok(None);
            };
            match store.backend.get(&chainidx_keys::contract_creation(contract))? {
                Some(bytes) => Ok(Some(decode(&bytes)?)),
                None => Ok(None),
            }
        })
    }

    fn get_erc20_transfers_by_contract(&self, contract: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc20Transfer>> {
        token.check()?;
        let (lower, upper) = prefix_range(chainidx_keys::erc20_by_contract_prefix(contract));
        self.scan_erc20(&lower, &upper, limit, offset, token)
    }

    fn get_erc20_transfers_by_sender(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc20Transfer>> {
        token.check()?;
        let (lower, upper) = prefix_range(chainidx_keys::erc20_by_from_prefix(address));
        self.scan_erc20(&lower, &upper, limit, offset, token)
    }

    fn get_erc20_transfers_by_recipient(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc20Transfer>> {
        token.check()?;
        let (lower, upper) = prefix_range(chainidx_keys::erc20_by_to_prefix(address));
        self.scan_erc20(&lower, &upper, limit, offset, token)
    }

    fn get_erc20_balance(&self, address: Address, contract: Address, token: &CancelToken) -> Result<U256> {
        token.check()?;
        self.erc20_balance_or_zero(address, contract)
    }

    fn get_erc721_transfers_by_contract(&self, contract: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc721Transfer>> {
        token.check()?;
        let (lower, upper) = prefix_range(chainidx_keys::erc721_by_contract_prefix(contract));
        self.scan_erc721(&lower, &upper, limit, offset, token)
    }

    fn get_erc721_owner(&self, contract: Address, token_id: U256, token: &CancelToken) -> Result<Address> {
        token.check()?;
        let bytes = self
            .backend
            .get(&chainidx_keys::erc721_owner(contract, token_id))?
            .ok_or(Error::NotFound)?;
        Address::try_from(bytes.as_slice()).map_err(|_| Error::InvalidData("erc721 owner cell is not a 20-byte address".to_string()))
    }

    fn get_internal_transactions(&self, tx_hash: B256, token: &CancelToken) -> Result<Vec<InternalTransaction>> {
        token.check()?;
        let lower = chainidx_keys::internal_tx_prefix(tx_hash);
        let upper = chainidx_backend::prefix_upper_bound(&lower);
        let mut items = Vec::new();
        for item in self.backend.new_iterator(&lower, &upper)? {
            token.check()?;
            let (_, value) = item?;
            items.push(decode(&value)?);
        }
        Ok(items)
    }

    fn get_internal_transactions_by_sender(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<InternalTransaction>> {
        token.check()?;
        let (lower, upper) = prefix_range(chainidx_keys::internal_tx_by_sender_prefix(address));
        self.scan_itx(&lower, &upper, limit, offset, token)
    }

    fn get_internal_transactions_by_recipient(&self, address: Address, limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<InternalTransaction>> {
        token.check()?;
        let (lower, upper) = prefix_range(chainidx_keys::internal_tx_by_recipient_prefix(address));
        self.scan_itx(&lower, &upper, limit, offset, token)
    }
}

impl DerivativesStore {
    fn scan_erc20(&self, lower: &[u8], upper: &[u8], limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc20Transfer>> {
        self.scan_by_prefix(lower, upper, limit, offset, token, |store, key, value| {
            let Some((_, _, log_index)) = chainidx_keys::parse_block_tx_log_suffix(key) else {
                return Ok(None);
            };
            let Some(tx_hash) = parse_hash_value(value) else {
                return Ok(None);
            };
            store.erc20_transfer_at(tx_hash, log_index)
        })
    }

    fn scan_erc721(&self, lower: &[u8], upper: &[u8], limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<Erc721Transfer>> {
        self.scan_by_prefix(lower, upper, limit, offset, token, |store, key, value| {
            let Some((_, _, log_index)) = chainidx_keys::parse_block_tx_log_suffix(key) else {
                return Ok(None);
            };
            let Some(tx_hash) = parse_hash_value(value) else {
                return Ok(None);
            };
            store.erc721_transfer_at(tx_hash, log_index)
        })
    }

    fn scan_itx(&self, lower: &[u8], upper: &[u8], limit: usize, offset: usize, token: &CancelToken) -> Result<Vec<InternalTransaction>> {
        self.scan_by_prefix(lower, upper, limit, offset, token, |store, key, _| {
            let Some((tx_hash, seq)) = chainidx_keys::parse_tx_seq_suffix(key) else {
                return Ok(None);
            };
            match store.backend.get(&chainidx_keys::internal_tx(tx_hash, seq))? {
                Some(bytes) => Ok(Some(decode(&bytes)?)),
                None => Ok(None),
            }
        })
    }
}

fn parse_hash_value(value: &[u8]) -> Option<B256> {
    B256::try_from(value).ok()
}

fn parse_address_segment(segment: &[u8]) -> Option<Address> {
    let text = std::str::from_utf8(segment).ok()?;
    let bytes = alloy_primitives::hex::decode(text).ok()?;
    Address::try_from(bytes.as_slice()).ok()
}

impl DerivativesWriter for DerivativesStore {
    fn set_contract_creation(&self, creation: &ContractCreation) -> Result<()> {
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::contract_creation(creation.contract_address), &encode(creation)?);
        batch.put(&chainidx_keys::contract_by_creator(creation.creator, creation.contract_address), &[]);
        batch.commit()
    }

    fn set_erc20_transfer(&self, transfer: &Erc20Transfer) -> Result<()> {
        // log_index is unique within the block for this derived record, so the
        // tx-index slot of the shared (h, ti, li) index shape is held at 0.
        let (h, ti, li) = (transfer.block_number, 0u32, transfer.log_index);
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::erc20_transfer(transfer.tx_hash, transfer.log_index), &encode(transfer)?);
        batch.put(&chainidx_keys::erc20_by_contract(transfer.contract, h, ti, li), transfer.tx_hash.as_slice());
        batch.put(&chainidx_keys::erc20_by_from(transfer.from, h, ti, li), transfer.tx_hash.as_slice());
        batch.put(&chainidx_keys::erc20_by_to(transfer.to, h, ti, li), transfer.tx_hash.as_slice());

        // Debit/credit the cached balance cells in the same batch. The zero
        // address marks a mint (no sender balance to debit) or a burn (no
        // recipient balance to credit). A sender debit saturates at zero
        // rather than erroring: this cache only ever sees the transfers the
        // engine has been given, so a sender's first tracked transfer may
        // predate the indexed history (e.g. a mid-chain backfill) and carry
        // no recorded prior balance even though it had one on-chain.
        if transfer.from != Address::ZERO {
            let from_balance = self.erc20_balance_or_zero(transfer.from, transfer.contract)?;
            let new_from_balance = from_balance.saturating_sub(transfer.value);
            batch.put(&chainidx_keys::erc20_balance(transfer.from, transfer.contract), &encode_big_int(new_from_balance));
        }
        if transfer.to != Address::ZERO {
            let to_balance = self.erc20_balance_or_zero(transfer.to, transfer.contract)?;
            let new_to_balance = to_balance
                .checked_add(transfer.value)
                .ok_or_else(|| Error::InvalidData("erc20 cached balance overflowed U256".to_string()))?;
            batch.put(&chainidx_keys::erc20_balance(transfer.to, transfer.contract), &encode_big_int(new_to_balance));
        }
        batch.commit()
    }

    fn set_erc721_transfer(&self, transfer: &Erc721Transfer) -> Result<()> {
        let (h, ti, li) = (transfer.block_number, 0u32, transfer.log_index);
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::erc721_transfer(transfer.tx_hash, transfer.log_index), &encode(transfer)?);
        batch.put(&chainidx_keys::erc721_by_contract(transfer.contract, h, ti, li), transfer.tx_hash.as_slice());
        batch.put(&chainidx_keys::erc721_by_from(transfer.from, h, ti, li), transfer.tx_hash.as_slice());
        batch.put(&chainidx_keys::erc721_by_to(transfer.to, h, ti, li), transfer.tx_hash.as_slice());
        batch.put(
            &chainidx_keys::erc721_owner(transfer.contract, transfer.token_id),
            transfer.to.as_slice(),
        );
        batch.commit()
    }

    fn set_internal_transaction(&self, itx: &InternalTransaction) -> Result<()> {
        let mut batch = self.backend.new_batch();
        batch.put(&chainidx_keys::internal_tx(itx.tx_hash, itx.sequence), &encode(itx)?);
        batch.put(&chainidx_keys::internal_tx_by_sender(itx.from, itx.tx_hash, itx.sequence), &[]);
        if let Some(to) = itx.to {
            batch.put(&chainidx_keys::internal_tx_by_recipient(to, itx.tx_hash, itx.sequence), &[]);
        }
        batch.commit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Bytes, address};
    use chainidx_backend::{BackendConfig, RocksBackend};

    fn open_store() -> (tempfile::TempDir, DerivativesStore) {
        let dir = tempfile::tempdir().unwrap();
        let config = BackendConfig {
            path: dir.path().to_path_buf(),
            ..BackendConfig::default()
        };
        let backend: Arc<dyn Backend> = Arc::new(RocksBackend::open(&config).unwrap());
        (dir, DerivativesStore::new(backend))
    }

    #[test]
    fn contract_creation_and_by_creator_index() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let creator = address!("0000000000000000000000000000000000000a");
        let contract = address!("0000000000000000000000000000000000000b");
        let creation = ContractCreation {
            contract_address: contract,
            creator,
            tx_hash: B256::repeat_byte(1),
            block_number: 10,
            timestamp: 1000,
            bytecode_size: 512,
        };
        store.set_contract_creation(&creation).unwrap();

        assert_eq!(store.get_contract_creation(contract, &token).unwrap(), creation);
        let by_creator = store.get_contracts_by_creator(creator, 10, 0, &token).unwrap();
        assert_eq!(by_creator, vec![creation]);
    }

    #[test]
    fn erc20_transfer_cross_indexes_and_balance() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let contract = address!("0000000000000000000000000000000000000c");
        let from = address!("0000000000000000000000000000000000000d");
        let to = address!("0000000000000000000000000000000000000e");
        let transfer = Erc20Transfer {
            tx_hash: B256::repeat_byte(2),
            log_index: 0,
            contract,
            from,
            to,
            value: U256::from(1000u64),
            block_number: 5,
            timestamp: 500,
        };
        store.set_erc20_transfer(&transfer).unwrap();

        assert_eq!(store.get_erc20_transfers_by_contract(contract, 10, 0, &token).unwrap(), vec![transfer.clone()]);
        assert_eq!(store.get_erc20_transfers_by_sender(from, 10, 0, &token).unwrap(), vec![transfer.clone()]);
        assert_eq!(store.get_erc20_transfers_by_recipient(to, 10, 0, &token).unwrap(), vec![transfer]);
        assert_eq!(store.get_erc20_balance(to, contract, &token).unwrap(), U256::from(1000u64));
        assert_eq!(store.get_erc20_balance(from, contract, &token).unwrap(), U256::ZERO);
    }

    #[test]
    fn erc20_balance_tracks_mint_then_transfer() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let contract = address!("0000000000000000000000000000000000000c");
        let holder = address!("0000000000000000000000000000000000000d");
        let recipient = address!("0000000000000000000000000000000000000e");

        store
            .set_erc20_transfer(&Erc20Transfer {
                tx_hash: B256::repeat_byte(1),
                log_index: 0,
                contract,
                from: Address::ZERO,
                to: holder,
                value: U256::from(1000u64),
                block_number: 1,
                timestamp: 100,
            })
            .unwrap();
        assert_eq!(store.get_erc20_balance(holder, contract, &token).unwrap(), U256::from(1000u64));

        store
            .set_erc20_transfer(&Erc20Transfer {
                tx_hash: B256::repeat_byte(2),
                log_index: 0,
                contract,
                from: holder,
                to: recipient,
                value: U256::from(400u64),
                block_number: 2,
                timestamp: 200,
            })
            .unwrap();
        assert_eq!(store.get_erc20_balance(holder, contract, &token).unwrap(), U256::from(600u64));
        assert_eq!(store.get_erc20_balance(recipient, contract, &token).unwrap(), U256::from(400u64));
    }

    #[test]
    fn erc721_transfer_updates_current_owner() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let contract = address!("0000000000000000000000000000000000000f");
        let from = address!("0000000000000000000000000000000000001a");
        let to = address!("0000000000000000000000000000000000001b");
        let transfer = Erc721Transfer {
            tx_hash: B256::repeat_byte(3),
            log_index: 0,
            contract,
            from,
            to,
            token_id: U256::from(7u64),
            block_number: 6,
            timestamp: 600,
        };
        store.set_erc721_transfer(&transfer).unwrap();

        assert_eq!(store.get_erc721_owner(contract, U256::from(7u64), &token).unwrap(), to);
        assert_eq!(store.get_erc721_transfers_by_contract(contract, 10, 0, &token).unwrap(), vec![transfer]);
    }

    #[test]
    fn internal_transaction_sender_and_recipient_indexes() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let tx_hash = B256::repeat_byte(4);
        let from = address!("0000000000000000000000000000000000001c");
        let to = address!("0000000000000000000000000000000000001d");
        let itx = InternalTransaction {
            tx_hash,
            sequence: 0,
            from,
            to: Some(to),
            value: U256::ZERO,
            input: Bytes::new(),
            call_type: "call".to_string(),
            block_number: 7,
        };
        store.set_internal_transaction(&itx).unwrap();

        assert_eq!(store.get_internal_transactions(tx_hash, &token).unwrap(), vec![itx.clone()]);
        assert_eq!(store.get_internal_transactions_by_sender(from, 10, 0, &token).unwrap(), vec![itx.clone()]);
        assert_eq!(store.get_internal_transactions_by_recipient(to, 10, 0, &token).unwrap(), vec![itx]);
    }

    #[test]
    fn missing_contract_creation_is_not_found() {
        let (_dir, store) = open_store();
        let token = CancelToken::new();
        let contract = address!("0000000000000000000000000000000000001e");
        assert!(matches!(store.get_contract_creation(contract, &token), Err(Error::NotFound)));
    }
}
