//! Canonical RLP encoding for on-chain-shaped entities.
//!
//! A block's `number` and a receipt's `tx_hash` are never trusted from the
//! encoded payload — both are restored by the caller from the record's
//! storage key on read. Every other field, including a transaction's own
//! `hash`, is part of the wire body: unlike `tx_hash` on a receipt, a
//! transaction's hash is not implied by any key it is stored under, so it
//! travels with the body. A transaction's block `location` is restored from
//! its storage key regardless.

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_rlp::{Buf, BufMut, Decodable, Encodable, Header};
use chainidx_types::{AccessListEntry, Block, Error, Log, Receipt, Result, Transaction, TxKind, TxLocation};

fn rlp_err(what: &'static str, source: alloy_rlp::Error) -> Error {
    Error::InvalidData(format!("{what}: {source}"))
}

/// Encodes `to` the way Ethereum encodes a transaction recipient: the
/// 20-byte address, or the empty string for a contract-creation `None`.
fn encode_to(to: Option<Address>, out: &mut dyn BufMut) {
    match to {
        Some(address) => address.encode(out),
        None => Bytes::new().encode(out),
    }
}

fn to_length(to: Option<Address>) -> usize {
    match to {
        Some(address) => address.length(),
        None => Bytes::new().length(),
    }
}

fn decode_to(buf: &mut &[u8]) -> alloy_rlp::Result<Option<Address>> {
    let bytes = Bytes::decode(buf)?;
    if bytes.is_empty() {
        Ok(None)
    } else if bytes.len() == 20 {
        Ok(Some(Address::from_slice(&bytes)))
    } else {
        Err(alloy_rlp::Error::UnexpectedLength)
    }
}

impl Encodable for AccessListEntry {
    fn length(&self) -> usize {
        let payload = self.address.length() + self.storage_keys.length();
        payload + alloy_rlp::length_of_length(payload)
    }

    fn encode(&self, out: &mut dyn BufMut) {
        let payload = self.address.length() + self.storage_keys.length();
        Header {
            list: true,
            payload_length: payload,
        }
        .encode(out);
        self.address.encode(out);
        self.storage_keys.encode(out);
    }
}

impl Decodable for AccessListEntry {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let mut body = &buf[..header.payload_length];
        let address = Address::decode(&mut body)?;
        let storage_keys = Vec::<B256>::decode(&mut body)?;
        buf.advance(header.payload_length);
        Ok(Self {
            address,
            storage_keys,
        })
    }
}

/// Encodes a transaction behind its EIP-2718 typed-envelope tag. Legacy
/// transactions have no tag byte; every other kind is prefixed with
/// [`TxKind::type_byte`]. `location` is never part of the body.
#[must_use]
pub fn encode_transaction_body(tx: &Transaction) -> Vec<u8> {
    let mut out = Vec::new();
    if tx.tx_kind != TxKind::Legacy {
        out.put_u8(tx.tx_kind.type_byte());
    }
    encode_transaction_fields(tx, &mut out);
    out
}

fn transaction_fields_length(tx: &Transaction) -> usize {
    let mut payload = tx.hash.length()
        + tx.nonce.length()
        + to_length(tx.to)
        + tx.value.length()
        + tx.gas_limit.length()
        + tx.input.length()
        + tx.from.length();
    match tx.tx_kind {
        TxKind::Legacy => {
            payload += tx.chain_id.unwrap_or_default().length();
            payload += tx.gas_price.unwrap_or_default().length();
        }
        TxKind::Eip2930 => {
            payload += tx.chain_id.unwrap_or_default().length();
            payload += tx.gas_price.unwrap_or_default().length();
            payload += tx.access_list.length();
        }
        TxKind::Eip1559 | TxKind::Eip4844 => {
            payload += tx.chain_id.unwrap_or_default().length();
            payload += tx.max_priority_fee_per_gas.unwrap_or_default().length();
            payload += tx.max_fee_per_gas.unwrap_or_default().length();
            payload += tx.access_list.length();
        }
    }
    payload
}

fn encode_transaction_fields(tx: &Transaction, out: &mut dyn BufMut) {
    let payload = transaction_fields_length(tx);
    Header {
        list: true,
        payload_length: payload,
    }
    .encode(out);
    tx.hash.encode(out);
    match tx.tx_kind {
        TxKind::Legacy => {
            tx.chain_id.unwrap_or_default().encode(out);
            tx.nonce.encode(out);
            tx.gas_price.unwrap_or_default().encode(out);
            tx.gas_limit.encode(out);
            encode_to(tx.to, out);
            tx.value.encode(out);
            tx.input.encode(out);
            tx.from.encode(out);
        }
        TxKind::Eip2930 => {
            tx.chain_id.unwrap_or_default().encode(out);
            tx.nonce.encode(out);
            tx.gas_price.unwrap_or_default().encode(out);
            tx.gas_limit.encode(out);
            encode_to(tx.to, out);
            tx.value.encode(out);
            tx.input.encode(out);
            tx.access_list.encode(out);
            tx.from.encode(out);
        }
        TxKind::Eip1559 | TxKind::Eip4844 => {
            tx.chain_id.unwrap_or_default().encode(out);
            tx.nonce.encode(out);
            tx.max_priority_fee_per_gas.unwrap_or_default().encode(out);
            tx.max_fee_per_gas.unwrap_or_default().encode(out);
            tx.gas_limit.encode(out);
            encode_to(tx.to, out);
            tx.value.encode(out);
            tx.input.encode(out);
            tx.access_list.encode(out);
            tx.from.encode(out);
        }
    }
}

/// Decodes a transaction previously written by [`encode_transaction_body`].
/// `location` is left `None`; the caller restores it from the record's
/// storage key.
///
/// # Errors
/// Returns [`Error::InvalidData`] if the bytes are not well-formed RLP, or
/// carry an unknown typed-envelope tag.
pub fn decode_transaction_body(bytes: &[u8]) -> Result<Transaction> {
    if bytes.is_empty() {
        return Err(Error::InvalidData("empty transaction body".to_string()));
    }
    let (tx_kind, mut buf) = if bytes[0] <= 0x7f {
        let kind = TxKind::from_type_byte(bytes[0])
            .ok_or_else(|| Error::InvalidData(format!("unknown transaction type byte {:#x}", bytes[0])))?;
        (kind, &bytes[1..])
    } else {
        (TxKind::Legacy, bytes)
    };

    let header = Header::decode(&mut buf).map_err(|e| rlp_err("transaction header", e))?;
    if !header.list {
        return Err(Error::InvalidData("transaction body is not an RLP list".to_string()));
    }
    let mut body = &buf[..header.payload_length];

    let decode = |buf: &mut &[u8]| -> alloy_rlp::Result<Transaction> {
        let hash = B256::decode(buf)?;
        let (chain_id, gas_price, max_priority_fee_per_gas, max_fee_per_gas, nonce, gas_limit, to, value, input, access_list, from);
        match tx_kind {
            TxKind::Legacy => {
                chain_id = decode_optional_chain_id(u64::decode(buf)?);
                nonce = u64::decode(buf)?;
                gas_price = Some(U256::decode(buf)?);
                gas_limit = u64::decode(buf)?;
                to = decode_to(buf)?;
                value = U256::decode(buf)?;
                input = Bytes::decode(buf)?;
                from = Address::decode(buf)?;
                max_priority_fee_per_gas = None;
                max_fee_per_gas = None;
                access_list = Vec::new();
            }
            TxKind::Eip2930 => {
                chain_id = Some(u64::decode(buf)?);
                nonce = u64::decode(buf)?;
                gas_price = Some(U256::decode(buf)?);
                gas_limit = u64::decode(buf)?;
                to = decode_to(buf)?;
                value = U256::decode(buf)?;
                input = Bytes::decode(buf)?;
                access_list = Vec::<AccessListEntry>::decode(buf)?;
                from = Address::decode(buf)?;
                max_priority_fee_per_gas = None;
                max_fee_per_gas = None;
            }
            TxKind::Eip1559 | TxKind::Eip4844 => {
                chain_id = Some(u64::decode(buf)?);
                nonce = u64::decode(buf)?;
                max_priority_fee_per_gas = Some(U256::decode(buf)?);
                max_fee_per_gas = Some(U256::decode(buf)?);
                gas_limit = u64::decode(buf)?;
                to = decode_to(buf)?;
                value = U256::decode(buf)?;
                input = Bytes::decode(buf)?;
                access_list = Vec::<AccessListEntry>::decode(buf)?;
                from = Address::decode(buf)?;
                gas_price = None;
            }
        }
        Ok(Transaction {
            hash,
            tx_kind,
            chain_id,
            nonce,
            to,
            value,
            gas_price,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            gas_limit,
            input,
            access_list,
            from,
            location: None,
        })
    };

    let tx = decode(&mut body).map_err(|e| rlp_err("transaction fields", e))?;
    buf.advance(header.payload_length);
    Ok(tx)
}

/// A zero chain id on a legacy transaction is the pre-EIP-155 convention;
/// decoded back to `None` for fidelity with what the fetcher would have
/// reported.
fn decode_optional_chain_id(raw: u64) -> Option<u64> {
    if raw == 0 {
        None
    } else {
        Some(raw)
    }
}

/// Encodes a log, fully self-contained including its position fields. Logs
/// carry their own position rather than relying on their storage key: a
/// log nested inside a receipt has no key of its own to restore from.
#[must_use]
pub fn encode_log_body(log: &Log) -> Vec<u8> {
    let payload = log.address.length()
        + log.topics.length()
        + log.data.length()
        + log.block_number.length()
        + log.tx_index.length()
        + log.tx_hash.length()
        + log.log_index.length();
    let mut out = Vec::with_capacity(payload + 8);
    Header {
        list: true,
        payload_length: payload,
    }
    .encode(&mut out);
    log.address.encode(&mut out);
    log.topics.encode(&mut out);
    log.data.encode(&mut out);
    log.block_number.encode(&mut out);
    log.tx_index.encode(&mut out);
    log.tx_hash.encode(&mut out);
    log.log_index.encode(&mut out);
    out
}

/// Decodes a log previously written by [`encode_log_body`].
///
/// # Errors
/// Returns [`Error::InvalidData`] if the bytes are not a well-formed RLP
/// list of exactly seven elements.
pub fn decode_log_body(bytes: &[u8]) -> Result<Log> {
    let mut buf = bytes;
    let header = Header::decode(&mut buf).map_err(|e| rlp_err("log header", e))?;
    if !header.list {
        return Err(Error::InvalidData("log body is not an RLP list".to_string()));
    }
    let mut body = &buf[..header.payload_length];
    let address = Address::decode(&mut body).map_err(|e| rlp_err("log address", e))?;
    let topics = Vec::<B256>::decode(&mut body).map_err(|e| rlp_err("log topics", e))?;
    let data = Bytes::decode(&mut body).map_err(|e| rlp_err("log data", e))?;
    let block_number = u64::decode(&mut body).map_err(|e| rlp_err("log block_number", e))?;
    let tx_index = u32::decode(&mut body).map_err(|e| rlp_err("log tx_index", e))?;
    let tx_hash = B256::decode(&mut body).map_err(|e| rlp_err("log tx_hash", e))?;
    let log_index = u32::decode(&mut body).map_err(|e| rlp_err("log log_index", e))?;
    Ok(Log {
        address,
        topics,
        data,
        block_number,
        tx_index,
        tx_hash,
        log_index,
    })
}

fn decode_one_log(buf: &mut &[u8]) -> alloy_rlp::Result<Log> {
    let header = Header::decode(buf)?;
    let mut body = &buf[..header.payload_length];
    let address = Address::decode(&mut body)?;
    let topics = Vec::<B256>::decode(&mut body)?;
    let data = Bytes::decode(&mut body)?;
    let block_number = u64::decode(&mut body)?;
    let tx_index = u32::decode(&mut body)?;
    let tx_hash = B256::decode(&mut body)?;
    let log_index = u32::decode(&mut body)?;
    buf.advance(header.payload_length);
    Ok(Log {
        address,
        topics,
        data,
        block_number,
        tx_index,
        tx_hash,
        log_index,
    })
}

/// Encodes a receipt body (everything but `tx_hash`, which the caller
/// restores from the `/data/receipts/{txhash}` lookup key).
#[must_use]
pub fn encode_receipt_body(receipt: &Receipt) -> Vec<u8> {
    let log_bodies: Vec<Vec<u8>> = receipt.logs.iter().map(encode_log_body).collect();
    let logs_payload: usize = log_bodies.iter().map(Vec::len).sum();
    let logs_bloom = Bytes::copy_from_slice(receipt.logs_bloom.as_slice());
    let payload = receipt.status.length()
        + receipt.cumulative_gas_used.length()
        + receipt.gas_used.length()
        + alloy_rlp::length_of_length(logs_payload)
        + logs_payload
        + to_length(receipt.contract_address)
        + receipt.tx_kind.type_byte().length()
        + logs_bloom.length();
    let mut out = Vec::with_capacity(payload + 8);
    Header {
        list: true,
        payload_length: payload,
    }
    .encode(&mut out);
    receipt.status.encode(&mut out);
    receipt.cumulative_gas_used.encode(&mut out);
    receipt.gas_used.encode(&mut out);
    Header {
        list: true,
        payload_length: logs_payload,
    }
    .encode(&mut out);
    for body in &log_bodies {
        out.put_slice(body);
    }
    encode_to(receipt.contract_address, &mut out);
    receipt.tx_kind.type_byte().encode(&mut out);
    logs_bloom.encode(&mut out);
    out
}

/// Decodes a receipt body previously written by [`encode_receipt_body`].
/// `tx_hash` is left at `B256::ZERO`; the caller restores it from the
/// storage key.
///
/// # Errors
/// Returns [`Error::InvalidData`] if the bytes are not well-formed RLP, the
/// contract-address slot is neither empty nor 20 bytes, the type tag is
/// unknown, or `logs_bloom` is not exactly 256 bytes.
pub fn decode_receipt_body(bytes: &[u8]) -> Result<Receipt> {
    let mut buf = bytes;
    let header = Header::decode(&mut buf).map_err(|e| rlp_err("receipt header", e))?;
    if !header.list {
        return Err(Error::InvalidData("receipt body is not an RLP list".to_string()));
    }
    let mut body = &buf[..header.payload_length];

    let status = bool::decode(&mut body).map_err(|e| rlp_err("receipt status", e))?;
    let cumulative_gas_used = u64::decode(&mut body).map_err(|e| rlp_err("receipt cumulative_gas_used", e))?;
    let gas_used = u64::decode(&mut body).map_err(|e| rlp_err("receipt gas_used", e))?;

    let logs_header = Header::decode(&mut body).map_err(|e| rlp_err("receipt logs header", e))?;
    let mut logs_body = &body[..logs_header.payload_length];
    let mut logs = Vec::new();
    while !logs_body.is_empty() {
        logs.push(decode_one_log(&mut logs_body).map_err(|e| rlp_err("receipt log", e))?);
    }
    body.advance(logs_header.payload_length);

    let contract_address = decode_to(&mut body).map_err(|e| rlp_err("receipt contract_address", e))?;
    let type_byte = u8::decode(&mut body).map_err(|e| rlp_err("receipt type byte", e))?;
    let tx_kind = TxKind::from_type_byte(type_byte)
        .ok_or_else(|| Error::InvalidData(format!("unknown transaction type byte {type_byte:#x}")))?;
    let logs_bloom_bytes = Bytes::decode(&mut body).map_err(|e| rlp_err("receipt logs_bloom", e))?;
    if logs_bloom_bytes.len() != 256 {
        return Err(Error::InvalidData(format!(
            "logs_bloom must be 256 bytes, got {}",
            logs_bloom_bytes.len()
        )));
    }
    let mut logs_bloom = Box::new([0u8; 256]);
    logs_bloom.copy_from_slice(&logs_bloom_bytes);

    Ok(Receipt {
        tx_hash: B256::ZERO,
        status,
        cumulative_gas_used,
        gas_used,
        logs,
        contract_address,
        tx_kind,
        logs_bloom,
    })
}

/// Encodes a block header: every field but `number` (restored from the
/// storage key) and `transactions` (stored separately, one entry per
/// `/data/txs/{h}/{i}`, and reassembled by the caller).
#[must_use]
pub fn encode_block_header(block: &Block) -> Vec<u8> {
    let base_fee = block.base_fee_per_gas.unwrap_or_default();
    let payload = block.hash.length()
        + block.parent_hash.length()
        + block.coinbase.length()
        + block.timestamp.length()
        + block.gas_limit.length()
        + block.gas_used.length()
        + base_fee.length()
        + block.extra_data.length();
    let mut out = Vec::with_capacity(payload + 8);
    Header {
        list: true,
        payload_length: payload,
    }
    .encode(&mut out);
    block.hash.encode(&mut out);
    block.parent_hash.encode(&mut out);
    block.coinbase.encode(&mut out);
    block.timestamp.encode(&mut out);
    block.gas_limit.encode(&mut out);
    block.gas_used.encode(&mut out);
    base_fee.encode(&mut out);
    block.extra_data.encode(&mut out);
    out
}

/// Decodes a block header previously written by [`encode_block_header`].
/// `number` is left at `0` and `transactions` is left empty; the caller
/// restores `number` from the storage key and assembles `transactions` from
/// the block's own `/data/txs/{h}/...` range.
///
/// # Errors
/// Returns [`Error::InvalidData`] if the bytes are not a well-formed
/// 8-element RLP list.
pub fn decode_block_header(bytes: &[u8]) -> Result<Block> {
    let mut buf = bytes;
    let header = Header::decode(&mut buf).map_err(|e| rlp_err("block header", e))?;
    if !header.list {
        return Err(Error::InvalidData("block body is not an RLP list".to_string()));
    }
    let mut body = &buf[..header.payload_length];

    let hash = B256::decode(&mut body).map_err(|e| rlp_err("block hash", e))?;
    let parent_hash = B256::decode(&mut body).map_err(|e| rlp_err("block parent_hash", e))?;
    let coinbase = Address::decode(&mut body).map_err(|e| rlp_err("block coinbase", e))?;
    let timestamp = u64::decode(&mut body).map_err(|e| rlp_err("block timestamp", e))?;
    let gas_limit = u64::decode(&mut body).map_err(|e| rlp_err("block gas_limit", e))?;
    let gas_used = u64::decode(&mut body).map_err(|e| rlp_err("block gas_used", e))?;
    let base_fee_per_gas = {
        let value = U256::decode(&mut body).map_err(|e| rlp_err("block base_fee_per_gas", e))?;
        if value.is_zero() { None } else { Some(value) }
    };
    let extra_data = Bytes::decode(&mut body).map_err(|e| rlp_err("block extra_data", e))?;

    Ok(Block {
        number: 0,
        hash,
        parent_hash,
        coinbase,
        timestamp,
        gas_limit,
        gas_used,
        base_fee_per_gas,
        extra_data,
        transactions: Vec::new(),
    })
}

impl Encodable for TxLocation {
    fn length(&self) -> usize {
        let payload = self.block_number.length() + self.tx_index.length() + self.block_hash.length();
        payload + alloy_rlp::length_of_length(payload)
    }

    fn encode(&self, out: &mut dyn BufMut) {
        let payload = self.block_number.length() + self.tx_index.length() + self.block_hash.length();
        Header {
            list: true,
            payload_length: payload,
        }
        .encode(out);
        self.block_number.encode(out);
        self.tx_index.encode(out);
        self.block_hash.encode(out);
    }
}

impl Decodable for TxLocation {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let mut body = &buf[..header.payload_length];
        let block_number = u64::decode(&mut body)?;
        let tx_index = u32::decode(&mut body)?;
        let block_hash = B256::decode(&mut body)?;
        buf.advance(header.payload_length);
        Ok(Self {
            block_number,
            tx_index,
            block_hash,
        })
    }
}

/// Encodes a [`TxLocation`], the value stored at the tx-hash index.
#[must_use]
pub fn encode_tx_location(location: &TxLocation) -> Vec<u8> {
    alloy_rlp::encode(location)
}

/// Decodes a [`TxLocation`] previously written by [`encode_tx_location`].
///
/// # Errors
/// Returns [`Error::InvalidData`] if the bytes are not a well-formed
/// 3-element RLP list.
pub fn decode_tx_location(bytes: &[u8]) -> Result<TxLocation> {
    let mut buf = bytes;
    TxLocation::decode(&mut buf).map_err(|e| rlp_err("tx location", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn sample_transaction(kind: TxKind) -> Transaction {
        Transaction {
            hash: B256::repeat_byte(0xaa),
            tx_kind: kind,
            chain_id: Some(1),
            nonce: 7,
            to: Some(address!("0000000000000000000000000000000000000001")),
            value: U256::from(1_000_000u64),
            gas_price: matches!(kind, TxKind::Legacy | TxKind::Eip2930).then(|| U256::from(20u64)),
            max_fee_per_gas: matches!(kind, TxKind::Eip1559 | TxKind::Eip4844).then(|| U256::from(30u64)),
            max_priority_fee_per_gas: matches!(kind, TxKind::Eip1559 | TxKind::Eip4844).then(|| U256::from(2u64)),
            gas_limit: 21_000,
            input: Bytes::from_static(b"\x01\x02"),
            access_list: Vec::new(),
            from: address!("0000000000000000000000000000000000000002"),
            location: None,
        }
    }

    #[test]
    fn legacy_transaction_roundtrips() {
        let tx = sample_transaction(TxKind::Legacy);
        let encoded = encode_transaction_body(&tx);
        let decoded = decode_transaction_body(&encoded).unwrap();
        assert_eq!(decoded.tx_kind, TxKind::Legacy);
        assert_eq!(decoded.hash, tx.hash);
        assert_eq!(decoded.nonce, tx.nonce);
        assert_eq!(decoded.to, tx.to);
        assert_eq!(decoded.gas_price, tx.gas_price);
        assert_eq!(decoded.from, tx.from);
    }

    #[test]
    fn eip1559_transaction_roundtrips() {
        let tx = sample_transaction(TxKind::Eip1559);
        let encoded = encode_transaction_body(&tx);
        assert_eq!(encoded[0], TxKind::Eip1559.type_byte());
        let decoded = decode_transaction_body(&encoded).unwrap();
        assert_eq!(decoded.max_fee_per_gas, tx.max_fee_per_gas);
        assert_eq!(decoded.max_priority_fee_per_gas, tx.max_priority_fee_per_gas);
        assert_eq!(decoded.gas_price, None);
    }

    #[test]
    fn contract_creation_has_no_recipient() {
        let mut tx = sample_transaction(TxKind::Eip1559);
        tx.to = None;
        let encoded = encode_transaction_body(&tx);
        let decoded = decode_transaction_body(&encoded).unwrap();
        assert_eq!(decoded.to, None);
    }

    #[test]
    fn log_body_roundtrips() {
        let log = Log {
            address: address!("0000000000000000000000000000000000000003"),
            topics: vec![B256::repeat_byte(1)],
            data: Bytes::from_static(b"hello"),
            block_number: 42,
            tx_index: 3,
            tx_hash: B256::repeat_byte(9),
            log_index: 5,
        };
        let encoded = encode_log_body(&log);
        let decoded = decode_log_body(&encoded).unwrap();
        assert_eq!(decoded, log);
    }

    #[test]
    fn receipt_body_roundtrips_with_logs() {
        let log = Log {
            address: address!("0000000000000000000000000000000000000004"),
            topics: vec![],
            data: Bytes::new(),
            block_number: 42,
            tx_index: 3,
            tx_hash: B256::repeat_byte(9),
            log_index: 0,
        };
        let receipt = Receipt {
            tx_hash: B256::ZERO,
            status: true,
            cumulative_gas_used: 100_000,
            gas_used: 21_000,
            logs: vec![log],
            contract_address: None,
            tx_kind: TxKind::Eip1559,
            logs_bloom: Box::new([0u8; 256]),
        };
        let encoded = encode_receipt_body(&receipt);
        let decoded = decode_receipt_body(&encoded).unwrap();
        assert_eq!(decoded.status, receipt.status);
        assert_eq!(decoded.gas_used, receipt.gas_used);
        assert_eq!(decoded.logs.len(), 1);
        assert_eq!(decoded.logs[0].log_index, 0);
        assert_eq!(decoded.tx_kind, TxKind::Eip1559);
    }

    #[test]
    fn tx_location_roundtrips() {
        let location = TxLocation {
            block_number: 42,
            tx_index: 3,
            block_hash: B256::repeat_byte(5),
        };
        let encoded = encode_tx_location(&location);
        let decoded = decode_tx_location(&encoded).unwrap();
        assert_eq!(decoded, location);
    }

    #[test]
    fn block_header_roundtrips() {
        let block = Block {
            number: 0,
            hash: B256::repeat_byte(6),
            parent_hash: B256::ZERO,
            coinbase: address!("0000000000000000000000000000000000000007"),
            timestamp: 1_700_000_000,
            gas_limit: 30_000_000,
            gas_used: 21_000,
            base_fee_per_gas: Some(U256::from(10u64)),
            extra_data: Bytes::new(),
            transactions: Vec::new(),
        };
        let encoded = encode_block_header(&block);
        let decoded = decode_block_header(&encoded).unwrap();
        assert_eq!(decoded.hash, block.hash);
        assert_eq!(decoded.base_fee_per_gas, block.base_fee_per_gas);
        assert!(decoded.transactions.is_empty());
    }
}
