//! Bincode encoding for engine-internal records: anything that did not
//! originate as an on-chain wire format gets a plain serde + bincode
//! round-trip instead of hand-rolled RLP.

use chainidx_types::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};

/// Encodes any serde-derived engine-internal record with bincode.
///
/// # Errors
/// Returns [`Error::InvalidData`] if bincode fails to serialize `value`,
/// which only happens for types with custom `Serialize` impls that return
/// an error — every type this module is used for derives it instead.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| Error::InvalidData(format!("bincode encode: {e}")))
}

/// Decodes a value previously written by [`encode`].
///
/// # Errors
/// Returns [`Error::InvalidData`] if `bytes` is not a valid bincode
/// encoding of `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| Error::InvalidData(format!("bincode decode: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{B256, U256};
    use chainidx_types::{BalanceSnapshot, SignedU256};

    #[test]
    fn balance_snapshot_roundtrips() {
        let snapshot = BalanceSnapshot {
            block_number: 10,
            balance: U256::from(500u64),
            delta: SignedU256::positive(U256::from(500u64)),
            causing_tx_hash: B256::ZERO,
        };
        let encoded = encode(&snapshot).unwrap();
        let decoded: BalanceSnapshot = decode(&encoded).unwrap();
        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn decode_rejects_garbage() {
        let garbage = vec![0xff; 3];
        let result: Result<BalanceSnapshot> = decode(&garbage);
        assert!(result.is_err());
    }
}
