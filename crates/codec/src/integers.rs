//! Fixed-width big-endian integers and minimal-width big integers.

use alloy_primitives::U256;
use chainidx_types::{Error, Result};

/// Encodes `value` as 8 big-endian bytes.
#[must_use]
pub fn encode_u64(value: u64) -> [u8; 8] {
    value.to_be_bytes()
}

/// Decodes 8 big-endian bytes into a `u64`.
///
/// # Errors
/// Returns [`Error::InvalidData`] if `bytes` is not exactly 8 bytes long.
pub fn decode_u64(bytes: &[u8]) -> Result<u64> {
    let array: [u8; 8] = bytes
        .try_into()
        .map_err(|_| Error::InvalidData(format!("expected 8 bytes, got {}", bytes.len())))?;
    Ok(u64::from_be_bytes(array))
}

/// Encodes `value` as a minimal big-endian byte string: zero encodes to the
/// empty slice, and the leading byte of any non-zero value is always
/// non-zero.
#[must_use]
pub fn encode_big_int(value: U256) -> Vec<u8> {
    let bytes = value.to_be_bytes::<32>();
    let first_nonzero = bytes.iter().position(|&b| b != 0);
    match first_nonzero {
        Some(index) => bytes[index..].to_vec(),
        None => Vec::new(),
    }
}

/// Decodes a minimal big-endian byte string back into a [`U256`]. The empty
/// slice decodes to zero.
///
/// # Errors
/// Returns [`Error::InvalidData`] if `bytes` is longer than 32 bytes or
/// carries a leading zero byte (a non-canonical encoding).
pub fn decode_big_int(bytes: &[u8]) -> Result<U256> {
    if bytes.len() > 32 {
        return Err(Error::InvalidData(format!(
            "big integer encoding too long: {} bytes",
            bytes.len()
        )));
    }
    if !bytes.is_empty() && bytes[0] == 0 {
        return Err(Error::InvalidData(
            "big integer encoding has a leading zero byte".to_string(),
        ));
    }
    Ok(U256::from_be_slice(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u64_roundtrips() {
        for value in [0u64, 1, 255, 256, u64::MAX, 0x0102_0304_0506_0708] {
            let encoded = encode_u64(value);
            assert_eq!(encoded.len(), 8);
            assert_eq!(decode_u64(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn u64_rejects_wrong_length() {
        assert!(decode_u64(&[0u8; 7]).is_err());
        assert!(decode_u64(&[0u8; 9]).is_err());
    }

    #[test]
    fn big_int_zero_is_empty() {
        let encoded = encode_big_int(U256::ZERO);
        assert!(encoded.is_empty());
        assert_eq!(decode_big_int(&encoded).unwrap(), U256::ZERO);
    }

    #[test]
    fn big_int_roundtrips() {
        for value in [U256::from(1u64), U256::from(256u64), U256::MAX] {
            let encoded = encode_big_int(value);
            assert_eq!(decode_big_int(&encoded).unwrap(), value);
        }
    }

    #[test]
    fn big_int_rejects_leading_zero() {
        assert!(decode_big_int(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn big_int_preserves_lexicographic_order() {
        let small = encode_u64(5);
        let large = encode_u64(6);
        assert!(small < large);
    }
}
