//! Fixed-width segment formatting.
//!
//! Every numeric segment is zero-padded so that lexicographic byte order
//! over the formatted string equals numeric order over the value it
//! encodes. Hashes and addresses use lowercase hex with no `0x` prefix.

use alloy_primitives::{Address, B256, U256, hex};

/// Width, in decimal digits, used for heights, sequence numbers,
/// timestamps, epoch numbers, proposal ids and token ids.
pub const WIDE: usize = 20;

/// Width, in decimal digits, used for transaction/log/internal-tx indexes
/// within their containing block or transaction.
pub const NARROW: usize = 6;

/// Formats `value` as a [`WIDE`]-digit zero-padded decimal segment.
#[must_use]
pub fn wide(value: u64) -> String {
    format!("{value:0width$}", width = WIDE)
}

/// Formats `value` as a [`NARROW`]-digit zero-padded decimal segment.
#[must_use]
pub fn narrow(value: u32) -> String {
    format!("{value:0width$}", width = NARROW)
}

/// Formats `value` as a [`WIDE`]-digit zero-padded decimal segment.
///
/// Values wider than [`WIDE`] digits (a token id above `10^20`, say) are
/// still formatted in full rather than truncated; ordering only holds
/// within a fixed digit count, which is the case for every value this
/// engine actually stores.
#[must_use]
pub fn wide_u256(value: U256) -> String {
    let digits = value.to_string();
    if digits.len() >= WIDE {
        digits
    } else {
        let mut padded = "0".repeat(WIDE - digits.len());
        padded.push_str(&digits);
        padded
    }
}

/// Formats an address as 40 lowercase hex characters, no `0x` prefix.
#[must_use]
pub fn addr(address: Address) -> String {
    hex::encode(address.as_slice())
}

/// Formats a 32-byte hash as 64 lowercase hex characters, no `0x` prefix.
#[must_use]
pub fn hash(value: B256) -> String {
    hex::encode(value.as_slice())
}

/// Parses a [`WIDE`]-digit zero-padded decimal segment back into a `u64`.
///
/// Inverse of [`wide`]. Returns `None` if `segment` is not a valid decimal
/// `u64`, which index-suffix parsing treats as a corrupt key.
#[must_use]
pub fn parse_wide(segment: &[u8]) -> Option<u64> {
    std::str::from_utf8(segment).ok()?.parse().ok()
}

/// Parses a [`NARROW`]-digit zero-padded decimal segment back into a `u32`.
///
/// Inverse of [`narrow`].
#[must_use]
pub fn parse_narrow(segment: &[u8]) -> Option<u32> {
    std::str::from_utf8(segment).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_preserves_numeric_order() {
        assert!(wide(9) < wide(10));
        assert!(wide(99) < wide(100));
        assert!(wide(0) < wide(u64::MAX));
    }

    #[test]
    fn narrow_preserves_numeric_order() {
        assert!(narrow(9) < narrow(10));
        assert!(narrow(999) < narrow(1000));
    }

    #[test]
    fn wide_u256_preserves_numeric_order_within_width() {
        assert!(wide_u256(U256::from(9u64)) < wide_u256(U256::from(10u64)));
        assert!(wide_u256(U256::ZERO) < wide_u256(U256::from(1u64)));
    }
}
