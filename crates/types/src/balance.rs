//! Historical per-address balance model.

use alloy_primitives::{B256, U256};

/// One entry in an address's append-only balance history.
///
/// Applying `delta` values in sequence order yields the latest balance; the
/// resulting balance is never negative (enforced on write, see
/// `chainidx-historical`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BalanceSnapshot {
    /// Height at which this snapshot was recorded.
    pub block_number: u64,
    /// Absolute balance after applying `delta`.
    pub balance: U256,
    /// Signed delta that produced this snapshot. Represented as a
    /// `(negative, magnitude)` pair since [`U256`] is unsigned.
    pub delta: SignedU256,
    /// Transaction that caused this change. The zero hash denotes a
    /// synthetic change not attributable to a single transaction (e.g. a
    /// `SetBalance` absolute-value correction).
    pub causing_tx_hash: B256,
}

/// A signed arbitrary-precision integer, represented as sign + magnitude.
///
/// [`U256`] has no native sign; balance deltas need one (transfers in vs.
/// out), so this pair is used anywhere the spec calls for a "signed delta".
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SignedU256 {
    /// `true` if this value is negative. Magnitude zero is never negative.
    pub negative: bool,
    /// Absolute value.
    pub magnitude: U256,
}

impl SignedU256 {
    /// The value zero.
    pub const ZERO: Self = Self {
        negative: false,
        magnitude: U256::ZERO,
    };

    /// Constructs a positive value.
    #[must_use]
    pub fn positive(magnitude: U256) -> Self {
        Self {
            negative: false,
            magnitude,
        }
    }

    /// Constructs a negative value. `magnitude == 0` normalizes to
    /// non-negative zero.
    #[must_use]
    pub fn negative(magnitude: U256) -> Self {
        Self {
            negative: magnitude != U256::ZERO,
            magnitude,
        }
    }

    /// Adds this signed delta to an unsigned balance.
    ///
    /// Returns `None` on underflow (the would-be balance would go
    /// negative), which callers reject per the non-negative-balance
    /// invariant.
    #[must_use]
    pub fn apply(&self, balance: U256) -> Option<U256> {
        if self.negative {
            balance.checked_sub(self.magnitude)
        } else {
            balance.checked_add(self.magnitude)
        }
    }
}
