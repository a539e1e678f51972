//! Shared pagination and log-filter request shapes.

use alloy_primitives::{Address, B256};

/// Applies `offset`/`limit` to an already-ordered iterator, as every paged
/// reader in the engine does: skip `offset` items, then take up to `limit`.
pub fn paginate<I: Iterator>(iter: I, offset: usize, limit: usize) -> Vec<I::Item> {
    iter.skip(offset).take(limit).collect()
}

/// A log filter as accepted by `GetLogs`.
///
/// `topics` holds at most four positions; each position is a list of
/// accepted values where an empty list means "any" (wildcard).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// First block to consider, inclusive.
    pub from_block: u64,
    /// Last block to consider, inclusive. `0` means "latest".
    pub to_block: u64,
    /// Emitter addresses to match; empty means "any".
    pub addresses: Vec<Address>,
    /// Per-position topic filters, at most four positions.
    pub topics: Vec<Vec<B256>>,
}

impl LogFilter {
    /// Whether topic position `position` is unconstrained.
    #[must_use]
    pub fn topic_is_wildcard(&self, position: usize) -> bool {
        self.topics.get(position).is_none_or(Vec::is_empty)
    }
}
