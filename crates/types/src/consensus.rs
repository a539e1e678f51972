//! WBFT consensus audit trail: aggregated seals, epochs, validator activity.

use alloy_primitives::{Address, B256, Bytes, U256};

/// A WBFT aggregated seal: a bitmap of signer indices plus one aggregated
/// 96-byte BLS signature.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AggregatedSeal {
    /// Bitmap of signer indices into the epoch's validator set.
    pub signer_bitmap: Bytes,
    /// Aggregated BLS signature.
    pub signature: Box<[u8; 96]>,
}

/// Per-block WBFT metadata.
///
/// An absent seal is represented as `None`, never as a present-but-empty
/// [`AggregatedSeal`] — the one canonical nil representation (Open
/// Question resolved in `DESIGN.md`).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WbftBlockExtra {
    /// Block height this extra data describes.
    pub block_number: u64,
    /// Hash of the described block.
    pub block_hash: B256,
    /// RANDAO reveal bytes.
    pub randao_reveal: Bytes,
    /// Round of the previous block's consensus.
    pub prev_round: u64,
    /// Round at which this block was finalized.
    pub round: u64,
    /// Previous block's Prepare-phase seal.
    pub prev_prepared_seal: Option<AggregatedSeal>,
    /// Previous block's Commit-phase seal.
    pub prev_committed_seal: Option<AggregatedSeal>,
    /// This block's Prepare-phase seal.
    pub prepared_seal: Option<AggregatedSeal>,
    /// This block's Commit-phase seal.
    pub committed_seal: Option<AggregatedSeal>,
    /// Gas tip at this block, arbitrary precision.
    pub gas_tip: U256,
    /// Present only at epoch-boundary blocks.
    pub epoch_info: Option<EpochInfo>,
    /// Unix timestamp, seconds.
    pub timestamp: u64,
}

/// A candidate validator entry in an epoch's candidate table.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidatorCandidate {
    /// Candidate's address.
    pub address: Address,
    /// Diligence score at epoch boundary.
    pub diligence_score: u64,
}

/// Validator set and candidate table for one epoch.
///
/// Every entry in `validator_indices` must be a valid position in
/// `candidates` (invariant #9).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EpochInfo {
    /// Epoch number.
    pub epoch: u64,
    /// Height of the epoch-boundary block.
    pub block_number: u64,
    /// Ordered candidate table for this epoch.
    pub candidates: Vec<ValidatorCandidate>,
    /// Indices into `candidates` naming the active validator set.
    pub validator_indices: Vec<u32>,
    /// BLS public keys, indexed parallel to `validator_indices`.
    pub bls_public_keys: Vec<Bytes>,
}

impl EpochInfo {
    /// Returns `true` if every validator index is a valid position in
    /// `candidates` (invariant #9).
    #[must_use]
    pub fn validator_indices_are_valid(&self) -> bool {
        self.validator_indices
            .iter()
            .all(|&idx| (idx as usize) < self.candidates.len())
    }

    /// Resolves a validator index to its candidate entry.
    #[must_use]
    pub fn validator_at(&self, index: u32) -> Option<&ValidatorCandidate> {
        self.candidates.get(index as usize)
    }
}

/// Per-`(validator, block)` signing activity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidatorSigningActivity {
    /// Validator address.
    pub validator: Address,
    /// Block height this record describes.
    pub block_number: u64,
    /// `true` if the validator signed the Prepare-phase seal.
    pub signed_prepare: bool,
    /// `true` if the validator signed the Commit-phase seal.
    pub signed_commit: bool,
    /// The validator's numeric index within that epoch's validator set.
    pub validator_index: u32,
    /// Hash of the described block.
    pub block_hash: B256,
    /// Consensus round at which the block was finalized.
    pub round: u64,
    /// Unix timestamp, seconds.
    pub timestamp: u64,
}

/// Aggregated per-validator signing statistics over a block range.
///
/// Derivable from [`ValidatorSigningActivity`] records; may be cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ValidatorSigningStats {
    /// Number of blocks in range where the validator signed Prepare.
    pub prepare_signed: u64,
    /// Number of blocks in range where the validator missed Prepare.
    pub prepare_missed: u64,
    /// Number of blocks in range where the validator signed Commit.
    pub commit_signed: u64,
    /// Number of blocks in range where the validator missed Commit.
    pub commit_missed: u64,
    /// First block height covered by this aggregate.
    pub from_block: u64,
    /// Last block height covered by this aggregate.
    pub to_block: u64,
}

impl ValidatorSigningStats {
    /// `prepareSigned / (prepareSigned + prepareMissed)`, or `0.0` if the
    /// validator was active in no blocks in range.
    #[must_use]
    pub fn signing_rate(&self) -> f64 {
        let total = self.prepare_signed + self.prepare_missed;
        if total == 0 {
            0.0
        } else {
            self.prepare_signed as f64 / total as f64
        }
    }
}

/// Who signed a given block, split by phase.
#[derive(Clone, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct BlockSigners {
    /// Validators whose Prepare signature was observed.
    pub prepare: Vec<Address>,
    /// Validators whose Commit signature was observed.
    pub commit: Vec<Address>,
}
