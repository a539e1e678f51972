//! System-contract event records: mint/burn, governance, validator changes.

use alloy_primitives::{Address, B256, Bytes, U256};

/// A native-token-adapter mint event.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MintEvent {
    /// Height of the containing block.
    pub block_number: u64,
    /// Index of the containing transaction within its block.
    pub tx_index: u32,
    /// Index of the originating log within its block.
    pub log_index: u32,
    /// Address that received the minted tokens.
    pub actor: Address,
    /// Amount minted.
    pub amount: U256,
    /// Hash of the originating transaction.
    pub tx_hash: B256,
}

/// A native-token-adapter burn event. Field-for-field symmetric with
/// [`MintEvent`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BurnEvent {
    /// Height of the containing block.
    pub block_number: u64,
    /// Index of the containing transaction within its block.
    pub tx_index: u32,
    /// Index of the originating log within its block.
    pub log_index: u32,
    /// Address whose tokens were burned.
    pub actor: Address,
    /// Amount burned.
    pub amount: U256,
    /// Hash of the originating transaction.
    pub tx_hash: B256,
}

/// A minter-configuration change, keyed by `(actor, block)`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MinterConfigEvent {
    /// Address whose minter configuration changed.
    pub actor: Address,
    /// Height at which the change took effect.
    pub block_number: u64,
    /// `true` if `actor` is now an authorized minter.
    pub is_minter: bool,
    /// Hash of the originating transaction.
    pub tx_hash: B256,
}

/// A validator-set change, keyed by `(actor, block)`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidatorChangeEvent {
    /// Address whose validator status changed.
    pub actor: Address,
    /// Height at which the change took effect.
    pub block_number: u64,
    /// `true` if `actor` is now an active validator.
    pub is_validator: bool,
    /// Hash of the originating transaction.
    pub tx_hash: B256,
}

/// A blacklist membership change, keyed by `(actor, block)`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlacklistEvent {
    /// Address whose blacklist status changed.
    pub actor: Address,
    /// Height at which the change took effect.
    pub block_number: u64,
    /// `true` if `actor` is now blacklisted.
    pub blacklisted: bool,
    /// Hash of the originating transaction.
    pub tx_hash: B256,
}

/// A gas-tip parameter update.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GasTipUpdateEvent {
    /// Height at which the update took effect.
    pub block_number: u64,
    /// New gas tip value.
    pub new_gas_tip: U256,
    /// Hash of the originating transaction.
    pub tx_hash: B256,
}

/// An emergency-pause toggle, keyed by `(actor, block)`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EmergencyPauseEvent {
    /// Address that triggered the toggle.
    pub actor: Address,
    /// Height at which the toggle took effect.
    pub block_number: u64,
    /// `true` if the system is now paused.
    pub paused: bool,
    /// Hash of the originating transaction.
    pub tx_hash: B256,
}

/// Status of a governance proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProposalStatus {
    /// Open for voting.
    Voting,
    /// Approved, pending execution.
    Approved,
    /// Rejected by vote.
    Rejected,
    /// Executed on-chain.
    Executed,
    /// Withdrawn by the proposer before a vote concluded.
    Cancelled,
}

impl ProposalStatus {
    /// Stable lowercase tag used as a key segment in the status index.
    #[must_use]
    pub const fn as_key_segment(self) -> &'static str {
        match self {
            Self::Voting => "voting",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Executed => "executed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The kind of change a [`GovernanceProposal`] enacts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ProposalAction {
    /// Adds or removes a validator.
    ValidatorChange,
    /// Adds or removes a minter.
    MinterChange,
    /// Changes a blacklist entry.
    BlacklistChange,
    /// Changes the gas tip parameter.
    GasTipChange,
    /// A deposit-mint proposal (bridges a deposit into a mint).
    DepositMint,
    /// Any other on-chain call not covered above.
    GenericCall,
}

/// A governance proposal, stored by `(contract, id)` and mirrored into the
/// status index at `(contract, status, id)`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GovernanceProposal {
    /// Governance contract address.
    pub contract: Address,
    /// Proposal id, unique within `contract`.
    pub id: u64,
    /// Address that submitted the proposal.
    pub proposer: Address,
    /// Kind of change this proposal enacts.
    pub action: ProposalAction,
    /// Opaque call data describing the change.
    pub call_data: Bytes,
    /// Governance member-set version this proposal was created under.
    pub member_version: u64,
    /// Number of approvals required to pass.
    pub required_approvals: u32,
    /// Current approval count.
    pub current_approvals: u32,
    /// Current rejection count.
    pub current_rejections: u32,
    /// Current status.
    pub status: ProposalStatus,
    /// Creation timestamp, seconds.
    pub created_at: u64,
    /// Execution timestamp, seconds, if executed.
    pub executed_at: Option<u64>,
    /// Height at which the proposal was created.
    pub block_number: u64,
    /// Hash of the creating transaction.
    pub tx_hash: B256,
}

/// A single member's vote on a [`GovernanceProposal`].
///
/// Keyed by `(contract, id, voter)` — at most one vote per voter per
/// proposal.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProposalVote {
    /// Governance contract address.
    pub contract: Address,
    /// Proposal id being voted on.
    pub id: u64,
    /// Voting member.
    pub voter: Address,
    /// `true` for an approval, `false` for a rejection.
    pub approve: bool,
    /// Height at which the vote was cast.
    pub block_number: u64,
    /// Hash of the voting transaction.
    pub tx_hash: B256,
    /// Unix timestamp, seconds.
    pub timestamp: u64,
}

/// A deposit-mint bridge proposal, distinct from [`GovernanceProposal`]
/// because its lifecycle (deposit observed → proposed → minted) has no
/// member vote.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DepositMintProposal {
    /// System contract that will perform the mint.
    pub contract: Address,
    /// Proposal id, unique within `contract`.
    pub id: u64,
    /// Recipient of the minted tokens.
    pub recipient: Address,
    /// Amount to mint.
    pub amount: U256,
    /// Hash of the originating deposit transaction on the source chain.
    pub source_tx_hash: B256,
    /// Current status, reusing [`ProposalStatus`].
    pub status: ProposalStatus,
    /// Height at which the proposal was created.
    pub block_number: u64,
}
