//! Domain entities, error sentinels and embedding traits shared by every
//! `chainidx-*` crate.

pub mod balance;
pub mod block;
pub mod cancel;
pub mod consensus;
pub mod derivatives;
pub mod error;
pub mod events;
pub mod pagination;
pub mod search;
pub mod traits;

pub use balance::{BalanceSnapshot, SignedU256};
pub use block::{AccessListEntry, Block, Log, Receipt, Transaction, TxKind, TxLocation};
pub use cancel::CancelToken;
pub use consensus::{
    AggregatedSeal, BlockSigners, EpochInfo, ValidatorCandidate, ValidatorSigningActivity,
    ValidatorSigningStats, WbftBlockExtra,
};
pub use derivatives::{ContractCreation, Erc20Transfer, Erc721Transfer, InternalTransaction};
pub use error::{Error, Result};
pub use events::{
    BlacklistEvent, BurnEvent, DepositMintProposal, EmergencyPauseEvent, GasTipUpdateEvent,
    GovernanceProposal, MinterConfigEvent, MintEvent, ProposalAction, ProposalStatus,
    ProposalVote, ValidatorChangeEvent,
};
pub use pagination::{LogFilter, paginate};
pub use search::{SearchKind, SearchMetadata, SearchResult};
pub use traits::{
    AbiReader, AbiWriter, AnalyticsReader, ContractVerificationReader, ContractVerificationWriter,
    DerivativesReader, DerivativesWriter, HistoricalReader, HistoricalWriter, LogReader,
    LogWriter, RankedAddress, Reader, RpcClient, SearchReader, SystemContractReader,
    SystemContractWriter, WbftReader, WbftWriter, Writer,
};
