//! Error sentinels shared by every reader/writer trait in the engine.

use thiserror::Error;

/// The engine's result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the embedding API.
///
/// Not-found is a distinct, expected outcome rather than a failure; callers
/// that scan secondary indexes are expected to skip individual not-found
/// results rather than treat them as errors (see the engine's error-handling
/// design around orphaned secondary entries).
#[derive(Debug, Error)]
pub enum Error {
    /// The requested record does not exist.
    #[error("not found")]
    NotFound,

    /// A key could not be constructed or parsed (e.g. wrong segment width).
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A stored value failed to decode.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// An argument violates a documented precondition (nil required input,
    /// inverted range, out-of-range topic index, negative balance delta...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backing store has been closed.
    #[error("store is closed")]
    Closed,

    /// A batch exceeded the backend's size limit.
    #[error("batch too large ({0} operations)")]
    BatchTooLarge(usize),

    /// A writer method was invoked against a read-only store.
    #[error("store is read-only")]
    ReadOnly,

    /// The calling context's cancellation token was signalled mid-operation.
    #[error("operation cancelled")]
    Cancelled,

    /// The backend reported an I/O or corruption failure.
    #[error("backend error during {op}: {source}")]
    Backend {
        /// Name of the operation in progress when the backend failed.
        op: &'static str,
        /// Underlying backend error.
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Wraps an arbitrary backend error with the operation that triggered it.
    pub fn backend(op: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::Backend {
            op,
            source: source.into(),
        }
    }
}
