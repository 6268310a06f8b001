//! Error types for engine operations.

use crate::types::TransactionId;
use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur during engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine has been closed.
    #[error("engine is closed")]
    Closed,

    /// The transaction handle is unknown or already finished.
    #[error("invalid or expired transaction handle: {txid}")]
    InvalidHandle {
        /// The transaction the handle referred to.
        txid: TransactionId,
    },

    /// A write was attempted through a read transaction.
    #[error("write attempted in read transaction {txid}")]
    ReadOnly {
        /// The read transaction.
        txid: TransactionId,
    },

    /// The calling thread already owns the active write transaction.
    #[error("write transaction already active on this thread")]
    WriterReentrant,

    /// Too many read transactions are open.
    #[error("too many concurrent readers (max {max})")]
    TooManyReaders {
        /// Configured reader limit.
        max: usize,
    },

    /// A record violated an engine constraint.
    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl EngineError {
    /// Creates a constraint violation error.
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }
}
