//! Error types for BoxDB core.

use boxdb_codec::CodecError;
use boxdb_engine::EngineError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store, box and transaction operations.
///
/// A missing record is never an error: lookups return `None` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Engine error not covered by a more specific variant.
    #[error("engine error: {0}")]
    Engine(#[source] EngineError),

    /// Record encoding or decoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The transaction was discarded because a nested scope failed.
    #[error("transaction aborted: {reason}")]
    TransactionAborted {
        /// Reason for the abort.
        reason: String,
    },

    /// A record or entity type violated a constraint.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the violation.
        message: String,
    },

    /// The store has been closed.
    #[error("store is closed")]
    StoreClosed,

    /// A write was attempted where only reads are allowed.
    #[error("mode conflict: {message}")]
    ModeConflict {
        /// Description of the conflict.
        message: String,
    },

    /// Operation not permitted in the current state.
    #[error("invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation is invalid.
        message: String,
    },
}

/// Coarse classification of [`StoreError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A transaction scope was rolled back.
    TransactionAborted,
    /// Constraint violations and malformed records.
    Validation,
    /// Closed stores, expired handles and exhausted engine resources.
    Resource,
    /// Writes inside read-only scopes or stores.
    ModeConflict,
    /// API misuse, such as mixing transactions of different stores.
    InvalidOperation,
}

impl StoreError {
    /// Creates a transaction aborted error.
    pub fn transaction_aborted(reason: impl Into<String>) -> Self {
        Self::TransactionAborted {
            reason: reason.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a mode conflict error.
    pub fn mode_conflict(message: impl Into<String>) -> Self {
        Self::ModeConflict {
            message: message.into(),
        }
    }

    /// Creates an invalid operation error.
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TransactionAborted { .. } => ErrorKind::TransactionAborted,
            Self::Validation { .. } | Self::Codec(_) => ErrorKind::Validation,
            Self::StoreClosed => ErrorKind::Resource,
            Self::ModeConflict { .. } => ErrorKind::ModeConflict,
            Self::InvalidOperation { .. } => ErrorKind::InvalidOperation,
            Self::Engine(e) => match e {
                EngineError::Constraint(_) => ErrorKind::Validation,
                EngineError::ReadOnly { .. } => ErrorKind::ModeConflict,
                EngineError::Closed
                | EngineError::InvalidHandle { .. }
                | EngineError::WriterReentrant
                | EngineError::TooManyReaders { .. } => ErrorKind::Resource,
            },
        }
    }
}

impl From<EngineError> for StoreError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Closed => Self::StoreClosed,
            EngineError::ReadOnly { txid } => {
                Self::mode_conflict(format!("write attempted in read transaction {txid}"))
            }
            other => Self::Engine(other),
        }
    }
}
