//! Transaction state.

use std::fmt;

/// State of a transaction scope.
///
/// All nested scopes of one top-level transaction share its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionState {
    /// Transaction is active and will commit if the top-level body succeeds.
    Active,
    /// A nested scope failed; the transaction still accepts operations but
    /// will be aborted when the top-level scope ends.
    RollbackOnly,
    /// Transaction has been committed.
    Committed,
    /// Transaction has been aborted.
    Aborted,
}

impl TransactionState {
    /// Returns true while operations may still be issued.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Active | Self::RollbackOnly)
    }

    /// Returns true once the transaction has been committed or aborted.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !self.is_open()
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::RollbackOnly => "rollback-only",
            Self::Committed => "committed",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_states() {
        assert!(TransactionState::Active.is_open());
        assert!(TransactionState::RollbackOnly.is_open());
        assert!(TransactionState::Committed.is_finished());
        assert!(TransactionState::Aborted.is_finished());
    }

    #[test]
    fn display() {
        assert_eq!(TransactionState::RollbackOnly.to_string(), "rollback-only");
    }
}
