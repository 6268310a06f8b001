//! Core type definitions shared by engines and the facade.

use std::fmt;

/// Unique identifier for an engine transaction.
///
/// Transaction IDs are monotonically increasing and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId(pub u64);

impl TransactionId {
    /// Creates a new transaction ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn:{}", self.0)
    }
}

/// Identifier for an entity type (the record namespace of one box).
///
/// Entity type IDs are stable and assigned when a type is first registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityTypeId(pub u32);

impl EntityTypeId {
    /// Creates a new entity type ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type:{}", self.0)
    }
}

/// Access mode of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxMode {
    /// Snapshot reads only.
    Read,
    /// Reads and writes; at most one active at a time.
    Write,
}

impl TxMode {
    /// Returns true for [`TxMode::Write`].
    #[must_use]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }

    /// Returns true if a scope in this mode may host a nested scope in `inner`.
    ///
    /// Read scopes nest anywhere; write scopes only inside write scopes.
    #[must_use]
    pub const fn admits(self, inner: TxMode) -> bool {
        !inner.is_write() || self.is_write()
    }
}

impl fmt::Display for TxMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_id_ordering() {
        let t1 = TransactionId::new(1);
        let t2 = TransactionId::new(2);
        assert!(t1 < t2);
    }

    #[test]
    fn entity_type_id_display() {
        let t = EntityTypeId::new(42);
        assert_eq!(format!("{t}"), "type:42");
    }

    #[test]
    fn mode_nesting_rules() {
        assert!(TxMode::Write.admits(TxMode::Write));
        assert!(TxMode::Write.admits(TxMode::Read));
        assert!(TxMode::Read.admits(TxMode::Read));
        assert!(!TxMode::Read.admits(TxMode::Write));
    }
}
