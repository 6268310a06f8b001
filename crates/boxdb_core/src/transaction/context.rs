//! Transaction context handed to transaction bodies.

use crate::error::{StoreError, StoreResult};
use crate::store::StoreShared;
use crate::transaction::scope::TxScope;
use crate::transaction::state::TransactionState;
use boxdb_engine::{EngineStorage, TransactionId, TxHandle, TxMode};
use std::fmt;
use tracing::trace;

/// An active transaction scope.
///
/// A `Transaction` is only ever lent to a closure: the store begins the
/// engine transaction, hands the body a `&Transaction`, and commits or aborts
/// once the body returns. Passing it to the `_in_txn` box operations or to
/// [`Transaction::run_in_transaction`] runs them inside the same engine
/// transaction.
///
/// Nested scopes share the top-level engine transaction. If a nested scope
/// fails, the whole top-level transaction is rolled back when it ends:
/// later writes are still accepted, but nothing is committed.
///
/// `Transaction` is neither `Send` nor `Sync`; nested scopes always run on
/// the thread that began the transaction.
pub struct Transaction<'a> {
    store: &'a StoreShared,
    scope: &'a TxScope<'a>,
    depth: u32,
    mode: TxMode,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(
        store: &'a StoreShared,
        scope: &'a TxScope<'a>,
        depth: u32,
        mode: TxMode,
    ) -> Self {
        Self {
            store,
            scope,
            depth,
            mode,
        }
    }

    /// Returns the engine transaction ID shared by all nesting levels.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.scope.txid()
    }

    /// Returns the mode of this scope.
    ///
    /// A read scope nested in a write transaction reports [`TxMode::Read`].
    #[must_use]
    pub fn mode(&self) -> TxMode {
        self.mode
    }

    /// Returns true if writes are rejected in this scope.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        !self.mode.is_write()
    }

    /// Returns the nesting depth (0 for the top-level transaction).
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns the state shared by all nesting levels.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.scope.state()
    }

    /// Returns true if a nested scope failed and the transaction will be
    /// rolled back.
    #[must_use]
    pub fn is_rollback_only(&self) -> bool {
        self.state() == TransactionState::RollbackOnly
    }

    /// Runs `f` in a nested write scope.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ModeConflict`] if this scope is read-only,
    /// [`StoreError::InvalidOperation`] if the nesting limit is exceeded, or
    /// the error returned by `f`. Any error marks the whole transaction for
    /// rollback.
    pub fn run_in_transaction<T, Error, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
        Error: From<StoreError>,
    {
        self.nested(TxMode::Write, f)
    }

    /// Runs `f` in a nested read scope.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidOperation`] if the nesting limit is
    /// exceeded, or the error returned by `f`. Any error marks the whole
    /// transaction for rollback.
    pub fn run_in_read_only_transaction<T, Error, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
        Error: From<StoreError>,
    {
        self.nested(TxMode::Read, f)
    }

    /// Runs `f` one level deeper in `mode`, marking the transaction for
    /// rollback if it fails.
    pub(crate) fn nested<T, Error, F>(&self, mode: TxMode, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
        Error: From<StoreError>,
    {
        let depth = self.depth.saturating_add(1);
        let result = match self.enter(mode, depth) {
            Ok(child) => {
                trace!(txid = %self.id(), depth, %mode, "entering nested scope");
                f(&child)
            }
            Err(e) => Err(Error::from(e)),
        };

        if result.is_err() {
            self.scope
                .mark_rollback_only(format!("nested {mode} scope at depth {depth} failed"));
        }
        result
    }

    /// Marks the transaction rollback-only when a multi-record write fails,
    /// so records it already applied cannot be committed.
    pub(crate) fn rollback_on_err<T>(&self, what: &str, result: StoreResult<T>) -> StoreResult<T> {
        if result.is_err() {
            self.scope
                .mark_rollback_only(format!("{what} failed in {}", self.id()));
        }
        result
    }

    fn enter(&self, mode: TxMode, depth: u32) -> StoreResult<Transaction<'a>> {
        self.store.ensure_open()?;
        if !self.mode.admits(mode) {
            return Err(StoreError::mode_conflict(format!(
                "cannot open a {mode} scope inside the read scope of {}",
                self.id()
            )));
        }
        let max = self.store.config().max_nesting_depth;
        if depth > max {
            return Err(StoreError::invalid_operation(format!(
                "nesting depth {depth} exceeds the limit of {max}"
            )));
        }
        Ok(Self::new(self.store, self.scope, depth, mode))
    }

    pub(crate) fn engine(&self) -> &dyn EngineStorage {
        self.scope.engine()
    }

    /// Checks that this transaction was begun by `store`.
    pub(crate) fn ensure_store(&self, store: &StoreShared) -> StoreResult<()> {
        if std::ptr::eq(self.store, store) {
            Ok(())
        } else {
            Err(StoreError::invalid_operation(
                "transaction belongs to a different store",
            ))
        }
    }

    /// Returns the engine handle for reads.
    pub(crate) fn read_handle(&self) -> StoreResult<&TxHandle> {
        self.store.ensure_open()?;
        if self.state().is_finished() {
            return Err(StoreError::invalid_operation(format!(
                "transaction {} is {}",
                self.id(),
                self.state()
            )));
        }
        self.scope.handle().ok_or_else(|| {
            StoreError::invalid_operation(format!("transaction {} is finished", self.id()))
        })
    }

    /// Returns the engine handle for writes.
    pub(crate) fn write_handle(&self) -> StoreResult<&TxHandle> {
        if !self.mode.is_write() || !self.scope.mode().is_write() {
            return Err(StoreError::mode_conflict(format!(
                "write attempted in read-only scope of {}",
                self.id()
            )));
        }
        self.read_handle()
    }
}

impl fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transaction")
            .field("id", &self.id())
            .field("mode", &self.mode)
            .field("depth", &self.depth)
            .field("state", &self.state())
            .finish()
    }
}
