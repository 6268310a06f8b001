//! Engine transaction shared by all nesting levels.

use crate::transaction::state::TransactionState;
use boxdb_engine::{EngineResult, EngineStorage, TransactionId, TxHandle, TxMode};
use std::cell::{Cell, RefCell};
use tracing::{trace, warn};

/// Owns the engine handle of a top-level transaction.
///
/// Only the top-level scope commits or aborts; nested scopes borrow it and
/// can only mark it for rollback. A scope that is dropped without being
/// finished (for example while unwinding) aborts its handle.
pub(crate) struct TxScope<'e> {
    engine: &'e dyn EngineStorage,
    handle: Option<TxHandle>,
    txid: TransactionId,
    mode: TxMode,
    state: Cell<TransactionState>,
    rollback_reason: RefCell<Option<String>>,
}

impl<'e> TxScope<'e> {
    pub(crate) fn new(engine: &'e dyn EngineStorage, handle: TxHandle) -> Self {
        Self {
            engine,
            txid: handle.id(),
            mode: handle.mode(),
            handle: Some(handle),
            state: Cell::new(TransactionState::Active),
            rollback_reason: RefCell::new(None),
        }
    }

    pub(crate) fn engine(&self) -> &'e dyn EngineStorage {
        self.engine
    }

    pub(crate) fn handle(&self) -> Option<&TxHandle> {
        self.handle.as_ref()
    }

    pub(crate) fn txid(&self) -> TransactionId {
        self.txid
    }

    pub(crate) fn mode(&self) -> TxMode {
        self.mode
    }

    pub(crate) fn state(&self) -> TransactionState {
        self.state.get()
    }

    /// Marks the transaction for rollback. The first reason wins.
    pub(crate) fn mark_rollback_only(&self, reason: String) {
        let mut slot = self.rollback_reason.borrow_mut();
        if slot.is_none() {
            trace!(txid = %self.txid, %reason, "transaction marked rollback-only");
            *slot = Some(reason);
            self.state.set(TransactionState::RollbackOnly);
        }
    }

    /// Returns the reason the transaction was marked for rollback, if any.
    pub(crate) fn rollback_reason(&self) -> Option<String> {
        self.rollback_reason.borrow().clone()
    }

    pub(crate) fn commit(mut self) -> EngineResult<()> {
        match self.handle.take() {
            Some(handle) => {
                let result = self.engine.commit(handle);
                self.state.set(if result.is_ok() {
                    TransactionState::Committed
                } else {
                    TransactionState::Aborted
                });
                result
            }
            None => Ok(()),
        }
    }

    pub(crate) fn abort(mut self) -> EngineResult<()> {
        self.state.set(TransactionState::Aborted);
        match self.handle.take() {
            Some(handle) => self.engine.abort(handle),
            None => Ok(()),
        }
    }
}

impl Drop for TxScope<'_> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            warn!(txid = %self.txid, "transaction scope dropped while active, aborting");
            if let Err(e) = self.engine.abort(handle) {
                trace!(txid = %self.txid, error = %e, "abort on drop failed");
            }
        }
    }
}
