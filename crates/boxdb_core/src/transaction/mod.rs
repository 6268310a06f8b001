//! Transaction scopes.
//!
//! A top-level transaction owns one engine transaction. Nested scopes run
//! inside it at increasing depth and can only mark it for rollback; the
//! top-level scope alone commits or aborts.

mod context;
mod scope;
mod state;

pub use context::Transaction;
pub use state::TransactionState;

pub(crate) use scope::TxScope;
