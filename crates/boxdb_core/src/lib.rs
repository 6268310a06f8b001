//! # BoxDB Core
//!
//! Typed object-persistence facade for BoxDB.
//!
//! This crate provides:
//! - [`Store`]: owns the engine, hands out boxes, runs transactions
//! - [`EntityBox`]: typed CRUD, bulk and iteration operations per entity type
//! - [`Transaction`]: read and write scopes with nesting and all-or-nothing
//!   commit
//! - [`Visitor`]: short-circuiting and fallible scan protocols
//! - [`Id`] and [`EntitySchema`]: typed identity and the per-type record
//!   mapping
//!
//! ## Transactions
//!
//! A transaction body receives a `&Transaction` and passes it on explicitly:
//! to the `_in_txn` forms of box operations, or to
//! [`Transaction::run_in_transaction`] for a nested scope. The top-level
//! scope commits when its body returns `Ok`. If any nested scope fails, the
//! whole transaction is rolled back, including writes issued after the
//! failure, and the store reports [`StoreError::TransactionAborted`] unless
//! the body itself failed.
//!
//! ```rust
//! use boxdb_core::{Store, StoreError};
//!
//! let store = Store::open_in_memory()?;
//!
//! let err = store
//!     .run_in_transaction(|txn| {
//!         let _ = txn.run_in_transaction(|_| {
//!             Err::<(), _>(StoreError::validation("rejected"))
//!         });
//!         assert!(txn.is_rollback_only());
//!         Ok::<_, StoreError>(())
//!     })
//!     .unwrap_err();
//! assert!(matches!(err, StoreError::TransactionAborted { .. }));
//! # Ok::<(), StoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entity;
mod entity_box;
mod error;
mod model;
mod store;
mod transaction;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use entity::{EntitySchema, Id};
pub use entity_box::{EntityBox, Fallible, FallibleShortCircuit, ShortCircuit, Visitor};
pub use error::{ErrorKind, StoreError, StoreResult};
pub use store::Store;
pub use transaction::{Transaction, TransactionState};

pub use boxdb_engine::{EngineStorage, EntityTypeId, InMemoryEngine, TransactionId, TxMode};
