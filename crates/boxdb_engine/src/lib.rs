//! # BoxDB Engine
//!
//! Storage engine contract and an in-memory implementation for BoxDB.
//!
//! This crate is the lowest layer BoxDB talks to. An engine stores **opaque
//! records**: byte payloads addressed by `(entity type, id)`. It knows nothing
//! about entities, schemas or nesting; the facade in `boxdb_core` owns all of
//! that.
//!
//! ## Contract
//!
//! - Transactions are either read or write ([`TxMode`])
//! - Readers see a stable snapshot taken when they begin
//! - At most one write transaction is active at a time; a second writer
//!   blocks until the first commits or aborts
//! - A write becomes visible to new transactions only after commit
//!
//! ## Available Engines
//!
//! - [`InMemoryEngine`] - Copy-on-write, snapshot-isolated, non-durable
//!
//! ## Example
//!
//! ```rust
//! use boxdb_engine::{EngineStorage, EntityTypeId, InMemoryEngine, TxMode};
//!
//! let engine = InMemoryEngine::new();
//! let people = EntityTypeId::new(1);
//!
//! let tx = engine.begin_transaction(TxMode::Write).unwrap();
//! let id = engine.next_id(&tx, people).unwrap();
//! engine.put_record(&tx, people, id, b"alice".to_vec()).unwrap();
//! engine.commit(tx).unwrap();
//!
//! let tx = engine.begin_transaction(TxMode::Read).unwrap();
//! assert_eq!(engine.get_record(&tx, people, id).unwrap(), Some(b"alice".to_vec()));
//! engine.abort(tx).unwrap();
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod engine;
mod error;
mod memory;
mod types;

pub use engine::{EngineStorage, Record, RecordCursor, TxHandle};
pub use error::{EngineError, EngineResult};
pub use memory::{InMemoryEngine, DEFAULT_MAX_READERS};
pub use types::{EntityTypeId, TransactionId, TxMode};
