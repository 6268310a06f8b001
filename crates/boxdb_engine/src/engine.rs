//! Storage engine trait definition.

use crate::error::EngineResult;
use crate::types::{EntityTypeId, TransactionId, TxMode};

/// A stored record: the record id and its encoded payload.
pub type Record = (u64, Vec<u8>);

/// Cursor over the records of one entity type, in ascending id order.
///
/// A cursor reads from the snapshot that was current when it was opened;
/// writes made afterwards, even in the same transaction, are not observed.
pub type RecordCursor = Box<dyn Iterator<Item = EngineResult<Record>> + Send>;

/// Handle to an open engine transaction.
///
/// Handles are not `Clone`: `commit` and `abort` consume them, so a finished
/// transaction cannot be used again through the same handle.
#[derive(Debug)]
pub struct TxHandle {
    id: TransactionId,
    mode: TxMode,
}

impl TxHandle {
    /// Creates a handle. Called by engine implementations.
    #[must_use]
    pub const fn new(id: TransactionId, mode: TxMode) -> Self {
        Self { id, mode }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub const fn id(&self) -> TransactionId {
        self.id
    }

    /// Returns the transaction mode.
    #[must_use]
    pub const fn mode(&self) -> TxMode {
        self.mode
    }
}

/// A record store with transactions, id sequences and cursors.
///
/// Engines are **opaque record stores**: payloads are bytes, addressed by
/// `(EntityTypeId, u64)`. Id `0` is reserved to mean "unassigned" and is never
/// stored.
///
/// # Invariants
///
/// - Reads through a handle observe the snapshot taken at `begin_transaction`,
///   plus that transaction's own writes
/// - Only one write transaction is active at a time
/// - `commit` publishes all writes of a transaction atomically; `abort`
///   discards them
/// - `next_id` never returns an id that is or was in use for that entity type
/// - Engines must be `Send + Sync` for concurrent access
///
/// # Implementors
///
/// - [`super::InMemoryEngine`] - Copy-on-write in-memory engine
pub trait EngineStorage: Send + Sync {
    /// Begins a transaction in the given mode.
    ///
    /// Beginning a write transaction blocks while another thread owns the
    /// active writer.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The engine is closed
    /// - The calling thread already owns the active write transaction
    /// - The reader limit is reached
    fn begin_transaction(&self, mode: TxMode) -> EngineResult<TxHandle>;

    /// Commits a transaction, publishing its writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or the engine is closed.
    fn commit(&self, handle: TxHandle) -> EngineResult<()>;

    /// Aborts a transaction, discarding its writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or the engine is closed.
    fn abort(&self, handle: TxHandle) -> EngineResult<()>;

    /// Allocates the next id for an entity type.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not a valid write transaction.
    fn next_id(&self, handle: &TxHandle, entity_type: EntityTypeId) -> EngineResult<u64>;

    /// Reads the record with the given id.
    ///
    /// Returns `None` if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or the engine is closed.
    fn get_record(
        &self,
        handle: &TxHandle,
        entity_type: EntityTypeId,
        id: u64,
    ) -> EngineResult<Option<Vec<u8>>>;

    /// Inserts or replaces the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The handle is not a valid write transaction
    /// - `id` is `0`
    fn put_record(
        &self,
        handle: &TxHandle,
        entity_type: EntityTypeId,
        id: u64,
        bytes: Vec<u8>,
    ) -> EngineResult<()>;

    /// Deletes the record with the given id.
    ///
    /// Returns whether a record was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not a valid write transaction.
    fn delete_record(
        &self,
        handle: &TxHandle,
        entity_type: EntityTypeId,
        id: u64,
    ) -> EngineResult<bool>;

    /// Deletes every record of an entity type.
    ///
    /// Returns the number of records removed. The id sequence is kept, so
    /// removed ids are not handed out again.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is not a valid write transaction.
    fn delete_all(&self, handle: &TxHandle, entity_type: EntityTypeId) -> EngineResult<u64>;

    /// Opens a cursor over all records of an entity type.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or the engine is closed.
    fn open_cursor(
        &self,
        handle: &TxHandle,
        entity_type: EntityTypeId,
    ) -> EngineResult<RecordCursor>;

    /// Counts the records of an entity type.
    ///
    /// With `limit > 0` the result is `min(count, limit)` and at most `limit`
    /// records are examined. A `limit` of `0` means no limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the handle is invalid or the engine is closed.
    fn count(&self, handle: &TxHandle, entity_type: EntityTypeId, limit: u64) -> EngineResult<u64>;

    /// Closes the engine. Idempotent.
    ///
    /// Open transactions become invalid and all later calls fail with
    /// [`crate::EngineError::Closed`].
    fn close(&self);

    /// Returns true once [`EngineStorage::close`] has been called.
    fn is_closed(&self) -> bool;
}
