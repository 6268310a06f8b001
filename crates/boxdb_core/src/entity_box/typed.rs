//! Typed box implementation.

use crate::entity::{short_type_name, EntitySchema, Id};
use crate::entity_box::visitor::{Fallible, FallibleShortCircuit, ShortCircuit, Visitor};
use crate::error::{StoreError, StoreResult};
use crate::store::StoreShared;
use crate::transaction::Transaction;
use boxdb_engine::{EngineStorage, EntityTypeId, TxHandle, TxMode};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::trace;

/// A box of entities of type `E`.
///
/// `EntityBox<E>` provides typed CRUD, bulk and iteration operations over
/// the records of one entity type. Boxes are cheap to clone and are bound to
/// the store that created them; once that store is closed every operation
/// fails with [`StoreError::StoreClosed`].
///
/// Each operation comes in two forms:
/// - `op(..)` runs in its own transaction of the minimal mode
/// - `op_in_txn(txn, ..)` runs inside a transaction begun by
///   [`crate::Store::run_in_transaction`] and friends
///
/// Calling the implicit form from inside a write transaction body on the
/// same thread fails with a resource error instead of deadlocking; pass the
/// transaction instead.
///
/// # Example
///
/// ```rust
/// use boxdb_codec::{from_cbor, to_cbor, CodecResult};
/// use boxdb_core::{EntitySchema, Id, Store, StoreError};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// struct Task {
///     #[serde(skip)]
///     id: Id<Task>,
///     title: String,
/// }
///
/// impl EntitySchema for Task {
///     const ENTITY_NAME: &'static str = "Task";
///     fn identity(&self) -> Id<Self> { self.id }
///     fn set_identity(&mut self, id: Id<Self>) { self.id = id; }
///     fn encode(&self) -> CodecResult<Vec<u8>> { to_cbor(self) }
///     fn decode(id: Id<Self>, bytes: &[u8]) -> CodecResult<Self> {
///         let mut task: Task = from_cbor(bytes)?;
///         task.id = id;
///         Ok(task)
///     }
/// }
///
/// let store = Store::open_in_memory()?;
/// let tasks = store.box_for::<Task>()?;
///
/// let mut task = Task { id: Id::UNASSIGNED, title: "write docs".into() };
/// let id = tasks.put(&mut task)?;
/// assert_eq!(task.id, id);
///
/// store.run_in_transaction(|txn| {
///     let mut other = Task { id: Id::UNASSIGNED, title: "review".into() };
///     tasks.put_in_txn(txn, &mut other)?;
///     assert_eq!(tasks.count_in_txn(txn)?, 2);
///     Ok::<_, StoreError>(())
/// })?;
///
/// let titles: Vec<String> = tasks.all()?.into_iter().map(|t| t.title).collect();
/// assert_eq!(titles, ["write docs", "review"]);
/// # Ok::<(), StoreError>(())
/// ```
pub struct EntityBox<E: EntitySchema> {
    store: Arc<StoreShared>,
    type_id: EntityTypeId,
    _entity: PhantomData<fn() -> E>,
}

impl<E: EntitySchema> EntityBox<E> {
    pub(crate) fn new(store: Arc<StoreShared>, type_id: EntityTypeId) -> Self {
        Self {
            store,
            type_id,
            _entity: PhantomData,
        }
    }

    /// Returns the engine type id of `E` in this store.
    #[must_use]
    pub fn entity_type(&self) -> EntityTypeId {
        self.type_id
    }

    /// Returns the entity name `E` is registered under.
    #[must_use]
    pub fn name(&self) -> &'static str {
        E::ENTITY_NAME
    }

    // ========================================================================
    // Put
    // ========================================================================

    /// Stores an entity, assigning a new id if it has none.
    ///
    /// The assigned id is written onto `entity`. An entity with an assigned
    /// id replaces the stored record with that id. If the operation fails the
    /// entity keeps its previous id.
    pub fn put(&self, entity: &mut E) -> StoreResult<Id<E>> {
        let original = entity.identity();
        let result = self.write(|txn| self.put_in_txn(txn, entity));
        if result.is_err() {
            entity.set_identity(original);
        }
        result
    }

    /// Stores an entity within an existing transaction.
    pub fn put_in_txn(&self, txn: &Transaction<'_>, entity: &mut E) -> StoreResult<Id<E>> {
        let handle = self.write_handle(txn)?;
        let original = entity.identity();
        let result = self.store_entity(txn.engine(), handle, entity);
        if result.is_err() {
            entity.set_identity(original);
        }
        result
    }

    /// Stores several entities in one transaction.
    ///
    /// Either all entities are stored or none are; on failure every entity
    /// keeps its previous id.
    pub fn put_many(&self, entities: &mut [E]) -> StoreResult<Vec<Id<E>>> {
        let originals: Vec<Id<E>> = entities.iter().map(EntitySchema::identity).collect();
        let result = self.write(|txn| self.put_many_in_txn(txn, entities));
        if result.is_err() {
            for (entity, id) in entities.iter_mut().zip(originals) {
                entity.set_identity(id);
            }
        }
        result
    }

    /// Stores several entities within an existing transaction.
    ///
    /// If any entity fails, every entity keeps the id it had before the call
    /// and `txn` is marked rollback-only, so the records already written are
    /// discarded even if the caller handles the error.
    pub fn put_many_in_txn(
        &self,
        txn: &Transaction<'_>,
        entities: &mut [E],
    ) -> StoreResult<Vec<Id<E>>> {
        let handle = self.write_handle(txn)?;
        let engine = txn.engine();
        let originals: Vec<Id<E>> = entities.iter().map(EntitySchema::identity).collect();

        let result = entities
            .iter_mut()
            .map(|entity| self.store_entity(engine, handle, entity))
            .collect::<StoreResult<Vec<_>>>();
        if result.is_err() {
            for (entity, id) in entities.iter_mut().zip(originals) {
                entity.set_identity(id);
            }
        }
        txn.rollback_on_err("put_many", result)
    }

    /// Stores a copy of `entity` and returns the copy with its id assigned.
    ///
    /// `entity` itself is not changed.
    pub fn put_struct(&self, entity: &E) -> StoreResult<E>
    where
        E: Clone,
    {
        self.write(|txn| self.put_struct_in_txn(txn, entity))
    }

    /// Stores a copy of `entity` within an existing transaction.
    pub fn put_struct_in_txn(&self, txn: &Transaction<'_>, entity: &E) -> StoreResult<E>
    where
        E: Clone,
    {
        let mut copy = entity.clone();
        self.put_in_txn(txn, &mut copy)?;
        Ok(copy)
    }

    /// Stores a copy of `entity` and returns the id it was stored under.
    ///
    /// `entity` itself is not changed.
    pub fn put_immutable(&self, entity: &E) -> StoreResult<Id<E>>
    where
        E: Clone,
    {
        self.put_struct(entity).map(|stored| stored.identity())
    }

    /// Stores a copy of `entity` within an existing transaction.
    pub fn put_immutable_in_txn(&self, txn: &Transaction<'_>, entity: &E) -> StoreResult<Id<E>>
    where
        E: Clone,
    {
        self.put_struct_in_txn(txn, entity)
            .map(|stored| stored.identity())
    }

    // ========================================================================
    // Get
    // ========================================================================

    /// Gets an entity by id.
    ///
    /// Returns `None` if no entity has that id, including the unassigned id.
    pub fn get(&self, id: Id<E>) -> StoreResult<Option<E>> {
        self.read(|txn| self.get_in_txn(txn, id))
    }

    /// Gets an entity within an existing transaction.
    ///
    /// This sees the transaction's own writes.
    pub fn get_in_txn(&self, txn: &Transaction<'_>, id: Id<E>) -> StoreResult<Option<E>> {
        let handle = self.read_handle(txn)?;
        self.load(txn.engine(), handle, id)
    }

    /// Gets several entities by id.
    ///
    /// Ids without an entity are left out of the result.
    pub fn get_many<I>(&self, ids: I) -> StoreResult<HashMap<Id<E>, E>>
    where
        I: IntoIterator<Item = Id<E>>,
    {
        self.read(|txn| self.get_many_in_txn(txn, ids))
    }

    /// Gets several entities within an existing transaction.
    pub fn get_many_in_txn<I>(
        &self,
        txn: &Transaction<'_>,
        ids: I,
    ) -> StoreResult<HashMap<Id<E>, E>>
    where
        I: IntoIterator<Item = Id<E>>,
    {
        let handle = self.read_handle(txn)?;
        let mut found = HashMap::new();
        for id in ids {
            if found.contains_key(&id) {
                continue;
            }
            if let Some(entity) = self.load(txn.engine(), handle, id)? {
                found.insert(id, entity);
            }
        }
        Ok(found)
    }

    /// Returns every entity, in ascending id order.
    pub fn all(&self) -> StoreResult<Vec<E>> {
        self.read(|txn| self.all_in_txn(txn))
    }

    /// Returns every entity within an existing transaction.
    pub fn all_in_txn(&self, txn: &Transaction<'_>) -> StoreResult<Vec<E>> {
        let mut entities = Vec::new();
        self.scan_in_txn(
            txn,
            Fallible(|entity: E| {
                entities.push(entity);
                Ok::<_, StoreError>(())
            }),
        )?;
        Ok(entities)
    }

    // ========================================================================
    // Count and membership
    // ========================================================================

    /// Counts the stored entities.
    pub fn count(&self) -> StoreResult<u64> {
        self.count_max(0)
    }

    /// Counts the stored entities within an existing transaction.
    pub fn count_in_txn(&self, txn: &Transaction<'_>) -> StoreResult<u64> {
        self.count_max_in_txn(txn, 0)
    }

    /// Counts the stored entities, stopping at `limit`.
    ///
    /// Returns `min(count, limit)`; a `limit` of `0` means no limit.
    pub fn count_max(&self, limit: u64) -> StoreResult<u64> {
        self.read(|txn| self.count_max_in_txn(txn, limit))
    }

    /// Counts up to `limit` entities within an existing transaction.
    pub fn count_max_in_txn(&self, txn: &Transaction<'_>, limit: u64) -> StoreResult<u64> {
        let handle = self.read_handle(txn)?;
        Ok(txn.engine().count(handle, self.type_id, limit)?)
    }

    /// Returns true if the box holds no entities.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.count_max(1)? == 0)
    }

    /// Returns true if the box holds no entities, within an existing
    /// transaction.
    pub fn is_empty_in_txn(&self, txn: &Transaction<'_>) -> StoreResult<bool> {
        Ok(self.count_max_in_txn(txn, 1)? == 0)
    }

    /// Checks whether an entity with `id` exists.
    pub fn contains(&self, id: Id<E>) -> StoreResult<bool> {
        self.read(|txn| self.contains_in_txn(txn, id))
    }

    /// Checks whether an entity with `id` exists within an existing
    /// transaction.
    pub fn contains_in_txn(&self, txn: &Transaction<'_>, id: Id<E>) -> StoreResult<bool> {
        let handle = self.read_handle(txn)?;
        self.exists(txn.engine(), handle, id)
    }

    /// Checks whether entities exist for every id.
    ///
    /// An empty id sequence yields `true`.
    pub fn contains_all<I>(&self, ids: I) -> StoreResult<bool>
    where
        I: IntoIterator<Item = Id<E>>,
    {
        self.read(|txn| self.contains_all_in_txn(txn, ids))
    }

    /// Checks whether entities exist for every id, within an existing
    /// transaction.
    pub fn contains_all_in_txn<I>(&self, txn: &Transaction<'_>, ids: I) -> StoreResult<bool>
    where
        I: IntoIterator<Item = Id<E>>,
    {
        let handle = self.read_handle(txn)?;
        for id in ids {
            if !self.exists(txn.engine(), handle, id)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // ========================================================================
    // Remove
    // ========================================================================

    /// Removes the entity with `id`.
    ///
    /// Returns whether an entity was removed.
    pub fn remove(&self, id: Id<E>) -> StoreResult<bool> {
        self.write(|txn| self.remove_in_txn(txn, id))
    }

    /// Removes the entity with `id` within an existing transaction.
    pub fn remove_in_txn(&self, txn: &Transaction<'_>, id: Id<E>) -> StoreResult<bool> {
        let handle = self.write_handle(txn)?;
        self.delete(txn.engine(), handle, id)
    }

    /// Removes the entities with the given ids in one transaction.
    ///
    /// Returns the number of entities removed; missing ids are skipped.
    pub fn remove_many<I>(&self, ids: I) -> StoreResult<u64>
    where
        I: IntoIterator<Item = Id<E>>,
    {
        self.write(|txn| self.remove_many_in_txn(txn, ids))
    }

    /// Removes several entities within an existing transaction.
    ///
    /// A failure marks `txn` rollback-only.
    pub fn remove_many_in_txn<I>(&self, txn: &Transaction<'_>, ids: I) -> StoreResult<u64>
    where
        I: IntoIterator<Item = Id<E>>,
    {
        let handle = self.write_handle(txn)?;
        let result = ids
            .into_iter()
            .try_fold(0u64, |removed, id| -> StoreResult<u64> {
                Ok(removed + u64::from(self.delete(txn.engine(), handle, id)?))
            });
        txn.rollback_on_err("remove_many", result)
    }

    /// Removes every entity.
    ///
    /// Returns the number of entities removed. Removed ids are not reused.
    pub fn remove_all(&self) -> StoreResult<u64> {
        self.write(|txn| self.remove_all_in_txn(txn))
    }

    /// Removes every entity within an existing transaction.
    pub fn remove_all_in_txn(&self, txn: &Transaction<'_>) -> StoreResult<u64> {
        let handle = self.write_handle(txn)?;
        let removed = txn.engine().delete_all(handle, self.type_id)?;
        trace!(entity = E::ENTITY_NAME, removed, "removed all");
        Ok(removed)
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Visits entities in ascending id order while `f` returns `true`.
    ///
    /// Returns the number of entities passed to `f`.
    pub fn visit<F>(&self, f: F) -> StoreResult<u64>
    where
        F: FnMut(E) -> bool,
    {
        self.scan(ShortCircuit(f))
    }

    /// Visits entities within an existing transaction while `f` returns
    /// `true`.
    pub fn visit_in_txn<F>(&self, txn: &Transaction<'_>, f: F) -> StoreResult<u64>
    where
        F: FnMut(E) -> bool,
    {
        self.scan_in_txn(txn, ShortCircuit(f))
    }

    /// Passes every entity to `f` in ascending id order, stopping at the first
    /// error.
    ///
    /// The error returned by `f` is returned unchanged.
    pub fn for_each<Err, F>(&self, f: F) -> Result<u64, Err>
    where
        F: FnMut(E) -> Result<(), Err>,
        Err: From<StoreError>,
    {
        self.scan(Fallible(f))
    }

    /// Passes every entity to `f` within an existing transaction.
    pub fn for_each_in_txn<Err, F>(&self, txn: &Transaction<'_>, f: F) -> Result<u64, Err>
    where
        F: FnMut(E) -> Result<(), Err>,
        Err: From<StoreError>,
    {
        self.scan_in_txn(txn, Fallible(f))
    }

    /// Visits entities while `f` returns `Ok(true)`.
    ///
    /// The scan ends at the first `Ok(false)` or error.
    pub fn try_visit<Err, F>(&self, f: F) -> Result<u64, Err>
    where
        F: FnMut(E) -> Result<bool, Err>,
        Err: From<StoreError>,
    {
        self.scan(FallibleShortCircuit(f))
    }

    /// Visits entities within an existing transaction while `f` returns
    /// `Ok(true)`.
    pub fn try_visit_in_txn<Err, F>(&self, txn: &Transaction<'_>, f: F) -> Result<u64, Err>
    where
        F: FnMut(E) -> Result<bool, Err>,
        Err: From<StoreError>,
    {
        self.scan_in_txn(txn, FallibleShortCircuit(f))
    }

    /// Runs `visitor` over the entities in ascending id order, in a read
    /// transaction.
    ///
    /// The scan reads the snapshot taken when it starts. Returns the number
    /// of entities passed to the visitor, including the one that stopped the
    /// scan.
    pub fn scan<V>(&self, visitor: V) -> Result<u64, V::Error>
    where
        V: Visitor<E>,
        V::Error: From<StoreError>,
    {
        self.store
            .run_top_level(TxMode::Read, |txn| self.scan_in_txn(txn, visitor))
    }

    /// Runs `visitor` over the entities within an existing transaction.
    pub fn scan_in_txn<V>(&self, txn: &Transaction<'_>, mut visitor: V) -> Result<u64, V::Error>
    where
        V: Visitor<E>,
        V::Error: From<StoreError>,
    {
        let handle = self.read_handle(txn)?;
        let cursor = txn
            .engine()
            .open_cursor(handle, self.type_id)
            .map_err(StoreError::from)?;

        let mut visited = 0;
        for record in cursor {
            let (id, bytes) = record.map_err(StoreError::from)?;
            let entity = E::decode(Id::new(id), &bytes).map_err(StoreError::from)?;
            visited += 1;
            if visitor.visit(entity)?.is_break() {
                break;
            }
        }
        trace!(entity = E::ENTITY_NAME, visited, "scan finished");
        Ok(visited)
    }

    /// Visits the entities for `ids` in the given order while `f` returns
    /// `true`.
    ///
    /// `f` receives each id's position in `ids` and its entity, or `None` if
    /// there is none. Duplicate ids are visited once per occurrence.
    pub fn visit_ids<I, F>(&self, ids: I, mut f: F) -> StoreResult<u64>
    where
        I: IntoIterator<Item = Id<E>>,
        F: FnMut(usize, Option<E>) -> bool,
    {
        self.scan_ids(
            ids,
            ShortCircuit(|(position, entity): (usize, Option<E>)| f(position, entity)),
        )
    }

    /// Visits the entities for `ids` within an existing transaction.
    pub fn visit_ids_in_txn<I, F>(
        &self,
        txn: &Transaction<'_>,
        ids: I,
        mut f: F,
    ) -> StoreResult<u64>
    where
        I: IntoIterator<Item = Id<E>>,
        F: FnMut(usize, Option<E>) -> bool,
    {
        self.scan_ids_in_txn(
            txn,
            ids,
            ShortCircuit(|(position, entity): (usize, Option<E>)| f(position, entity)),
        )
    }

    /// Passes the entity for each of `ids` to `f`, stopping at the first
    /// error.
    pub fn for_each_id<I, Err, F>(&self, ids: I, mut f: F) -> Result<u64, Err>
    where
        I: IntoIterator<Item = Id<E>>,
        F: FnMut(usize, Option<E>) -> Result<(), Err>,
        Err: From<StoreError>,
    {
        self.scan_ids(
            ids,
            Fallible(|(position, entity): (usize, Option<E>)| f(position, entity)),
        )
    }

    /// Passes the entity for each of `ids` to `f` within an existing
    /// transaction.
    pub fn for_each_id_in_txn<I, Err, F>(
        &self,
        txn: &Transaction<'_>,
        ids: I,
        mut f: F,
    ) -> Result<u64, Err>
    where
        I: IntoIterator<Item = Id<E>>,
        F: FnMut(usize, Option<E>) -> Result<(), Err>,
        Err: From<StoreError>,
    {
        self.scan_ids_in_txn(
            txn,
            ids,
            Fallible(|(position, entity): (usize, Option<E>)| f(position, entity)),
        )
    }

    /// Visits the entities for `ids` while `f` returns `Ok(true)`.
    pub fn try_visit_ids<I, Err, F>(&self, ids: I, mut f: F) -> Result<u64, Err>
    where
        I: IntoIterator<Item = Id<E>>,
        F: FnMut(usize, Option<E>) -> Result<bool, Err>,
        Err: From<StoreError>,
    {
        self.scan_ids(
            ids,
            FallibleShortCircuit(|(position, entity): (usize, Option<E>)| f(position, entity)),
        )
    }

    /// Visits the entities for `ids` within an existing transaction while
    /// `f` returns `Ok(true)`.
    pub fn try_visit_ids_in_txn<I, Err, F>(
        &self,
        txn: &Transaction<'_>,
        ids: I,
        mut f: F,
    ) -> Result<u64, Err>
    where
        I: IntoIterator<Item = Id<E>>,
        F: FnMut(usize, Option<E>) -> Result<bool, Err>,
        Err: From<StoreError>,
    {
        self.scan_ids_in_txn(
            txn,
            ids,
            FallibleShortCircuit(|(position, entity): (usize, Option<E>)| f(position, entity)),
        )
    }

    /// Runs `visitor` over `(position, entity)` pairs for `ids`, in a read
    /// transaction.
    ///
    /// Returns the number of pairs passed to the visitor.
    pub fn scan_ids<I, V>(&self, ids: I, visitor: V) -> Result<u64, V::Error>
    where
        I: IntoIterator<Item = Id<E>>,
        V: Visitor<(usize, Option<E>)>,
        V::Error: From<StoreError>,
    {
        self.store
            .run_top_level(TxMode::Read, |txn| self.scan_ids_in_txn(txn, ids, visitor))
    }

    /// Runs `visitor` over `(position, entity)` pairs for `ids` within an
    /// existing transaction.
    pub fn scan_ids_in_txn<I, V>(
        &self,
        txn: &Transaction<'_>,
        ids: I,
        mut visitor: V,
    ) -> Result<u64, V::Error>
    where
        I: IntoIterator<Item = Id<E>>,
        V: Visitor<(usize, Option<E>)>,
        V::Error: From<StoreError>,
    {
        let handle = self.read_handle(txn)?;
        let mut visited = 0;
        for (position, id) in ids.into_iter().enumerate() {
            let entity = self.load(txn.engine(), handle, id)?;
            visited += 1;
            if visitor.visit((position, entity))?.is_break() {
                break;
            }
        }
        Ok(visited)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn read<T>(&self, f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>) -> StoreResult<T> {
        self.store.run_top_level(TxMode::Read, f)
    }

    fn write<T>(&self, f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>) -> StoreResult<T> {
        self.store.run_top_level(TxMode::Write, f)
    }

    fn read_handle<'t>(&self, txn: &'t Transaction<'_>) -> StoreResult<&'t TxHandle> {
        txn.ensure_store(&self.store)?;
        txn.read_handle()
    }

    fn write_handle<'t>(&self, txn: &'t Transaction<'_>) -> StoreResult<&'t TxHandle> {
        txn.ensure_store(&self.store)?;
        txn.write_handle()
    }

    fn store_entity(
        &self,
        engine: &dyn EngineStorage,
        handle: &TxHandle,
        entity: &mut E,
    ) -> StoreResult<Id<E>> {
        if !entity.identity().is_assigned() {
            let id = engine.next_id(handle, self.type_id)?;
            entity.set_identity(Id::new(id));
        }
        let id = entity.identity();
        let bytes = entity.encode()?;
        engine.put_record(handle, self.type_id, id.value(), bytes)?;
        trace!(entity = E::ENTITY_NAME, %id, "put");
        Ok(id)
    }

    fn load(
        &self,
        engine: &dyn EngineStorage,
        handle: &TxHandle,
        id: Id<E>,
    ) -> StoreResult<Option<E>> {
        if !id.is_assigned() {
            return Ok(None);
        }
        match engine.get_record(handle, self.type_id, id.value())? {
            Some(bytes) => Ok(Some(E::decode(id, &bytes)?)),
            None => Ok(None),
        }
    }

    fn exists(
        &self,
        engine: &dyn EngineStorage,
        handle: &TxHandle,
        id: Id<E>,
    ) -> StoreResult<bool> {
        if !id.is_assigned() {
            return Ok(false);
        }
        Ok(engine.get_record(handle, self.type_id, id.value())?.is_some())
    }

    fn delete(
        &self,
        engine: &dyn EngineStorage,
        handle: &TxHandle,
        id: Id<E>,
    ) -> StoreResult<bool> {
        if !id.is_assigned() {
            return Ok(false);
        }
        let removed = engine.delete_record(handle, self.type_id, id.value())?;
        trace!(entity = E::ENTITY_NAME, %id, removed, "remove");
        Ok(removed)
    }
}

impl<E: EntitySchema> Clone for EntityBox<E> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.store), self.type_id)
    }
}

impl<E: EntitySchema> fmt::Display for EntityBox<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<EntityBox<{}>>", short_type_name::<E>())
    }
}

impl<E: EntitySchema> fmt::Debug for EntityBox<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityBox")
            .field("entity", &short_type_name::<E>())
            .field("name", &E::ENTITY_NAME)
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}
