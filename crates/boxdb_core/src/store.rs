//! Store facade and transaction entry points.

use crate::config::Config;
use crate::entity::EntitySchema;
use crate::entity_box::EntityBox;
use crate::error::{StoreError, StoreResult};
use crate::model::Model;
use crate::transaction::{Transaction, TxScope};
use boxdb_engine::{EngineStorage, EntityTypeId, InMemoryEngine, TxMode};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, warn};

/// State shared between a [`Store`] and the boxes it hands out.
pub(crate) struct StoreShared {
    config: Config,
    engine: Arc<dyn EngineStorage>,
    model: RwLock<Model>,
    is_open: RwLock<bool>,
}

impl StoreShared {
    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn is_open(&self) -> bool {
        *self.is_open.read()
    }

    pub(crate) fn ensure_open(&self) -> StoreResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(StoreError::StoreClosed)
        }
    }

    /// Resolves the type id of `E`, registering it on first use.
    fn register<E: EntitySchema>(&self) -> StoreResult<EntityTypeId> {
        if let Some(id) = self.model.read().lookup::<E>(E::ENTITY_NAME)? {
            return Ok(id);
        }
        let id = self.model.write().get_or_register::<E>(E::ENTITY_NAME)?;
        debug!(entity = E::ENTITY_NAME, type_id = %id, "registered entity type");
        Ok(id)
    }

    /// Runs `f` in `mode`, joining `parent` if one is given.
    pub(crate) fn scope<T, Error, F>(
        &self,
        mode: TxMode,
        parent: Option<&Transaction<'_>>,
        f: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
        Error: From<StoreError>,
    {
        match parent {
            Some(txn) => {
                txn.ensure_store(self)?;
                txn.nested(mode, f)
            }
            None => self.run_top_level(mode, f),
        }
    }

    /// Begins an engine transaction, runs `f` at depth 0 and commits if it
    /// succeeds and no nested scope failed; aborts otherwise.
    pub(crate) fn run_top_level<T, Error, F>(&self, mode: TxMode, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
        Error: From<StoreError>,
    {
        self.ensure_open()?;
        if mode.is_write() && self.config.read_only {
            return Err(StoreError::mode_conflict("store is read-only").into());
        }

        let handle = self
            .engine
            .begin_transaction(mode)
            .map_err(StoreError::from)?;
        let scope = TxScope::new(self.engine.as_ref(), handle);
        let txid = scope.txid();
        debug!(%txid, %mode, "transaction started");

        let result = f(&Transaction::new(self, &scope, 0, mode));

        match result {
            Ok(value) => {
                if let Some(reason) = scope.rollback_reason() {
                    warn!(%txid, %reason, "discarding transaction after nested failure");
                    Self::abort_quietly(scope);
                    return Err(StoreError::transaction_aborted(reason).into());
                }
                scope.commit().map_err(StoreError::from)?;
                debug!(%txid, "transaction committed");
                Ok(value)
            }
            Err(e) => {
                Self::abort_quietly(scope);
                debug!(%txid, "transaction aborted");
                Err(e)
            }
        }
    }

    /// Aborts a scope whose outcome is already decided.
    fn abort_quietly(scope: TxScope<'_>) {
        let txid = scope.txid();
        if let Err(e) = scope.abort() {
            warn!(%txid, error = %e, "abort failed");
        }
    }

    fn close(&self) {
        let mut is_open = self.is_open.write();
        if !*is_open {
            return;
        }
        self.engine.close();
        *is_open = false;
        debug!("store closed");
    }
}

/// The main store handle.
///
/// `Store` is the entry point of BoxDB. It provides:
/// - Typed boxes via [`Store::box_for`]
/// - Read and write transactions with nesting
/// - The registry of entity types in use
///
/// # Example
///
/// ```rust
/// use boxdb_core::{Store, StoreError};
///
/// let store = Store::open_in_memory()?;
///
/// let depth = store.run_in_transaction(|txn| {
///     txn.run_in_read_only_transaction(|inner| Ok::<_, StoreError>(inner.depth()))
/// })?;
/// assert_eq!(depth, 1);
///
/// store.close();
/// assert!(!store.is_open());
/// # Ok::<(), StoreError>(())
/// ```
///
/// Dropping the store closes it; boxes obtained from it then fail with
/// [`StoreError::StoreClosed`].
pub struct Store {
    shared: Arc<StoreShared>,
}

impl Store {
    /// Opens a store over a fresh in-memory engine with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open_in_memory_with_config(Config::default())
    }

    /// Opens a store over a fresh in-memory engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn open_in_memory_with_config(config: Config) -> StoreResult<Self> {
        let engine = Arc::new(InMemoryEngine::with_max_readers(config.max_readers));
        Self::open_with_engine(config, engine)
    }

    /// Opens a store over an existing engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the engine is
    /// already closed.
    pub fn open_with_engine(config: Config, engine: Arc<dyn EngineStorage>) -> StoreResult<Self> {
        if config.max_readers == 0 {
            return Err(StoreError::validation("max_readers must be at least 1"));
        }
        if engine.is_closed() {
            return Err(StoreError::StoreClosed);
        }

        debug!(
            max_nesting_depth = config.max_nesting_depth,
            max_readers = config.max_readers,
            read_only = config.read_only,
            "store opened"
        );
        Ok(Self {
            shared: Arc::new(StoreShared {
                config,
                engine,
                model: RwLock::new(Model::new()),
                is_open: RwLock::new(true),
            }),
        })
    }

    /// Returns a box for entities of type `E`.
    ///
    /// The entity type is registered under [`EntitySchema::ENTITY_NAME`] on
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is closed or the entity name is already
    /// registered for a different type.
    pub fn box_for<E: EntitySchema>(&self) -> StoreResult<EntityBox<E>> {
        self.shared.ensure_open()?;
        let type_id = self.shared.register::<E>()?;
        Ok(EntityBox::new(Arc::clone(&self.shared), type_id))
    }

    /// Runs `f` in a write transaction.
    ///
    /// The transaction commits if `f` returns `Ok` and aborts if it returns
    /// `Err`, in which case the error is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error of `f`, [`StoreError::TransactionAborted`] if a
    /// nested scope failed while `f` still returned `Ok`, or a store error if
    /// the transaction cannot begin or commit.
    pub fn run_in_transaction<T, Error, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
        Error: From<StoreError>,
    {
        self.shared.run_top_level(TxMode::Write, f)
    }

    /// Runs `f` in a read transaction over a consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns the error of `f` or a store error if the transaction cannot
    /// begin.
    pub fn run_in_read_only_transaction<T, Error, F>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
        Error: From<StoreError>,
    {
        self.shared.run_top_level(TxMode::Read, f)
    }

    /// Runs `f` in `mode`, as a nested scope of `parent` if one is given and
    /// as a new top-level transaction otherwise.
    ///
    /// # Errors
    ///
    /// As [`Store::run_in_transaction`] and
    /// [`Transaction::run_in_transaction`]; additionally
    /// [`StoreError::InvalidOperation`] if `parent` belongs to another store.
    pub fn scope<T, Error, F>(
        &self,
        mode: TxMode,
        parent: Option<&Transaction<'_>>,
        f: F,
    ) -> Result<T, Error>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, Error>,
        Error: From<StoreError>,
    {
        self.shared.scope(mode, parent, f)
    }

    /// Closes the store and its engine. Idempotent.
    pub fn close(&self) {
        self.shared.close();
    }

    /// Checks if the store is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.shared.is_open()
    }

    /// Returns the store configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    /// Returns the registered entity names and their type ids, ordered by id.
    #[must_use]
    pub fn entity_types(&self) -> Vec<(String, EntityTypeId)> {
        self.shared.model.read().entity_types()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("is_open", &self.is_open())
            .field("entity_types", &self.shared.model.read().entity_types().len())
            .field("config", &self.shared.config)
            .finish_non_exhaustive()
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.close();
    }
}
