//! Test fixtures and store helpers.
//!
//! Provides convenience functions for setting up test stores
//! and common test scenarios.

use boxdb_core::{Config, EntityBox, EntitySchema, Store};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a `tracing` subscriber for tests, once per process.
///
/// The filter is read from `RUST_LOG` and defaults to `warn`. Output goes
/// through the test writer, so it is captured per test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// A test store over a fresh in-memory engine.
pub struct TestStore {
    /// The store instance.
    pub store: Store,
}

impl TestStore {
    /// Creates a store with default configuration.
    pub fn memory() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a store with the given configuration.
    pub fn with_config(config: Config) -> Self {
        init_tracing();
        Self {
            store: Store::open_in_memory_with_config(config)
                .expect("Failed to open in-memory store"),
        }
    }

    /// Returns the box for `E`.
    pub fn box_for<E: EntitySchema>(&self) -> EntityBox<E> {
        self.store.box_for::<E>().expect("Failed to open box")
    }
}

impl std::ops::Deref for TestStore {
    type Target = Store;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}

/// Runs a test with a temporary in-memory store.
///
/// # Example
///
/// ```rust
/// use boxdb_testkit::{with_temp_store, TestPerson};
///
/// with_temp_store(|store| {
///     let people = store.box_for::<TestPerson>().unwrap();
///     assert!(people.is_empty().unwrap());
/// });
/// ```
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&Store) -> R,
{
    let test_store = TestStore::memory();
    f(&test_store.store)
}

/// Runs a test with a temporary in-memory store and the box for `E`.
pub fn with_box<E, F, R>(f: F) -> R
where
    E: EntitySchema,
    F: FnOnce(&Store, &EntityBox<E>) -> R,
{
    let test_store = TestStore::memory();
    let entity_box = test_store.box_for::<E>();
    f(&test_store.store, &entity_box)
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;
    use crate::entities::TestPerson;
    use boxdb_core::Id;

    /// Creates a store holding `count` people named `"{i}"` with age `i`.
    ///
    /// Returns the ids in insertion order.
    pub fn populated_store(count: u32) -> (TestStore, EntityBox<TestPerson>, Vec<Id<TestPerson>>) {
        let test_store = TestStore::memory();
        let people = test_store.box_for::<TestPerson>();
        let mut batch = TestPerson::batch("", count);
        let ids = people.put_many(&mut batch).expect("Failed to put people");
        (test_store, people, ids)
    }
}
