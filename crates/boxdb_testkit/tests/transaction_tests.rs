//! Transaction scoping, nesting and rollback.

use boxdb_core::{Config, ErrorKind, StoreError, TransactionState, TxMode};
use boxdb_testkit::prelude::*;

/// Error type of the application code running inside transactions.
#[derive(Debug)]
enum AppError {
    Boom,
    Store(StoreError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        AppError::Store(e)
    }
}

#[test]
fn committed_writes_are_visible() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    let id = store
        .run_in_transaction(|txn| people.put_in_txn(txn, &mut TestPerson::new("Ana", 30)))
        .unwrap();

    assert_eq!(people.get(id).unwrap().unwrap().name, "Ana");
}

#[test]
fn failing_body_rolls_back() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    let result: Result<(), AppError> = store.run_in_transaction(|txn| {
        people.put_in_txn(txn, &mut TestPerson::irrelevant())?;
        people.put_in_txn(txn, &mut TestPerson::irrelevant())?;
        Err(AppError::Boom)
    });

    assert!(matches!(result, Err(AppError::Boom)));
    assert_eq!(people.count().unwrap(), 0);
}

#[test]
fn reads_inside_a_write_see_own_writes() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    store
        .run_in_transaction(|txn| {
            let id = people.put_in_txn(txn, &mut TestPerson::new("Ana", 30))?;
            assert!(people.contains_in_txn(txn, id)?);
            assert_eq!(people.count_in_txn(txn)?, 1);

            // Other transactions still see the committed state.
            let outside = std::thread::scope(|s| s.spawn(|| people.count()).join());
            assert_eq!(outside.unwrap()?, 0);
            Ok::<_, StoreError>(())
        })
        .unwrap();

    assert_eq!(people.count().unwrap(), 1);
}

#[test]
fn nested_scopes_share_the_transaction() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    store
        .run_in_transaction(|outer| {
            let outer_id = outer.id();
            outer.run_in_transaction(|inner| {
                assert_eq!(inner.id(), outer_id);
                assert_eq!(inner.depth(), 1);
                people.put_in_txn(inner, &mut TestPerson::new("inner", 1))
            })?;
            people.put_in_txn(outer, &mut TestPerson::new("outer", 2))
        })
        .unwrap();

    assert_eq!(people.count().unwrap(), 2);
}

#[test]
fn nested_failure_rolls_back_everything() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    let result: Result<(), AppError> = store.run_in_transaction(|outer| {
        people.put_in_txn(outer, &mut TestPerson::new("outer", 1))?;
        outer.run_in_transaction(|level1| {
            level1.run_in_transaction(|level2| {
                assert_eq!(level2.depth(), 2);
                people.put_in_txn(level2, &mut TestPerson::new("deep", 2))?;
                Err::<(), _>(AppError::Boom)
            })
        })
    });

    assert!(matches!(result, Err(AppError::Boom)));
    assert_eq!(people.count().unwrap(), 0);
}

#[test]
fn deep_failure_rolls_back_every_box() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();
    let entities = store.box_for::<AllTypesEntity>();
    people.put(&mut TestPerson::new("before", 1)).unwrap();
    entities.put(&mut AllTypesEntity::default()).unwrap();

    let result = store.run_in_transaction(|outer| {
        people.put_in_txn(outer, &mut TestPerson::new("outer", 2))?;
        entities.put_in_txn(outer, &mut AllTypesEntity::default())?;

        let deep: Result<(), AppError> = outer.run_in_transaction(|level1| {
            level1.run_in_transaction(|level2| {
                assert_eq!(level2.depth(), 2);
                people.put_in_txn(level2, &mut TestPerson::new("deep", 3))?;
                entities.put_in_txn(level2, &mut AllTypesEntity::default())?;
                Err(AppError::Boom)
            })
        });
        assert!(matches!(deep, Err(AppError::Boom)));

        entities.put_in_txn(outer, &mut AllTypesEntity::default())?;
        Ok::<_, StoreError>(())
    });

    assert_eq!(result.unwrap_err().kind(), ErrorKind::TransactionAborted);
    assert_eq!(people.count().unwrap(), 1);
    assert_eq!(entities.count().unwrap(), 1);
}

#[test]
fn swallowed_nested_failure_still_aborts() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    let result = store.run_in_transaction(|outer| {
        let inner: Result<(), AppError> = outer.run_in_transaction(|inner| {
            people.put_in_txn(inner, &mut TestPerson::new("lost", 1))?;
            Err(AppError::Boom)
        });
        assert!(inner.is_err());
        assert!(outer.is_rollback_only());
        assert_eq!(outer.state(), TransactionState::RollbackOnly);

        // Writes after the failure are accepted but never committed.
        people.put_in_txn(outer, &mut TestPerson::new("also lost", 2))?;
        Ok::<_, StoreError>(())
    });

    let err = result.unwrap_err();
    assert!(matches!(err, StoreError::TransactionAborted { .. }), "{err:?}");
    assert_eq!(err.kind(), ErrorKind::TransactionAborted);
    assert_eq!(people.count().unwrap(), 0);
}

#[test]
fn write_inside_read_is_mode_conflict() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    let err = store
        .run_in_read_only_transaction(|txn| {
            txn.run_in_transaction(|_| Ok::<_, StoreError>(()))
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModeConflict);

    let err = store
        .run_in_read_only_transaction(|txn| {
            people.put_in_txn(txn, &mut TestPerson::irrelevant())
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModeConflict);
    assert_eq!(people.count().unwrap(), 0);
}

#[test]
fn read_inside_write_is_allowed() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    let seen = store
        .run_in_transaction(|txn| {
            people.put_in_txn(txn, &mut TestPerson::irrelevant())?;
            txn.run_in_read_only_transaction(|read| {
                assert!(read.is_read_only());
                people.count_in_txn(read)
            })
        })
        .unwrap();

    assert_eq!(seen, 1);
}

#[test]
fn write_in_read_only_nested_scope_is_rejected() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    let result = store.run_in_transaction(|txn| {
        txn.run_in_read_only_transaction(|read| {
            people.put_in_txn(read, &mut TestPerson::irrelevant())
        })
    });

    assert_eq!(result.unwrap_err().kind(), ErrorKind::ModeConflict);
    assert_eq!(people.count().unwrap(), 0);
}

#[test]
fn nesting_limit_is_enforced() {
    let store = TestStore::with_config(Config::new().max_nesting_depth(2));

    let result = store.run_in_transaction(|t0| {
        t0.run_in_transaction(|t1| {
            t1.run_in_transaction(|t2| t2.run_in_transaction(|_| Ok::<_, StoreError>(())))
        })
    });

    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidOperation);
}

#[test]
fn scope_joins_parent_or_starts_new() {
    let store = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    store
        .scope(TxMode::Write, None, |txn| {
            assert_eq!(txn.depth(), 0);
            store.scope(TxMode::Write, Some(txn), |child| {
                assert_eq!(child.depth(), 1);
                assert_eq!(child.id(), txn.id());
                people.put_in_txn(child, &mut TestPerson::irrelevant())
            })
        })
        .unwrap();

    assert_eq!(people.count().unwrap(), 1);
}

#[test]
fn transaction_of_other_store_is_rejected() {
    let store = TestStore::memory();
    let other = TestStore::memory();
    let people = store.box_for::<TestPerson>();

    let err = other
        .run_in_transaction(|txn| people.put_in_txn(txn, &mut TestPerson::irrelevant()))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);

    let err = other
        .run_in_transaction(|txn| {
            store.scope(TxMode::Write, Some(txn), |_| Ok::<_, StoreError>(()))
        })
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidOperation);
}

#[test]
fn read_only_store_rejects_writes() {
    let store = TestStore::with_config(Config::new().read_only(true));
    let people = store.box_for::<TestPerson>();

    assert!(people.is_empty().unwrap());
    let err = people.put(&mut TestPerson::irrelevant()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ModeConflict);
}

#[test]
fn closed_store_rejects_transactions() {
    let store = TestStore::memory();
    store.close();
    store.close();

    let err = store
        .run_in_transaction(|_| Ok::<_, StoreError>(()))
        .unwrap_err();
    assert!(matches!(err, StoreError::StoreClosed));
    assert!(!store.is_open());
}

#[test]
fn application_error_passes_through_unchanged() {
    let store = TestStore::memory();

    let result: Result<u32, AppError> =
        store.run_in_read_only_transaction(|_| Err(AppError::Boom));

    assert!(matches!(result, Err(AppError::Boom)));
}

#[test]
fn store_errors_convert_into_application_errors() {
    let store = TestStore::memory();
    store.close();

    let result: Result<(), AppError> = store.run_in_transaction(|_| Ok(()));

    match result {
        Err(AppError::Store(e)) => assert!(matches!(e, StoreError::StoreClosed)),
        other => panic!("expected a store error, got {other:?}"),
    }
}
