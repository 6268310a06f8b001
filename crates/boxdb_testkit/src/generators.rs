//! Property-based test generators using proptest.
//!
//! Provides strategies for generating entities, ids and operation
//! sequences for box tests.

use crate::entities::{timestamp, AllTypesEntity, StructEntity, TestPerson};
use boxdb_core::Id;
use chrono::{DateTime, Utc};
use proptest::prelude::*;

/// Strategy for generating assigned ids.
pub fn assigned_id_strategy<E: 'static>() -> impl Strategy<Value = Id<E>> {
    (1..=u64::MAX).prop_map(Id::new)
}

/// Strategy for generating names: arbitrary Unicode, including empty.
pub fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => any::<String>(),
        1 => Just(String::new()),
        1 => Just("Søren🙈".to_string()),
        1 => Just("κόσμε".to_string()),
    ]
}

/// Strategy for generating timestamps on both sides of the Unix epoch.
pub fn timestamp_strategy() -> impl Strategy<Value = DateTime<Utc>> {
    prop_oneof![
        Just(timestamp(0)),
        Just(timestamp(-1)),
        (-62_135_596_800i64..253_402_300_799i64).prop_map(timestamp),
    ]
}

/// Strategy for generating unsaved people.
pub fn person_strategy() -> impl Strategy<Value = TestPerson> {
    (name_strategy(), any::<u32>()).prop_map(|(name, age)| TestPerson::new(name, age))
}

/// Strategy for generating unsaved entities with boundary-heavy numerics.
pub fn all_types_strategy() -> impl Strategy<Value = AllTypesEntity> {
    let integer = prop_oneof![Just(i32::MIN), Just(i32::MAX), Just(0), any::<i32>()];
    let u_integer = prop_oneof![Just(u64::MAX), Just(0), any::<u64>()];
    let a_double = prop_oneof![
        Just(f64::MAX),
        Just(f64::MIN_POSITIVE),
        Just(-0.0),
        proptest::num::f64::NORMAL
    ];
    (
        any::<bool>(),
        integer,
        u_integer,
        a_double,
        proptest::option::of(timestamp_strategy()),
        proptest::option::of(name_strategy()),
        prop::collection::vec(any::<u8>(), 0..64),
    )
        .prop_map(
            |(boolean, integer, u_integer, a_double, date, string, bytes)| AllTypesEntity {
                id: Id::UNASSIGNED,
                boolean,
                integer,
                u_integer,
                a_double,
                date,
                string,
                bytes,
            },
        )
}

/// Strategy for generating unsaved value-style entities.
pub fn struct_entity_strategy() -> impl Strategy<Value = StructEntity> {
    (name_strategy(), timestamp_strategy())
        .prop_map(|(message, date)| StructEntity::new(message, date))
}

/// A box operation for model-based tests.
///
/// Indices refer to the ids put so far, modulo their count.
#[derive(Debug, Clone)]
pub enum BoxOperation {
    /// Put a new person.
    Put {
        /// The person to put.
        person: TestPerson,
    },
    /// Overwrite the age of a stored person.
    Update {
        /// Index into the ids put so far.
        index: usize,
        /// New age.
        age: u32,
    },
    /// Remove a person.
    Remove {
        /// Index into the ids put so far.
        index: usize,
    },
    /// Remove every person.
    RemoveAll,
}

/// Strategy for generating box operations.
pub fn box_operation_strategy() -> impl Strategy<Value = BoxOperation> {
    prop_oneof![
        4 => person_strategy().prop_map(|person| BoxOperation::Put { person }),
        2 => (any::<usize>(), any::<u32>())
            .prop_map(|(index, age)| BoxOperation::Update { index, age }),
        2 => any::<usize>().prop_map(|index| BoxOperation::Remove { index }),
        1 => Just(BoxOperation::RemoveAll),
    ]
}

/// Strategy for generating a sequence of operations.
pub fn operation_sequence_strategy(
    min_ops: usize,
    max_ops: usize,
) -> impl Strategy<Value = Vec<BoxOperation>> {
    prop::collection::vec(box_operation_strategy(), min_ops..max_ops)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
