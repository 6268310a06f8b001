//! Cross-crate integration test helpers.
//!
//! Provides a harness that mirrors box contents in memory so that tests
//! can check the store against an expected model after each step.

use crate::entities::TestPerson;
use crate::fixtures::TestStore;
use crate::generators::BoxOperation;
use boxdb_core::{EntityBox, Id};
use std::collections::BTreeMap;

/// A test harness for integration testing.
pub struct IntegrationHarness {
    /// The store instance.
    pub store: TestStore,
    /// The box under test.
    pub people: EntityBox<TestPerson>,
    /// Expected contents, by id.
    expected: BTreeMap<Id<TestPerson>, TestPerson>,
    /// Every id handed out so far, in order.
    issued: Vec<Id<TestPerson>>,
}

impl IntegrationHarness {
    /// Creates a new integration harness with an in-memory store.
    pub fn new() -> Self {
        let store = TestStore::memory();
        let people = store.box_for::<TestPerson>();
        Self {
            store,
            people,
            expected: BTreeMap::new(),
            issued: Vec::new(),
        }
    }

    /// Puts a person and tracks it for later verification.
    pub fn put(&mut self, mut person: TestPerson) -> Id<TestPerson> {
        let id = self.people.put(&mut person).expect("Failed to put person");
        assert_eq!(person.id, id, "put must write the id onto the entity");
        if !self.issued.contains(&id) {
            self.issued.push(id);
        }
        self.expected.insert(id, person);
        id
    }

    /// Removes a person and updates tracking.
    pub fn remove(&mut self, id: Id<TestPerson>) {
        let removed = self.people.remove(id).expect("Failed to remove person");
        assert_eq!(removed, self.expected.remove(&id).is_some());
    }

    /// Applies one generated operation.
    pub fn apply(&mut self, op: &BoxOperation) {
        match op {
            BoxOperation::Put { person } => {
                self.put(person.clone());
            }
            BoxOperation::Update { index, age } => {
                if let Some(id) = self.pick(*index) {
                    if let Some(mut person) = self.expected.get(&id).cloned() {
                        person.age = *age;
                        self.put(person);
                    }
                }
            }
            BoxOperation::Remove { index } => {
                if let Some(id) = self.pick(*index) {
                    self.remove(id);
                }
            }
            BoxOperation::RemoveAll => {
                let removed = self.people.remove_all().expect("Failed to remove all");
                assert_eq!(removed, self.expected.len() as u64);
                self.expected.clear();
            }
        }
    }

    fn pick(&self, index: usize) -> Option<Id<TestPerson>> {
        if self.issued.is_empty() {
            None
        } else {
            Some(self.issued[index % self.issued.len()])
        }
    }

    /// Verifies the box against the tracked model.
    pub fn verify_all(&self) {
        let all = self.people.all().expect("Failed to read all");
        let expected: Vec<TestPerson> = self.expected.values().cloned().collect();
        assert_eq!(all, expected, "all() must match the model in id order");

        assert_eq!(
            self.people.count().expect("Failed to count"),
            self.expected.len() as u64
        );

        for id in &self.issued {
            let actual = self.people.get(*id).expect("Failed to get person");
            assert_eq!(actual.as_ref(), self.expected.get(id), "mismatch for {id:?}");
        }
    }

    /// Returns the count of tracked entities.
    pub fn tracked_count(&self) -> usize {
        self.expected.len()
    }

    /// Returns every id handed out so far, including removed ones.
    pub fn issued_ids(&self) -> &[Id<TestPerson>] {
        &self.issued
    }
}

impl Default for IntegrationHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integration_harness() {
        let mut harness = IntegrationHarness::new();
        let a = harness.put(TestPerson::new("Foo", 55));
        let b = harness.put(TestPerson::new("Bar", 66));
        assert_eq!(harness.tracked_count(), 2);

        harness.remove(a);
        harness.verify_all();
        assert_eq!(harness.issued_ids(), &[a, b]);
    }

    #[test]
    fn test_apply_operations() {
        let mut harness = IntegrationHarness::new();
        harness.apply(&BoxOperation::Put {
            person: TestPerson::new("Ana", 30),
        });
        harness.apply(&BoxOperation::Update { index: 0, age: 31 });
        harness.verify_all();

        harness.apply(&BoxOperation::RemoveAll);
        harness.apply(&BoxOperation::Remove { index: 7 });
        harness.verify_all();
        assert_eq!(harness.tracked_count(), 0);
    }
}
