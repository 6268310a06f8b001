//! Typed entity identifier.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Identifier of a stored entity of type `E`.
///
/// Entity IDs are 64-bit values that are:
/// - Assigned by the engine on first `put` (`0` means "unassigned")
/// - Distinct within the box of their entity type
/// - Stable for the lifetime of the record
///
/// The type parameter keeps ids of different entity types apart; `Id<E>` has
/// the same representation as a `u64` and serializes as one.
pub struct Id<E> {
    value: u64,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Id<E> {
    /// The unassigned id.
    pub const UNASSIGNED: Self = Self::new(0);

    /// Creates an id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self {
            value,
            _entity: PhantomData,
        }
    }

    /// Returns the raw value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.value
    }

    /// Returns true if the id has been assigned (is non-zero).
    #[inline]
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.value != 0
    }
}

impl<E> Clone for Id<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Id<E> {}

impl<E> PartialEq for Id<E> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<E> Eq for Id<E> {}

impl<E> PartialOrd for Id<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Id<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<E> Hash for Id<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<E> Default for Id<E> {
    fn default() -> Self {
        Self::UNASSIGNED
    }
}

impl<E> fmt::Debug for Id<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id<{}>({})", short_type_name::<E>(), self.value)
    }
}

impl<E> fmt::Display for Id<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<E> From<u64> for Id<E> {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl<E> From<Id<E>> for u64 {
    fn from(id: Id<E>) -> Self {
        id.value
    }
}

impl<E> Serialize for Id<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.value)
    }
}

impl<'de, E> Deserialize<'de> for Id<E> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::new)
    }
}

/// Last path segment of a type name, e.g. `TestPerson` for `app::model::TestPerson`.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Person;
    struct Note;

    #[test]
    fn unassigned_is_zero() {
        let id = Id::<Person>::UNASSIGNED;
        assert_eq!(id.value(), 0);
        assert!(!id.is_assigned());
        assert_eq!(id, Id::default());
    }

    #[test]
    fn assigned_ids_compare_by_value() {
        let a = Id::<Person>::new(1);
        let b = Id::<Person>::new(2);
        assert!(a.is_assigned());
        assert!(a < b);
        assert_ne!(a, b);
        assert_eq!(a, Id::from(1));
    }

    #[test]
    fn ids_of_different_types_share_values_not_types() {
        let person = Id::<Person>::new(7);
        let note = Id::<Note>::new(7);
        assert_eq!(person.value(), note.value());
        assert_eq!(u64::from(person), 7);
    }

    #[test]
    fn hashable() {
        let set: HashSet<Id<Person>> = [1, 2, 2, 3].into_iter().map(Id::new).collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn display_and_debug() {
        let id = Id::<Person>::new(42);
        assert_eq!(format!("{id}"), "42");
        assert_eq!(format!("{id:?}"), "Id<Person>(42)");
    }

    #[test]
    fn serializes_as_plain_integer() {
        let id = Id::<Person>::new(u64::MAX);
        let bytes = boxdb_codec::to_cbor(&id).unwrap();
        assert_eq!(bytes, boxdb_codec::to_cbor(&u64::MAX).unwrap());

        let decoded: Id<Person> = boxdb_codec::from_cbor(&bytes).unwrap();
        assert_eq!(decoded, id);
    }

    #[test]
    fn short_type_name_strips_path_and_generics() {
        assert_eq!(short_type_name::<Person>(), "Person");
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec");
    }

    proptest::proptest! {
        #[test]
        fn ordering_follows_values(a in proptest::num::u64::ANY, b in proptest::num::u64::ANY) {
            let (x, y) = (Id::<Person>::new(a), Id::<Person>::new(b));
            proptest::prop_assert_eq!(x.cmp(&y), a.cmp(&b));
            proptest::prop_assert_eq!(x.is_assigned(), a != 0);
        }
    }
}
