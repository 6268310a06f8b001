//! Entity schema trait for typed boxes.

use crate::entity::Id;
use boxdb_codec::CodecResult;

/// Trait for types that can be stored in an [`crate::EntityBox`].
///
/// Implementors provide:
/// - `ENTITY_NAME`: the stable name the type is registered under
/// - `identity()` / `set_identity()`: access to the single id field
/// - `encode()` / `decode()`: conversion to and from the stored record
///
/// The record format is up to the implementor; `boxdb_codec` provides CBOR
/// helpers for serde types.
///
/// # Example
///
/// ```rust
/// use boxdb_codec::{from_cbor, to_cbor, CodecResult};
/// use boxdb_core::{EntitySchema, Id};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// struct User {
///     #[serde(skip)]
///     id: Id<User>,
///     name: String,
///     age: u32,
/// }
///
/// impl EntitySchema for User {
///     const ENTITY_NAME: &'static str = "User";
///
///     fn identity(&self) -> Id<Self> {
///         self.id
///     }
///
///     fn set_identity(&mut self, id: Id<Self>) {
///         self.id = id;
///     }
///
///     fn encode(&self) -> CodecResult<Vec<u8>> {
///         to_cbor(self)
///     }
///
///     fn decode(id: Id<Self>, bytes: &[u8]) -> CodecResult<Self> {
///         let mut user: User = from_cbor(bytes)?;
///         user.id = id;
///         Ok(user)
///     }
/// }
/// ```
pub trait EntitySchema: Sized + 'static {
    /// Name the entity type is registered under in a store.
    ///
    /// Must be unique among the entity types used with one store.
    const ENTITY_NAME: &'static str;

    /// Returns the entity's id ([`Id::UNASSIGNED`] before the first put).
    fn identity(&self) -> Id<Self>;

    /// Writes an assigned id onto the entity.
    fn set_identity(&mut self, id: Id<Self>);

    /// Encodes the entity to record bytes.
    fn encode(&self) -> CodecResult<Vec<u8>>;

    /// Decodes an entity from record bytes.
    ///
    /// `id` is the id the record is stored under; the returned entity must
    /// report it from `identity()`.
    fn decode(id: Id<Self>, bytes: &[u8]) -> CodecResult<Self>;
}

#[cfg(test)]
mod tests {
    use crate::test_support::TestPerson;
    use crate::{EntitySchema, Id};

    #[test]
    fn encode_decode_roundtrip() {
        let person = TestPerson::with_id(5, "Søren🙈", 42);

        let bytes = person.encode().unwrap();
        let decoded = TestPerson::decode(person.identity(), &bytes).unwrap();

        assert_eq!(person, decoded);
    }

    #[test]
    fn decode_takes_storage_id() {
        let person = TestPerson::new("κόσμε", 40);
        let bytes = person.encode().unwrap();

        let decoded = TestPerson::decode(Id::new(9), &bytes).unwrap();
        assert_eq!(decoded.identity(), Id::new(9));
        assert_eq!(decoded.name, "κόσμε");
    }

    #[test]
    fn set_identity_updates_field() {
        let mut person = TestPerson::new("Ryu", 20);
        assert!(!person.identity().is_assigned());

        person.set_identity(Id::new(3));
        assert_eq!(person.identity().value(), 3);
    }
}
