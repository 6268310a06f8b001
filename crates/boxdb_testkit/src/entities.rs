//! Sample entity types for tests and benchmarks.
//!
//! Every entity stores its record as CBOR through `boxdb_codec`; the id is
//! kept out of the record and restored from the storage key on decode.

use boxdb_codec::{from_cbor, to_cbor, CodecResult};
use boxdb_core::{EntitySchema, Id};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Implements [`EntitySchema`] for a serde struct with an `id` field that is
/// skipped during serialization.
macro_rules! cbor_entity {
    ($ty:ident, $name:literal) => {
        impl EntitySchema for $ty {
            const ENTITY_NAME: &'static str = $name;

            fn identity(&self) -> Id<Self> {
                self.id
            }

            fn set_identity(&mut self, id: Id<Self>) {
                self.id = id;
            }

            fn encode(&self) -> CodecResult<Vec<u8>> {
                to_cbor(self)
            }

            fn decode(id: Id<Self>, bytes: &[u8]) -> CodecResult<Self> {
                let mut entity: Self = from_cbor(bytes)?;
                entity.id = id;
                Ok(entity)
            }
        }
    };
}

/// A person with a name and an age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestPerson {
    /// Identity.
    #[serde(skip)]
    pub id: Id<TestPerson>,
    /// Name; may contain any Unicode text.
    pub name: String,
    /// Age in years.
    pub age: u32,
}

impl TestPerson {
    /// Creates an unsaved person.
    #[must_use]
    pub fn new(name: impl Into<String>, age: u32) -> Self {
        Self {
            id: Id::UNASSIGNED,
            name: name.into(),
            age,
        }
    }

    /// A person whose contents do not matter to the test.
    #[must_use]
    pub fn irrelevant() -> Self {
        Self::new("Irrelevant", 99)
    }

    /// Creates `count` unsaved people named `"{prefix}{i}"` with age `i`.
    #[must_use]
    pub fn batch(prefix: &str, count: u32) -> Vec<Self> {
        (0..count)
            .map(|i| Self::new(format!("{prefix}{i}"), i))
            .collect()
    }
}

cbor_entity!(TestPerson, "TestPerson");

/// An entity with one field of each commonly stored kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AllTypesEntity {
    /// Identity.
    #[serde(skip)]
    pub id: Id<AllTypesEntity>,
    /// Boolean field.
    pub boolean: bool,
    /// Signed 32-bit field.
    pub integer: i32,
    /// Unsigned 64-bit field.
    pub u_integer: u64,
    /// Double-precision field.
    pub a_double: f64,
    /// Optional timestamp.
    pub date: Option<DateTime<Utc>>,
    /// Optional text.
    pub string: Option<String>,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

impl AllTypesEntity {
    /// Creates an entity with only the timestamp set.
    #[must_use]
    pub fn with_date(date: DateTime<Utc>) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }
}

cbor_entity!(AllTypesEntity, "AllTypesEntity");

/// A value-style entity, stored through the copy-returning put variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructEntity {
    /// Identity.
    #[serde(skip)]
    pub id: Id<StructEntity>,
    /// Message text.
    pub message: String,
    /// Timestamp, possibly before the Unix epoch.
    pub date: DateTime<Utc>,
}

impl StructEntity {
    /// Creates an unsaved entity.
    #[must_use]
    pub fn new(message: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Id::UNASSIGNED,
            message: message.into(),
            date,
        }
    }
}

cbor_entity!(StructEntity, "StructEntity");

/// Returns the UTC instant `secs` seconds from the Unix epoch.
///
/// Out-of-range values clamp to the epoch.
#[must_use]
pub fn timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}
