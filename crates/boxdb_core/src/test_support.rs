//! Entities shared by the unit tests of this crate.

use crate::{EntitySchema, Id};
use boxdb_codec::{from_cbor, to_cbor, CodecError, CodecResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TestPerson {
    #[serde(skip)]
    pub id: Id<TestPerson>,
    pub name: String,
    pub age: u32,
}

impl TestPerson {
    pub(crate) fn new(name: &str, age: u32) -> Self {
        Self::with_id(0, name, age)
    }

    pub(crate) fn with_id(id: u64, name: &str, age: u32) -> Self {
        Self {
            id: Id::new(id),
            name: name.to_string(),
            age,
        }
    }
}

impl EntitySchema for TestPerson {
    const ENTITY_NAME: &'static str = "TestPerson";

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
        let mut person: Self = from_cbor(bytes)?;
        person.id = id;
        Ok(person)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Note {
    pub id: Id<Note>,
    pub text: String,
}

impl EntitySchema for Note {
    const ENTITY_NAME: &'static str = "Note";

    fn identity(&self) -> Id<Self> {
        self.id
    }

    fn set_identity(&mut self, id: Id<Self>) {
        self.id = id;
    }

    fn encode(&self) -> CodecResult<Vec<u8>> {
        to_cbor(self)
    }

    fn decode(_id: Id<Self>, bytes: &[u8]) -> CodecResult<Self> {
        from_cbor(bytes)
    }
}

/// An entity that refuses to encode while `faulty` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Gauge {
    #[serde(skip)]
    pub id: Id<Gauge>,
    pub level: u32,
    pub faulty: bool,
}

impl Gauge {
    pub(crate) fn new(level: u32) -> Self {
        Self {
            id: Id::default(),
            level,
            faulty: false,
        }
    }

    pub(crate) fn faulty(level: u32) -> Self {
        Self {
            faulty: true,
            ..Self::new(level)
        }
    }
}

impl EntitySchema for Gauge {
    const ENTITY_NAME: &'static str = "Gauge";

    fn identity(&self) -> Id<Self> {
        self.id
    }

    fn set_identity(&mut self, id: Id<Self>) {
        self.id = id;
    }

    fn encode(&self) -> CodecResult<Vec<u8>> {
        if self.faulty {
            return Err(CodecError::encoding_failed(format!("gauge at level {}", self.level)));
        }
        to_cbor(self)
    }

    fn decode(id: Id<Self>, bytes: &[u8]) -> CodecResult<Self> {
        let mut gauge: Self = from_cbor(bytes)?;
        gauge.id = id;
        Ok(gauge)
    }
}
