//! Benchmark utilities.

use boxdb_codec::{from_cbor, to_cbor, CodecResult};
use boxdb_core::{EntityBox, EntitySchema, Id, Store};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An entity carrying an opaque payload of a chosen size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payload {
    /// Identity, not part of the record.
    #[serde(skip)]
    pub id: Id<Payload>,
    /// Payload bytes.
    pub data: Vec<u8>,
}

impl Payload {
    /// Creates an unsaved payload of `size` random bytes.
    #[must_use]
    pub fn random(size: usize) -> Self {
        Self {
            id: Id::UNASSIGNED,
            data: random_data(size),
        }
    }
}

impl EntitySchema for Payload {
    const ENTITY_NAME: &'static str = "Payload";

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
        let mut payload: Self = from_cbor(bytes)?;
        payload.id = id;
        Ok(payload)
    }
}

/// Generate random entity data of the specified size.
pub fn random_data(size: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen()).collect()
}

/// Generate unsaved payloads of the specified size.
pub fn generate_payloads(count: usize, payload_size: usize) -> Vec<Payload> {
    (0..count).map(|_| Payload::random(payload_size)).collect()
}

/// Opens an in-memory store holding `count` payloads of `payload_size` bytes.
///
/// # Panics
///
/// Panics if the store cannot be opened or populated.
pub fn populated_store(
    count: usize,
    payload_size: usize,
) -> (Store, EntityBox<Payload>, Vec<Id<Payload>>) {
    let store = Store::open_in_memory().expect("open store");
    let payloads = store.box_for::<Payload>().expect("open box");
    let mut batch = generate_payloads(count, payload_size);
    let ids = payloads.put_many(&mut batch).expect("populate");
    (store, payloads, ids)
}
