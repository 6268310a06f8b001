//! # BoxDB Codec
//!
//! CBOR record encoding for BoxDB entity schemas.
//!
//! Engines store opaque bytes; an entity schema decides what those bytes
//! are. This crate gives schemas a ready-made answer: any `serde` type can be
//! written as a single CBOR item and read back, with trailing garbage
//! rejected.
//!
//! ## Usage
//!
//! ```
//! use boxdb_codec::{from_cbor, to_cbor};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Note {
//!     title: String,
//!     pinned: bool,
//! }
//!
//! let note = Note { title: "groceries".into(), pinned: true };
//! let bytes = to_cbor(&note).unwrap();
//! let decoded: Note = from_cbor(&bytes).unwrap();
//! assert_eq!(note, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod error;

pub use cbor::{from_cbor, to_cbor};
pub use error::{CodecError, CodecResult};
