//! # BoxDB Testkit
//!
//! Test utilities for BoxDB.
//!
//! This crate provides:
//! - Test fixtures and store helpers
//! - Sample entity types with CBOR schemas
//! - Property-based test generators using proptest
//! - A model-checking integration harness
//! - Stress testing utilities
//!
//! ## Usage
//!
//! ```rust
//! use boxdb_testkit::prelude::*;
//!
//! with_box::<TestPerson, _, _>(|_store, people| {
//!     let id = people.put(&mut TestPerson::new("Ryu", 20)).unwrap();
//!     assert!(people.contains(id).unwrap());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod entities;
pub mod fixtures;
pub mod generators;
pub mod integration;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::entities::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
    pub use crate::stress::*;
}

pub use entities::*;
pub use fixtures::*;
pub use generators::*;
pub use integration::*;
pub use stress::*;
