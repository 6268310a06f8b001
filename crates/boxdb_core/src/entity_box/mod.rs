//! Typed box API.
//!
//! Provides `EntityBox<E>` for typed CRUD, bulk and iteration operations,
//! and the `Visitor` protocols its scans are driven by.

mod typed;
mod visitor;

pub use typed::EntityBox;
pub use visitor::{Fallible, FallibleShortCircuit, ShortCircuit, Visitor};
