//! Benchmark support for BoxDB.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
