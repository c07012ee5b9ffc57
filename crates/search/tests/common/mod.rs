//! Shared test infrastructure for the search crate.

pub mod fixtures;

pub use fixtures::*;
