//! Shared test infrastructure for the store crate.

pub mod assertions;
pub mod fixtures;

pub use assertions::*;
pub use fixtures::*;
