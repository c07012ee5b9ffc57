//! Error types for list queries.

use thiserror::Error;

/// Errors raised while building a list query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The ordering names a field that cannot be sorted on.
    #[error("cannot order by '{field}': expected one of {}", .allowed.join(", "))]
    UnknownOrderingField {
        /// The rejected field name.
        field: String,
        /// Fields that may be ordered on.
        allowed: &'static [&'static str],
    },
}

/// Result type alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
