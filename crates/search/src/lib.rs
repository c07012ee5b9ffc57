//! # carebook-search - Patient Search and Statistics
//!
//! Pure, synchronous operations over patient lists already held in memory:
//!
//! - [`filter`] - the free-text search box used by the dashboard and the
//!   patient list ([`PatientFilter`])
//! - [`query`] - the records API's list parameters (`search`, `status`,
//!   `ordering`, windowing) applied locally ([`PatientQuery`], [`FieldQuery`])
//! - [`stats`] - dashboard counts by status and the recent-patients panel
//!
//! Nothing here performs I/O or mutates its input.

#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod query;
pub mod stats;

pub use error::{QueryError, QueryResult};
pub use filter::{PatientFilter, SearchText, filter};
pub use query::{
    FieldOrderField, FieldQuery, Matches, OrderingField, PatientOrderField, PatientQuery,
    SortDirection, SortDirective, SortOrder,
};
pub use stats::{DEFAULT_RECENT, Dashboard, DashboardStats};
