//! # carebook-store - Patient Record Sources
//!
//! The records API is reached through two async traits:
//!
//! - [`PatientSource`] - list and detail reads for patients, their addresses
//!   and custom field values, and custom field definitions
//! - [`PatientSink`] - create, update and delete, with the API's write
//!   semantics
//!
//! # Implementations
//!
//! - [`MemoryStore`] - in-memory and writable
//! - [`SnapshotStore`] - read-only, loaded from a directory of exported list
//!   payloads (`patients.json`, `custom-fields.json`)
//!
//! # Quick Start
//!
//! ```no_run
//! use carebook_search::PatientQuery;
//! use carebook_store::{PatientSource, SnapshotStore};
//!
//! # async fn run() -> carebook_store::StoreResult<()> {
//! let store = SnapshotStore::open("./snapshot").await?;
//! let page = store
//!     .list_patients(&PatientQuery::new().with_search("austin"))
//!     .await?;
//! println!("{} matching patients", page.count);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod snapshot;
pub mod source;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use snapshot::{CUSTOM_FIELDS_FILE, PATIENTS_FILE, SnapshotStore};
pub use source::{PatientSink, PatientSource};
