//! # carebook-model - Patient Record Types
//!
//! Typed representations of the records API payloads that Carebook works
//! with: patients, their addresses and custom field values, custom field
//! definitions, and the paginated list envelope. Drafts model what the
//! create and edit forms submit, and carry the validation rules applied
//! before submission.
//!
//! ## Wire Format
//!
//! All types decode from the JSON the records API returns:
//!
//! | Type | Notes |
//! |------|-------|
//! | [`Patient`] | `status` is an uppercase code; missing `addresses`/`custom_field_values` decode as empty |
//! | [`Address`] | postal code under `zip_code` or `postal_code` |
//! | [`CustomFieldValue`] | `number_value` accepts decimal strings |
//! | [`Page`] | `{count, next, previous, results}` or a bare array |
//!
//! ## Example
//!
//! ```rust
//! use carebook_model::{Page, Patient, PatientStatus};
//!
//! let page: Page<Patient> = Page::from_json(r#"{
//!     "count": 1, "next": null, "previous": null,
//!     "results": [{
//!         "id": 1, "first_name": "Jane", "middle_name": null, "last_name": "Doe",
//!         "date_of_birth": "1985-03-14", "status": "ACTIVE"
//!     }]
//! }"#).unwrap();
//!
//! assert_eq!(page.results[0].full_name(), "Jane Doe");
//! assert_eq!(page.results[0].status, PatientStatus::Active);
//! ```

#![warn(missing_docs)]

pub mod address;
pub mod custom_field;
pub mod draft;
pub mod error;
pub mod page;
pub mod patient;
mod wire;

pub use address::Address;
pub use custom_field::{CustomField, CustomFieldId, CustomFieldValue, FieldType, FieldValue};
pub use draft::{AddressDraft, CustomFieldDraft, CustomFieldValueDraft, PatientDraft};
pub use error::{ModelError, ModelResult, ValidationErrors, ValidationIssue};
pub use page::Page;
pub use patient::{Patient, PatientId, PatientStatus};
