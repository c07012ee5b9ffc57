//! Source traits standing in for the records API.
//!
//! [`PatientSource`] covers the read endpoints the frontend calls;
//! [`PatientSink`] adds the write endpoints. Both are object safe so callers
//! can hold an `Arc<dyn PatientSource>`.

use async_trait::async_trait;
use carebook_model::{
    Address, CustomField, CustomFieldDraft, CustomFieldId, CustomFieldValue, Page, Patient,
    PatientDraft, PatientId,
};
use carebook_search::{FieldQuery, PatientQuery};

use crate::error::StoreResult;

/// Read access to patient records and custom field definitions.
///
/// # Example
///
/// ```ignore
/// use carebook_search::PatientQuery;
/// use carebook_store::PatientSource;
///
/// async fn active_count<S: PatientSource>(source: &S) -> StoreResult<usize> {
///     let query = PatientQuery::new().with_status(PatientStatus::Active);
///     Ok(source.list_patients(&query).await?.count)
/// }
/// ```
#[async_trait]
pub trait PatientSource: Send + Sync {
    /// Returns a human-readable name for this source.
    fn source_name(&self) -> &'static str;

    /// Lists patients matching the query. `count` is the match total before
    /// windowing.
    async fn list_patients(&self, query: &PatientQuery) -> StoreResult<Page<Patient>>;

    /// Reads one patient.
    ///
    /// # Errors
    ///
    /// * `StoreError::PatientNotFound` - If no patient has this ID
    async fn get_patient(&self, id: PatientId) -> StoreResult<Patient>;

    /// Returns a patient's addresses.
    async fn patient_addresses(&self, id: PatientId) -> StoreResult<Vec<Address>> {
        Ok(self.get_patient(id).await?.addresses)
    }

    /// Returns a patient's custom field values.
    async fn patient_custom_fields(&self, id: PatientId) -> StoreResult<Vec<CustomFieldValue>> {
        Ok(self.get_patient(id).await?.custom_field_values)
    }

    /// Lists custom field definitions matching the query.
    async fn list_custom_fields(&self, query: &FieldQuery) -> StoreResult<Page<CustomField>>;

    /// Reads one custom field definition.
    ///
    /// # Errors
    ///
    /// * `StoreError::CustomFieldNotFound` - If no definition has this ID
    async fn get_custom_field(&self, id: CustomFieldId) -> StoreResult<CustomField>;

    /// Returns every value recorded for a custom field, across all patients.
    async fn custom_field_values(&self, id: CustomFieldId) -> StoreResult<Vec<CustomFieldValue>>;
}

/// Write access mirroring the records API's create, update and delete
/// endpoints.
#[async_trait]
pub trait PatientSink: PatientSource {
    /// Creates a patient from a validated draft.
    ///
    /// A missing status defaults to Inquiry. Address countries are not kept.
    ///
    /// # Errors
    ///
    /// * `StoreError::Model(Validation)` - If the draft is invalid
    async fn create_patient(&self, draft: PatientDraft) -> StoreResult<Patient>;

    /// Replaces a patient's fields with the draft's.
    ///
    /// A missing status keeps the current one. Addresses and custom field
    /// values are replaced only when the draft supplies a non-empty list.
    ///
    /// # Errors
    ///
    /// * `StoreError::PatientNotFound` - If no patient has this ID
    /// * `StoreError::Model(Validation)` - If the draft is invalid
    async fn update_patient(&self, id: PatientId, draft: PatientDraft) -> StoreResult<Patient>;

    /// Deletes a patient with its addresses and values.
    async fn delete_patient(&self, id: PatientId) -> StoreResult<()>;

    /// Creates a custom field definition.
    async fn create_custom_field(&self, draft: CustomFieldDraft) -> StoreResult<CustomField>;

    /// Replaces a custom field definition. Existing values are renamed to
    /// follow the definition.
    async fn update_custom_field(
        &self,
        id: CustomFieldId,
        draft: CustomFieldDraft,
    ) -> StoreResult<CustomField>;

    /// Deletes a custom field definition and every value recorded for it.
    async fn delete_custom_field(&self, id: CustomFieldId) -> StoreResult<()>;
}
