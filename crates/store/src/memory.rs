//! In-memory patient store.
//!
//! [`MemoryStore`] keeps patients and custom field definitions behind a
//! `parking_lot::RwLock` and applies the records API's write semantics:
//! server-assigned IDs and timestamps, addresses listed primary first,
//! custom field values listed by field name, and cascading deletes of
//! custom field values.

use async_trait::async_trait;
use carebook_model::{
    CustomField, CustomFieldDraft, CustomFieldId, CustomFieldValue, Page, Patient, PatientDraft,
    PatientId, ValidationErrors,
};
use carebook_search::{FieldQuery, PatientQuery};
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::source::{PatientSink, PatientSource};

#[derive(Debug)]
struct State {
    patients: Vec<Patient>,
    fields: Vec<CustomField>,
    next_patient_id: u64,
    next_field_id: u64,
    next_address_id: u64,
    next_value_id: u64,
}

impl Default for State {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl State {
    fn new(patients: Vec<Patient>, fields: Vec<CustomField>) -> Self {
        let next_patient_id = patients.iter().map(|p| p.id.get()).max().unwrap_or(0) + 1;
        let next_field_id = fields.iter().map(|f| f.id.get()).max().unwrap_or(0) + 1;
        let next_address_id = patients
            .iter()
            .flat_map(|p| p.addresses.iter().filter_map(|a| a.id))
            .max()
            .unwrap_or(0)
            + 1;
        let next_value_id = patients
            .iter()
            .flat_map(|p| p.custom_field_values.iter().filter_map(|v| v.id))
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            patients,
            fields,
            next_patient_id,
            next_field_id,
            next_address_id,
            next_value_id,
        }
    }

    fn patient_index(&self, id: PatientId) -> StoreResult<usize> {
        self.patients
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::PatientNotFound { id })
    }

    fn field_index(&self, id: CustomFieldId) -> StoreResult<usize> {
        self.fields
            .iter()
            .position(|f| f.id == id)
            .ok_or(StoreError::CustomFieldNotFound { id })
    }

    fn apply_collections(&mut self, patient: &mut Patient, draft: &PatientDraft) {
        if !draft.addresses.is_empty() {
            let mut addresses: Vec<_> = draft
                .addresses
                .iter()
                .map(|a| {
                    let id = self.next_address_id;
                    self.next_address_id += 1;
                    a.to_address(Some(id))
                })
                .collect();
            addresses.sort_by_key(|a| !a.is_primary);
            patient.addresses = addresses;
        }

        if !draft.custom_field_values.is_empty() {
            let mut values: Vec<CustomFieldValue> = Vec::with_capacity(draft.custom_field_values.len());
            for value in &draft.custom_field_values {
                let Some(field) = value.resolve(&self.fields) else {
                    continue;
                };
                let id = self.next_value_id;
                self.next_value_id += 1;
                values.push(value.to_value(field, Some(id)));
            }
            values.sort_by(|a, b| a.field_name.cmp(&b.field_name));
            patient.custom_field_values = values;
        }
    }
}

fn require_birth_date(draft: &PatientDraft) -> StoreResult<NaiveDate> {
    draft.date_of_birth.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.push("date_of_birth", "Date of birth is required");
        StoreError::from(errors)
    })
}

/// An in-memory, writable patient source.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
    acting_user: Option<u64>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with existing records. New IDs continue after
    /// the highest ones present.
    pub fn with_data(patients: Vec<Patient>, fields: Vec<CustomField>) -> Self {
        Self {
            state: RwLock::new(State::new(patients, fields)),
            acting_user: None,
        }
    }

    /// Records the given user as `created_by` on patients created from now on.
    pub fn acting_as(mut self, user_id: u64) -> Self {
        self.acting_user = Some(user_id);
        self
    }

    /// Returns the number of patients held.
    pub fn patient_count(&self) -> usize {
        self.state.read().patients.len()
    }

    /// Returns a copy of every patient in storage order.
    pub fn patients(&self) -> Vec<Patient> {
        self.state.read().patients.clone()
    }

    /// Returns a copy of every custom field definition in storage order.
    pub fn custom_fields(&self) -> Vec<CustomField> {
        self.state.read().fields.clone()
    }
}

#[async_trait]
impl PatientSource for MemoryStore {
    fn source_name(&self) -> &'static str {
        "memory"
    }

    async fn list_patients(&self, query: &PatientQuery) -> StoreResult<Page<Patient>> {
        let state = self.state.read();
        Ok(query.apply(&state.patients).into_page())
    }

    async fn get_patient(&self, id: PatientId) -> StoreResult<Patient> {
        let state = self.state.read();
        let index = state.patient_index(id)?;
        Ok(state.patients[index].clone())
    }

    async fn list_custom_fields(&self, query: &FieldQuery) -> StoreResult<Page<CustomField>> {
        let state = self.state.read();
        Ok(query.apply(&state.fields).into_page())
    }

    async fn get_custom_field(&self, id: CustomFieldId) -> StoreResult<CustomField> {
        let state = self.state.read();
        let index = state.field_index(id)?;
        Ok(state.fields[index].clone())
    }

    async fn custom_field_values(&self, id: CustomFieldId) -> StoreResult<Vec<CustomFieldValue>> {
        let state = self.state.read();
        let field = &state.fields[state.field_index(id)?];
        let values: Vec<_> = state
            .patients
            .iter()
            .flat_map(|p| p.custom_field_values.iter())
            .filter(|v| v.belongs_to(field))
            .cloned()
            .collect();
        debug!(field_id = %id, count = values.len(), "Collected custom field values");
        Ok(values)
    }
}

#[async_trait]
impl PatientSink for MemoryStore {
    async fn create_patient(&self, draft: PatientDraft) -> StoreResult<Patient> {
        let mut state = self.state.write();
        draft.validate(&state.fields)?;

        let status = draft.parsed_status()?.unwrap_or_default();
        let now = Utc::now();
        let id = PatientId::new(state.next_patient_id);
        state.next_patient_id += 1;

        let mut patient = Patient::new(
            id,
            draft.first_name.trim(),
            draft.last_name.trim(),
            require_birth_date(&draft)?,
        );
        patient.middle_name = draft.middle_name();
        patient.status = status;
        patient.created_at = Some(now);
        patient.updated_at = Some(now);
        patient.created_by = self.acting_user;
        state.apply_collections(&mut patient, &draft);

        info!(patient_id = %id, status = %status, "Created patient");
        state.patients.push(patient.clone());
        Ok(patient)
    }

    async fn update_patient(&self, id: PatientId, draft: PatientDraft) -> StoreResult<Patient> {
        let mut state = self.state.write();
        let index = state.patient_index(id)?;
        if draft.custom_field_values.is_empty() {
            // Kept values are not revalidated against required definitions.
            let definitions: Vec<CustomField> = state
                .fields
                .iter()
                .cloned()
                .map(|mut field| {
                    field.is_required = false;
                    field
                })
                .collect();
            draft.validate(&definitions)?;
        } else {
            draft.validate(&state.fields)?;
        }

        let mut patient = state.patients[index].clone();
        patient.first_name = draft.first_name.trim().to_string();
        patient.middle_name = draft.middle_name();
        patient.last_name = draft.last_name.trim().to_string();
        patient.date_of_birth = require_birth_date(&draft)?;
        if let Some(status) = draft.parsed_status()? {
            patient.status = status;
        }
        patient.updated_at = Some(Utc::now());
        state.apply_collections(&mut patient, &draft);

        info!(patient_id = %id, status = %patient.status, "Updated patient");
        state.patients[index] = patient.clone();
        Ok(patient)
    }

    async fn delete_patient(&self, id: PatientId) -> StoreResult<()> {
        let mut state = self.state.write();
        let index = state.patient_index(id)?;
        state.patients.remove(index);
        info!(patient_id = %id, "Deleted patient");
        Ok(())
    }

    async fn create_custom_field(&self, draft: CustomFieldDraft) -> StoreResult<CustomField> {
        draft.validate()?;
        let mut state = self.state.write();

        let now = Utc::now();
        let id = CustomFieldId::new(state.next_field_id);
        state.next_field_id += 1;

        let mut field = CustomField::new(id, draft.name.trim(), draft.field_type);
        field.is_required = draft.is_required;
        field.created_at = Some(now);
        field.updated_at = Some(now);

        info!(field_id = %id, name = %field.name, field_type = %field.field_type, "Created custom field");
        state.fields.push(field.clone());
        Ok(field)
    }

    async fn update_custom_field(
        &self,
        id: CustomFieldId,
        draft: CustomFieldDraft,
    ) -> StoreResult<CustomField> {
        draft.validate()?;
        let mut state = self.state.write();
        let index = state.field_index(id)?;

        let previous = state.fields[index].clone();
        let mut field = previous.clone();
        field.name = draft.name.trim().to_string();
        field.field_type = draft.field_type;
        field.is_required = draft.is_required;
        field.updated_at = Some(Utc::now());

        for patient in &mut state.patients {
            for value in patient
                .custom_field_values
                .iter_mut()
                .filter(|v| v.belongs_to(&previous))
            {
                value.field_name = field.name.clone();
                value.field_type = Some(field.field_type);
            }
        }

        info!(field_id = %id, name = %field.name, "Updated custom field");
        state.fields[index] = field.clone();
        Ok(field)
    }

    async fn delete_custom_field(&self, id: CustomFieldId) -> StoreResult<()> {
        let mut state = self.state.write();
        let index = state.field_index(id)?;
        let field = state.fields.remove(index);

        let mut removed = 0;
        for patient in &mut state.patients {
            let before = patient.custom_field_values.len();
            patient.custom_field_values.retain(|v| !v.belongs_to(&field));
            removed += before - patient.custom_field_values.len();
        }

        info!(field_id = %id, removed_values = removed, "Deleted custom field");
        Ok(())
    }
}
