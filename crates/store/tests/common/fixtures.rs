//! Test fixtures for store testing.
//!
//! Payloads shaped like the records API's list responses, and a helper that
//! writes them into a snapshot directory.

#![allow(dead_code)]

use std::path::Path;

use carebook_model::{
    AddressDraft, CustomField, CustomFieldDraft, CustomFieldValueDraft, FieldType, PatientDraft,
};
use carebook_store::{CUSTOM_FIELDS_FILE, MemoryStore, PATIENTS_FILE, PatientSink};
use chrono::NaiveDate;
use serde_json::{Value, json};

/// A patient list page as returned by `GET /api/patients/`.
pub fn patients_envelope() -> Value {
    json!({
        "count": 3,
        "next": null,
        "previous": null,
        "results": [
            {
                "id": 3,
                "first_name": "Maria",
                "middle_name": "",
                "last_name": "Garcia",
                "full_name": "Maria  Garcia",
                "date_of_birth": "1992-11-02",
                "status": "ONBOARDING",
                "addresses": [],
                "custom_field_values": [
                    {
                        "id": 11,
                        "field_name": "Referral",
                        "field_type": "TEXT",
                        "text_value": "Clinic A",
                        "number_value": null,
                        "date_value": null
                    }
                ],
                "created_at": "2024-03-03T09:00:00Z"
            },
            {
                "id": 2,
                "first_name": "Robert",
                "middle_name": "Allen",
                "last_name": "Williams",
                "date_of_birth": "1975-06-20",
                "status": "CHURNED",
                "addresses": [
                    {
                        "id": 5,
                        "street": "9 Pine Rd",
                        "city": "Portland",
                        "state": "OR",
                        "zip_code": "97201",
                        "postal_code": "97201",
                        "is_primary": true
                    }
                ],
                "custom_field_values": [
                    {
                        "id": 12,
                        "field_name": "Weight",
                        "field_type": "NUMBER",
                        "text_value": null,
                        "number_value": "72.50",
                        "date_value": null
                    }
                ],
                "created_at": "2024-02-02T09:00:00Z"
            },
            {
                "id": 1,
                "first_name": "Jane",
                "middle_name": null,
                "last_name": "Doe",
                "date_of_birth": "1985-03-14",
                "status": "ACTIVE",
                "addresses": [
                    {
                        "id": 4,
                        "street": "1 Main St",
                        "city": "Austin",
                        "state": "TX",
                        "zip_code": "73301",
                        "is_primary": true
                    }
                ],
                "custom_field_values": [],
                "created_at": "2024-01-01T09:00:00Z"
            }
        ]
    })
}

/// Custom field definitions as a bare array.
pub fn custom_fields_array() -> Value {
    json!([
        {"id": 1, "name": "Referral", "field_type": "TEXT", "is_required": false},
        {"id": 2, "name": "Weight", "field_type": "NUMBER", "is_required": false}
    ])
}

/// Writes the given payloads into `dir`. `None` leaves the file absent.
pub fn write_snapshot(dir: &Path, patients: Option<&Value>, fields: Option<&Value>) {
    if let Some(patients) = patients {
        std::fs::write(dir.join(PATIENTS_FILE), patients.to_string()).expect("write patients");
    }
    if let Some(fields) = fields {
        std::fs::write(dir.join(CUSTOM_FIELDS_FILE), fields.to_string()).expect("write fields");
    }
}

/// A birth date for drafts.
pub fn birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1985, 3, 14).expect("valid date")
}

/// A complete address draft in Austin.
pub fn austin_address() -> AddressDraft {
    AddressDraft::new("1 Main St", "Austin", "TX", "73301", "US").primary()
}

/// A store with two custom fields: optional text "Referral" and required
/// number "Weight".
pub async fn store_with_fields() -> (MemoryStore, CustomField, CustomField) {
    let store = MemoryStore::new();
    let referral = store
        .create_custom_field(CustomFieldDraft::new("Referral", FieldType::Text))
        .await
        .expect("create referral");
    let weight = store
        .create_custom_field(CustomFieldDraft::new("Weight", FieldType::Number).required())
        .await
        .expect("create weight");
    (store, referral, weight)
}

/// A valid draft for the fields created by [`store_with_fields`].
pub fn jane_draft(referral: &CustomField, weight: &CustomField) -> PatientDraft {
    PatientDraft::new("Jane", "Doe", birth_date())
        .with_address(austin_address())
        .with_value(CustomFieldValueDraft::text(referral.id, "Clinic A"))
        .with_value(CustomFieldValueDraft::number(
            weight.id,
            rust_decimal::Decimal::new(7250, 2),
        ))
}
