//! Drafts submitted to create or edit records, and their validation.
//!
//! Drafts mirror the write shape of the records API. Validation applies the
//! rules of the patient and custom field forms and of the API's serializers,
//! and reports every problem at once as a [`ValidationErrors`] value whose
//! field paths follow the draft's JSON layout (`addresses.0.city`,
//! `custom_field_values.1`, `custom_fields.4`).

use std::collections::HashSet;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::custom_field::{CustomField, CustomFieldId, CustomFieldValue, FieldType};
use crate::error::{ModelResult, ValidationErrors};
use crate::patient::PatientStatus;
use crate::wire::null_as_default;

/// A patient as submitted by the create and edit forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientDraft {
    /// Given name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    /// Middle name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Family name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    /// Date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// Raw status input; absent keeps the default or current status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<AddressDraft>,
    /// Custom field values.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_field_values: Vec<CustomFieldValueDraft>,
}

/// An address as submitted by the patient forms.
///
/// The edit form sends back what it read, so either `zip_code` or
/// `postal_code` (or both) may carry the postal code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireAddressDraft")]
pub struct AddressDraft {
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// Country.
    pub country: String,
    /// Primary flag.
    pub is_primary: bool,
}

#[derive(Deserialize)]
struct WireAddressDraft {
    #[serde(default)]
    street: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    zip_code: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    is_primary: Option<bool>,
}

impl From<WireAddressDraft> for AddressDraft {
    fn from(wire: WireAddressDraft) -> Self {
        let postal_code = wire
            .postal_code
            .filter(|p| !p.trim().is_empty())
            .or(wire.zip_code)
            .unwrap_or_default();
        Self {
            street: wire.street.unwrap_or_default(),
            city: wire.city.unwrap_or_default(),
            state: wire.state.unwrap_or_default(),
            postal_code,
            country: wire.country.unwrap_or_default(),
            is_primary: wire.is_primary.unwrap_or_default(),
        }
    }
}

/// A custom field value as submitted by the patient forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValueDraft {
    /// The definition this value is for. Absent when the value was read back
    /// from the API, which then identifies it by name and type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_field: Option<CustomFieldId>,
    /// Name of the definition, as echoed by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    /// Declared type of the definition, as echoed by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Text slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_value: Option<String>,
    /// Number slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_value: Option<Decimal>,
    /// Date slot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_value: Option<NaiveDate>,
}

/// A custom field definition as submitted by the custom fields form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldDraft {
    /// Field name.
    #[serde(default)]
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Whether a value is mandatory.
    #[serde(default)]
    pub is_required: bool,
}

impl PatientDraft {
    /// Creates a draft with the mandatory scalar fields set.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth: Some(date_of_birth),
            ..Default::default()
        }
    }

    /// Sets the raw status input.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Adds an address.
    pub fn with_address(mut self, address: AddressDraft) -> Self {
        self.addresses.push(address);
        self
    }

    /// Adds a custom field value.
    pub fn with_value(mut self, value: CustomFieldValueDraft) -> Self {
        self.custom_field_values.push(value);
        self
    }

    /// Parses the status input.
    ///
    /// Returns `None` when no status was supplied so callers can pick the
    /// default (on create) or keep the current one (on update).
    pub fn parsed_status(&self) -> ModelResult<Option<PatientStatus>> {
        self.status
            .as_deref()
            .map(|s| s.parse::<PatientStatus>())
            .transpose()
    }

    /// Returns the middle name with blank input treated as absent.
    pub fn middle_name(&self) -> Option<String> {
        self.middle_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
    }

    /// Validates the draft against the known custom field definitions.
    pub fn validate(&self, definitions: &[CustomField]) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.first_name.trim().is_empty() {
            errors.push("first_name", "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.push("last_name", "Last name is required");
        }
        if self.date_of_birth.is_none() {
            errors.push("date_of_birth", "Date of birth is required");
        }
        if self.parsed_status().is_err() {
            errors.push(
                "status",
                format!("Status must be one of: {}", PatientStatus::valid_values()),
            );
        }

        for (index, address) in self.addresses.iter().enumerate() {
            address.validate_into(index, &mut errors);
        }

        let mut seen = HashSet::new();
        for (index, value) in self.custom_field_values.iter().enumerate() {
            let path = format!("custom_field_values.{}", index);
            let Some(field) = value.resolve(definitions) else {
                let message = match (&value.custom_field, &value.field_name) {
                    (Some(id), _) => format!("Unknown custom field {}", id),
                    (None, Some(name)) => format!("Unknown custom field {}", name),
                    (None, None) => "Custom field is required".to_string(),
                };
                errors.push(path, message);
                continue;
            };
            if !seen.insert(field.id) {
                errors.push(path, format!("{} appears more than once", field.name));
                continue;
            }
            value.validate_into(field, &path, &mut errors);
        }

        for field in definitions.iter().filter(|f| f.is_required) {
            let supplied = self
                .custom_field_values
                .iter()
                .filter(|v| v.has_value())
                .any(|v| v.resolve(definitions).is_some_and(|f| f.id == field.id));
            if !supplied {
                errors.push(
                    format!("custom_fields.{}", field.id),
                    format!("{} is required", field.name),
                );
            }
        }

        errors.into_result()
    }
}

impl AddressDraft {
    /// Creates an address draft.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        postal_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            postal_code: postal_code.into(),
            country: country.into(),
            is_primary: false,
        }
    }

    /// Marks the address as primary.
    pub fn primary(mut self) -> Self {
        self.is_primary = true;
        self
    }

    fn validate_into(&self, index: usize, errors: &mut ValidationErrors) {
        let required = [
            ("street", &self.street, "Street address is required"),
            ("city", &self.city, "City is required"),
            ("state", &self.state, "State is required"),
            ("postal_code", &self.postal_code, "Postal code is required"),
            ("country", &self.country, "Country is required"),
        ];
        for (name, value, message) in required {
            if value.trim().is_empty() {
                errors.push(format!("addresses.{}.{}", index, name), message);
            }
        }
    }

    /// Converts the draft into a stored address. The country is not kept.
    pub fn to_address(&self, id: Option<u64>) -> Address {
        Address {
            id,
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: None,
            is_primary: self.is_primary,
        }
    }
}

impl CustomFieldValueDraft {
    /// Creates a text value draft.
    pub fn text(field: impl Into<CustomFieldId>, value: impl Into<String>) -> Self {
        Self {
            custom_field: Some(field.into()),
            field_name: None,
            field_type: None,
            text_value: Some(value.into()),
            number_value: None,
            date_value: None,
        }
    }

    /// Creates a number value draft.
    pub fn number(field: impl Into<CustomFieldId>, value: Decimal) -> Self {
        Self {
            custom_field: Some(field.into()),
            field_name: None,
            field_type: None,
            text_value: None,
            number_value: Some(value),
            date_value: None,
        }
    }

    /// Creates a date value draft.
    pub fn date(field: impl Into<CustomFieldId>, value: NaiveDate) -> Self {
        Self {
            custom_field: Some(field.into()),
            field_name: None,
            field_type: None,
            text_value: None,
            number_value: None,
            date_value: Some(value),
        }
    }

    fn populated_types(&self) -> Vec<FieldType> {
        let mut types = Vec::with_capacity(1);
        if self.text_value.as_deref().is_some_and(|t| !t.trim().is_empty()) {
            types.push(FieldType::Text);
        }
        if self.number_value.is_some() {
            types.push(FieldType::Number);
        }
        if self.date_value.is_some() {
            types.push(FieldType::Date);
        }
        types
    }

    /// Finds this value's definition: by reference when present, otherwise
    /// by the echoed name and type.
    pub fn resolve<'a>(&self, definitions: &'a [CustomField]) -> Option<&'a CustomField> {
        match (self.custom_field, self.field_name.as_deref()) {
            (Some(id), _) => definitions.iter().find(|f| f.id == id),
            (None, Some(name)) => definitions.iter().find(|f| {
                f.name == name.trim() && self.field_type.is_none_or(|t| t == f.field_type)
            }),
            (None, None) => None,
        }
    }

    /// Returns true if any slot is populated.
    pub fn has_value(&self) -> bool {
        !self.populated_types().is_empty()
    }

    fn validate_into(&self, field: &CustomField, path: &str, errors: &mut ValidationErrors) {
        match self.populated_types().as_slice() {
            [] => {}
            [single] if *single == field.field_type => {}
            [_] => errors.push(
                path,
                format!("{} expects a {} value", field.name, field.field_type.label().to_lowercase()),
            ),
            _ => errors.push(path, format!("{} has more than one value", field.name)),
        }
    }

    /// Resolves the draft against its definition into a stored value.
    pub fn to_value(&self, field: &CustomField, id: Option<u64>) -> CustomFieldValue {
        CustomFieldValue {
            id,
            custom_field: Some(field.id),
            field_name: field.name.clone(),
            field_type: Some(field.field_type),
            text_value: self
                .text_value
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            number_value: self.number_value,
            date_value: self.date_value,
        }
    }
}

impl CustomFieldDraft {
    /// Creates a custom field draft.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            is_required: false,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    /// Validates the draft.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.push("name", "Name is required");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1990, 1, 2).unwrap()
    }

    fn definitions() -> Vec<CustomField> {
        vec![
            CustomField::new(1, "Referral", FieldType::Text).required(),
            CustomField::new(2, "Weight", FieldType::Number),
            CustomField::new(3, "Follow-up", FieldType::Date),
        ]
    }

    fn valid_draft() -> PatientDraft {
        PatientDraft::new("Jane", "Doe", dob())
            .with_status("Active")
            .with_address(AddressDraft::new("1 Main St", "Austin", "TX", "73301", "US"))
            .with_value(CustomFieldValueDraft::text(1, "Clinic A"))
    }

    #[test]
    fn test_valid_draft_passes() {
        assert!(valid_draft().validate(&definitions()).is_ok());
        assert_eq!(
            valid_draft().parsed_status().unwrap(),
            Some(PatientStatus::Active)
        );
    }

    #[test]
    fn test_missing_scalars_are_all_reported() {
        let draft = PatientDraft {
            status: Some("pending".to_string()),
            ..Default::default()
        };
        let errors = draft.validate(&[]).unwrap_err();

        assert!(errors.has_field("first_name"));
        assert!(errors.has_field("last_name"));
        assert!(errors.has_field("date_of_birth"));
        assert!(errors.has_field("status"));
        assert_eq!(errors.issues().len(), 4);
    }

    #[test]
    fn test_address_fields_required() {
        let draft = valid_draft().with_address(AddressDraft {
            street: "2 Oak Ave".to_string(),
            ..Default::default()
        });
        let errors = draft.validate(&definitions()).unwrap_err();

        assert!(errors.has_field("addresses.1.city"));
        assert!(errors.has_field("addresses.1.state"));
        assert!(errors.has_field("addresses.1.postal_code"));
        assert!(errors.has_field("addresses.1.country"));
        assert!(!errors.has_field("addresses.1.street"));
        assert!(!errors.has_field("addresses.0.city"));
    }

    #[test]
    fn test_required_custom_field() {
        let draft = PatientDraft::new("Jane", "Doe", dob());
        let errors = draft.validate(&definitions()).unwrap_err();
        assert_eq!(errors.issues().len(), 1);
        assert_eq!(errors.issues()[0].field, "custom_fields.1");
        assert_eq!(errors.issues()[0].message, "Referral is required");

        let blank = draft.with_value(CustomFieldValueDraft::text(1, "   "));
        assert!(blank.validate(&definitions()).unwrap_err().has_field("custom_fields.1"));
    }

    #[test]
    fn test_value_type_must_match_declaration() {
        let draft = valid_draft().with_value(CustomFieldValueDraft::text(2, "heavy"));
        let errors = draft.validate(&definitions()).unwrap_err();
        assert_eq!(errors.issues()[0].field, "custom_field_values.1");
        assert_eq!(errors.issues()[0].message, "Weight expects a number value");
    }

    #[test]
    fn test_multiple_slots_rejected() {
        let mut value = CustomFieldValueDraft::date(3, dob());
        value.number_value = Some(Decimal::new(5, 0));
        let errors = valid_draft().with_value(value).validate(&definitions()).unwrap_err();
        assert_eq!(errors.issues()[0].message, "Follow-up has more than one value");
    }

    #[test]
    fn test_unknown_and_duplicate_fields() {
        let draft = valid_draft()
            .with_value(CustomFieldValueDraft::text(1, "Clinic B"))
            .with_value(CustomFieldValueDraft::text(99, "x"));
        let errors = draft.validate(&definitions()).unwrap_err();

        assert_eq!(errors.issues()[0].message, "Referral appears more than once");
        assert_eq!(errors.issues()[1].message, "Unknown custom field 99");
    }

    #[test]
    fn test_decode_form_payload() {
        let draft: PatientDraft = serde_json::from_value(json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "date_of_birth": "1990-01-02",
            "status": "Inquiry",
            "addresses": [{
                "street": "1 Main St",
                "city": "Austin",
                "state": "TX",
                "zip_code": "73301",
                "country": "US"
            }],
            "custom_field_values": [{"custom_field": 1, "text_value": "Clinic A"}]
        }))
        .unwrap();

        assert_eq!(draft.addresses[0].postal_code, "73301");
        assert!(draft.validate(&definitions()).is_ok());
    }

    #[test]
    fn test_decode_edit_payload() {
        let draft: PatientDraft = serde_json::from_value(json!({
            "id": 7,
            "first_name": "Jane",
            "middle_name": null,
            "last_name": "Doe",
            "full_name": "Jane  Doe",
            "date_of_birth": "1990-01-02",
            "status": "ACTIVE",
            "addresses": [{
                "id": 3,
                "street": "1 Main St",
                "city": "Austin",
                "state": "TX",
                "zip_code": "73301",
                "postal_code": "73301",
                "country": "US",
                "is_primary": true
            }],
            "custom_field_values": [{
                "id": 11,
                "field_name": "Referral",
                "field_type": "TEXT",
                "text_value": "Clinic A",
                "number_value": null,
                "date_value": null
            }],
            "created_at": "2024-05-01T10:30:00Z"
        }))
        .unwrap();

        assert_eq!(draft.addresses[0].postal_code, "73301");
        assert!(draft.addresses[0].is_primary);
        assert_eq!(draft.custom_field_values[0].custom_field, None);
        assert_eq!(
            draft.custom_field_values[0].resolve(&definitions()).map(|f| f.id),
            Some(CustomFieldId::new(1))
        );
        assert!(draft.validate(&definitions()).is_ok());
    }

    #[test]
    fn test_unresolved_echoed_value() {
        let draft: PatientDraft = serde_json::from_value(json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "date_of_birth": "1990-01-02",
            "addresses": null,
            "custom_field_values": [
                {"field_name": "Referral", "field_type": "TEXT", "text_value": "Clinic A"},
                {"field_name": "Shoe size", "field_type": "NUMBER", "number_value": "42"},
                {"text_value": "orphan"}
            ]
        }))
        .unwrap();
        let errors = draft.validate(&definitions()).unwrap_err();

        assert!(draft.addresses.is_empty());
        assert_eq!(errors.issues().len(), 2);
        assert_eq!(errors.issues()[0].message, "Unknown custom field Shoe size");
        assert_eq!(errors.issues()[1].message, "Custom field is required");
    }

    #[test]
    fn test_to_value_resolves_definition() {
        let field = CustomField::new(1, "Referral", FieldType::Text);
        let value = CustomFieldValueDraft::text(1, " Clinic A ").to_value(&field, Some(10));
        assert_eq!(value.field_name, "Referral");
        assert_eq!(value.custom_field, Some(CustomFieldId::new(1)));
        assert_eq!(value.display_value(), "Clinic A");
    }

    #[test]
    fn test_custom_field_draft_requires_name() {
        assert!(CustomFieldDraft::new("Referral", FieldType::Text).validate().is_ok());
        let errors = CustomFieldDraft::new(" ", FieldType::Text).validate().unwrap_err();
        assert!(errors.has_field("name"));
    }
}
