//! Test fixtures for search testing.
//!
//! Builders for patient records with just the parts a test cares about.

#![allow(dead_code)]

use carebook_model::{Address, CustomFieldValue, Patient, PatientStatus};
use chrono::NaiveDate;

/// A patient fixture for testing.
#[derive(Debug, Clone)]
pub struct PatientFixture {
    /// Patient ID.
    pub id: u64,
    /// Given name.
    pub first: String,
    /// Middle name.
    pub middle: Option<String>,
    /// Family name.
    pub last: String,
    /// Birth date (YYYY-MM-DD format).
    pub birth_date: String,
    /// Lifecycle status.
    pub status: PatientStatus,
    /// Addresses as (city, state) pairs.
    pub addresses: Vec<(String, String)>,
    /// Custom field values as (field name, text) pairs.
    pub custom_fields: Vec<(String, String)>,
}

impl PatientFixture {
    /// Creates a new patient fixture with minimal required fields.
    pub fn new(id: u64, first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            id,
            first: first.into(),
            middle: None,
            last: last.into(),
            birth_date: "1980-01-15".to_string(),
            status: PatientStatus::Inquiry,
            addresses: vec![],
            custom_fields: vec![],
        }
    }

    /// Sets the middle name.
    pub fn with_middle(mut self, middle: impl Into<String>) -> Self {
        self.middle = Some(middle.into());
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: PatientStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds an address.
    pub fn with_address(mut self, city: impl Into<String>, state: impl Into<String>) -> Self {
        self.addresses.push((city.into(), state.into()));
        self
    }

    /// Adds a text custom field value.
    pub fn with_custom_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.push((name.into(), value.into()));
        self
    }

    /// Builds the patient record.
    pub fn build(&self) -> Patient {
        let mut patient = Patient::new(
            self.id,
            self.first.clone(),
            self.last.clone(),
            NaiveDate::parse_from_str(&self.birth_date, "%Y-%m-%d").expect("fixture birth date"),
        );
        patient.middle_name = self.middle.clone();
        patient.status = self.status;
        patient.addresses = self
            .addresses
            .iter()
            .map(|(city, state)| Address::new("1 Main St", city.clone(), state.clone(), "00000"))
            .collect();
        patient.custom_field_values = self
            .custom_fields
            .iter()
            .map(|(name, value)| CustomFieldValue::text(name.clone(), value.clone()))
            .collect();
        patient
    }
}

/// Jane Doe, active, no addresses or custom fields.
pub fn jane_doe() -> Patient {
    PatientFixture::new(1, "Jane", "Doe")
        .with_status(PatientStatus::Active)
        .build()
}

/// A small mixed roster.
pub fn roster() -> Vec<Patient> {
    vec![
        PatientFixture::new(1, "Jane", "Doe")
            .with_status(PatientStatus::Active)
            .with_address("Austin", "TX")
            .build(),
        PatientFixture::new(2, "Robert", "Williams")
            .with_middle("Allen")
            .with_status(PatientStatus::Churned)
            .with_address("Portland", "OR")
            .build(),
        PatientFixture::new(3, "Maria", "Garcia")
            .with_status(PatientStatus::Onboarding)
            .with_custom_field("Referral", "Clinic A")
            .build(),
        PatientFixture::new(4, "Samuel", "Austin")
            .with_status(PatientStatus::Inquiry)
            .build(),
    ]
}
