//! Patient records and their lifecycle status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::custom_field::CustomFieldValue;
use crate::error::ModelError;
use crate::wire::null_as_default;

/// Server-assigned identifier of a patient record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientId(u64);

impl PatientId {
    /// Creates a new patient ID.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric ID.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for PatientId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a patient.
///
/// The wire form is the uppercase code (`INQUIRY`, `ONBOARDING`, ...).
/// Parsing is lenient: surrounding whitespace and case are ignored, and an
/// empty value falls back to [`PatientStatus::Inquiry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum PatientStatus {
    /// First contact, not yet onboarding.
    #[default]
    Inquiry,
    /// Intake in progress.
    Onboarding,
    /// Receiving care.
    Active,
    /// No longer a patient.
    Churned,
}

impl PatientStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [PatientStatus; 4] = [
        PatientStatus::Inquiry,
        PatientStatus::Onboarding,
        PatientStatus::Active,
        PatientStatus::Churned,
    ];

    /// Returns the wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            PatientStatus::Inquiry => "INQUIRY",
            PatientStatus::Onboarding => "ONBOARDING",
            PatientStatus::Active => "ACTIVE",
            PatientStatus::Churned => "CHURNED",
        }
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            PatientStatus::Inquiry => "Inquiry",
            PatientStatus::Onboarding => "Onboarding",
            PatientStatus::Active => "Active",
            PatientStatus::Churned => "Churned",
        }
    }

    /// Comma-separated list of the accepted wire codes.
    pub fn valid_values() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PatientStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(PatientStatus::Inquiry);
        }
        match trimmed.to_uppercase().as_str() {
            "INQUIRY" => Ok(PatientStatus::Inquiry),
            "ONBOARDING" => Ok(PatientStatus::Onboarding),
            "ACTIVE" => Ok(PatientStatus::Active),
            "CHURNED" => Ok(PatientStatus::Churned),
            _ => Err(ModelError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for PatientStatus {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A patient record as returned by the records API.
///
/// The client holds a transient copy; the API owns the record. Missing
/// collections decode as empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Server-assigned identifier.
    pub id: PatientId,

    /// Given name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,

    /// Middle name, if any.
    #[serde(default)]
    pub middle_name: Option<String>,

    /// Family name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,

    /// Date of birth.
    pub date_of_birth: NaiveDate,

    /// Lifecycle status.
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: PatientStatus,

    /// Addresses; index 0 is the displayed one.
    #[serde(default, deserialize_with = "null_as_default")]
    pub addresses: Vec<Address>,

    /// Values of custom fields recorded for this patient.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_field_values: Vec<CustomFieldValue>,

    /// When the record was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the record was last modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// ID of the user who created the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<u64>,
}

impl Patient {
    /// Creates a patient with the given identity and no optional data.
    pub fn new(
        id: impl Into<PatientId>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            first_name: first_name.into(),
            middle_name: None,
            last_name: last_name.into(),
            date_of_birth,
            status: PatientStatus::default(),
            addresses: Vec::new(),
            custom_field_values: Vec::new(),
            created_at: None,
            updated_at: None,
            created_by: None,
        }
    }

    /// Returns the middle name, treating a blank value as absent.
    pub fn middle_name(&self) -> Option<&str> {
        self.middle_name
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }

    /// Returns first, middle and last name joined by single spaces.
    ///
    /// An absent middle name leaves no gap: `"Jane Doe"`, not `"Jane  Doe"`.
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.trim()),
            self.middle_name(),
            Some(self.last_name.trim()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Returns the address shown in listings: the first one in list order.
    pub fn display_address(&self) -> Option<&Address> {
        self.addresses.first()
    }

    /// Returns the address flagged primary, falling back to the displayed one.
    pub fn primary_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_primary)
            .or_else(|| self.display_address())
    }

    /// Returns the age in whole years on the given date.
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        date.years_since(self.date_of_birth)
    }
}
