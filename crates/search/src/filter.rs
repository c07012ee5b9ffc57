//! Free-text patient filtering.
//!
//! [`PatientFilter`] is the search box behind the dashboard and the patient
//! list. A patient matches when the lowercased query is a substring of any
//! of four derived strings:
//!
//! | Part | Derived from |
//! |------|--------------|
//! | name | first, middle and last name |
//! | address | city and state of the first address |
//! | status | the status code |
//! | custom fields | `"<field name> <value>"` for every custom field value |
//!
//! A query that is blank after trimming keeps every patient. Matching never
//! fails: absent parts are empty strings. Output order is input order.

use carebook_model::Patient;

/// The lowercased strings a patient is searched by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchText {
    /// First, middle and last name.
    pub name: String,
    /// City and state of the displayed address.
    pub address: String,
    /// Status code.
    pub status: String,
    /// Every custom field name and value.
    pub custom_fields: String,
}

impl SearchText {
    /// Derives the searchable strings of a patient.
    pub fn of(patient: &Patient) -> Self {
        let address = patient
            .display_address()
            .map(|a| format!("{} {}", a.city, a.state).to_lowercase())
            .unwrap_or_default();

        let custom_fields = patient
            .custom_field_values
            .iter()
            .map(|v| format!("{} {}", v.field_name, v.display_value()).to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            name: patient.full_name().to_lowercase(),
            address,
            status: patient.status.as_str().to_lowercase(),
            custom_fields,
        }
    }

    /// Returns true if any part contains the needle.
    ///
    /// The needle must already be lowercase.
    pub fn contains(&self, needle: &str) -> bool {
        self.name.contains(needle)
            || self.address.contains(needle)
            || self.status.contains(needle)
            || self.custom_fields.contains(needle)
    }
}

/// A compiled free-text query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientFilter {
    needle: Option<String>,
}

impl PatientFilter {
    /// Compiles a query. A blank query matches everything.
    pub fn new(query: &str) -> Self {
        let needle = (!query.trim().is_empty()).then(|| query.to_lowercase());
        Self { needle }
    }

    /// Returns true if the query keeps every patient.
    pub fn is_empty(&self) -> bool {
        self.needle.is_none()
    }

    /// Returns the normalized query, if any.
    pub fn needle(&self) -> Option<&str> {
        self.needle.as_deref()
    }

    /// Returns true if the patient matches.
    pub fn matches(&self, patient: &Patient) -> bool {
        match &self.needle {
            None => true,
            Some(needle) => SearchText::of(patient).contains(needle),
        }
    }

    /// Keeps the matching patients in their original order.
    pub fn apply<'a>(&self, patients: &'a [Patient]) -> Vec<&'a Patient> {
        patients.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Filters patients by a free-text query.
///
/// ```rust
/// use carebook_model::Patient;
/// use carebook_search::filter;
/// use chrono::NaiveDate;
///
/// let dob = NaiveDate::from_ymd_opt(1985, 3, 14).unwrap();
/// let patients = vec![
///     Patient::new(1, "Jane", "Doe", dob),
///     Patient::new(2, "John", "Roe", dob),
/// ];
///
/// let found = filter("jane doe", &patients);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].id.get(), 1);
/// assert_eq!(filter("  ", &patients).len(), 2);
/// ```
pub fn filter<'a>(query: &str, patients: &'a [Patient]) -> Vec<&'a Patient> {
    PatientFilter::new(query).apply(patients)
}
