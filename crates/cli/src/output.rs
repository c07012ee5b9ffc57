//! Text rendering of command results.

use std::fmt;

use carebook_model::{CustomField, CustomFieldValue, Patient, ValidationErrors};
use carebook_search::Dashboard;
use chrono::NaiveDate;

fn location(patient: &Patient) -> String {
    match patient.display_address() {
        Some(address) => [address.city.trim(), address.state.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        None => "-".to_string(),
    }
}

/// A table of patients with a match count footer.
pub struct PatientTable<'a> {
    patients: &'a [&'a Patient],
    listed: usize,
}

impl<'a> PatientTable<'a> {
    /// Renders `patients` out of `listed` candidates.
    pub fn new(patients: &'a [&'a Patient], listed: usize) -> Self {
        Self { patients, listed }
    }
}

impl fmt::Display for PatientTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.patients.is_empty() {
            writeln!(f, "No patients found")?;
        } else {
            writeln!(f, "{:<6} {:<30} {:<11} {}", "ID", "NAME", "STATUS", "LOCATION")?;
            for patient in self.patients {
                writeln!(
                    f,
                    "{:<6} {:<30} {:<11} {}",
                    patient.id,
                    patient.full_name(),
                    patient.status.label(),
                    location(patient)
                )?;
            }
        }
        writeln!(f, "{} of {} patients", self.patients.len(), self.listed)
    }
}

/// Dashboard counts followed by the recent patients.
pub struct DashboardView<'a> {
    dashboard: &'a Dashboard<'a>,
    searching: bool,
}

impl<'a> DashboardView<'a> {
    /// Renders `dashboard`. When `searching`, the recent list is labelled as
    /// filtered.
    pub fn new(dashboard: &'a Dashboard<'a>, searching: bool) -> Self {
        Self {
            dashboard,
            searching,
        }
    }
}

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.dashboard.stats;
        writeln!(f, "{:<16} {}", "Total patients", stats.total_patients)?;
        writeln!(f, "{:<16} {}", "Active", stats.active_patients)?;
        writeln!(f, "{:<16} {}", "Inquiry", stats.inquiry_patients)?;
        writeln!(f, "{:<16} {}", "Onboarding", stats.onboarding_patients)?;
        writeln!(f, "{:<16} {}", "Churned", stats.churned_patients)?;
        writeln!(f)?;

        if self.searching {
            writeln!(f, "Recent patients matching search")?;
        } else {
            writeln!(f, "Recent patients")?;
        }
        write!(
            f,
            "{}",
            PatientTable::new(&self.dashboard.matches, self.dashboard.recent.len())
        )
    }
}

/// Full details of one patient.
pub struct PatientDetail<'a> {
    patient: &'a Patient,
    today: NaiveDate,
}

impl<'a> PatientDetail<'a> {
    /// Renders `patient`, computing the age as of `today`.
    pub fn new(patient: &'a Patient, today: NaiveDate) -> Self {
        Self { patient, today }
    }
}

impl fmt::Display for PatientDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patient = self.patient;
        writeln!(f, "{} (#{})", patient.full_name(), patient.id)?;
        writeln!(f, "{:<15} {}", "Status:", patient.status.label())?;
        match patient.age_on(self.today) {
            Some(age) => writeln!(
                f,
                "{:<15} {} (age {})",
                "Date of birth:",
                patient.date_of_birth.format("%Y-%m-%d"),
                age
            )?,
            None => writeln!(
                f,
                "{:<15} {}",
                "Date of birth:",
                patient.date_of_birth.format("%Y-%m-%d")
            )?,
        }
        if let Some(created_at) = patient.created_at {
            writeln!(f, "{:<15} {}", "Created:", created_at.format("%Y-%m-%d %H:%M UTC"))?;
        }

        writeln!(f)?;
        writeln!(f, "Addresses")?;
        if patient.addresses.is_empty() {
            writeln!(f, "  none")?;
        }
        for address in &patient.addresses {
            let marker = if address.is_primary { "*" } else { " " };
            writeln!(f, "  {} {} {}", marker, address.one_line(), address.postal_code)?;
        }

        writeln!(f)?;
        writeln!(f, "Custom fields")?;
        if patient.custom_field_values.is_empty() {
            writeln!(f, "  none")?;
        }
        for value in &patient.custom_field_values {
            writeln!(f, "  {}: {}", value.field_name, value.display_value())?;
        }
        Ok(())
    }
}

/// A table of custom field definitions.
pub struct FieldTable<'a> {
    fields: &'a [CustomField],
}

impl<'a> FieldTable<'a> {
    /// Renders `fields`.
    pub fn new(fields: &'a [CustomField]) -> Self {
        Self { fields }
    }
}

impl fmt::Display for FieldTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fields.is_empty() {
            return writeln!(f, "No custom fields defined");
        }
        writeln!(f, "{:<6} {:<30} {:<8} {}", "ID", "NAME", "TYPE", "REQUIRED")?;
        for field in self.fields {
            writeln!(
                f,
                "{:<6} {:<30} {:<8} {}",
                field.id,
                field.name,
                field.field_type.label(),
                if field.is_required { "yes" } else { "no" }
            )?;
        }
        Ok(())
    }
}

/// Every value recorded for one custom field.
pub struct ValueList<'a> {
    field: &'a CustomField,
    values: &'a [CustomFieldValue],
}

impl<'a> ValueList<'a> {
    /// Renders `values` under `field`.
    pub fn new(field: &'a CustomField, values: &'a [CustomFieldValue]) -> Self {
        Self { field, values }
    }
}

impl fmt::Display for ValueList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.field.name, self.field.field_type.label())?;
        for value in self.values {
            writeln!(f, "  {}", value.display_value())?;
        }
        writeln!(f, "{} values", self.values.len())
    }
}

/// The outcome of validating a draft.
pub struct ValidationReport<'a> {
    errors: Option<&'a ValidationErrors>,
}

impl<'a> ValidationReport<'a> {
    /// Renders the validation outcome; `None` means the draft is valid.
    pub fn new(errors: Option<&'a ValidationErrors>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for ValidationReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(errors) = self.errors else {
            return writeln!(f, "Draft is valid");
        };
        writeln!(f, "Draft has {} problem(s):", errors.issues().len())?;
        for issue in errors.issues() {
            writeln!(f, "  - {}", issue)?;
        }
        Ok(())
    }
}
