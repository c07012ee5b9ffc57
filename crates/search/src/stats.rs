//! Dashboard statistics.

use carebook_model::{Patient, PatientStatus};
use serde::Serialize;

use crate::filter::PatientFilter;

/// Number of recent patients shown on the dashboard.
pub const DEFAULT_RECENT: usize = 5;

/// Patient counts by lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Every patient counted.
    pub total_patients: usize,
    /// Patients with status Active.
    pub active_patients: usize,
    /// Patients with status Inquiry.
    pub inquiry_patients: usize,
    /// Patients with status Onboarding.
    pub onboarding_patients: usize,
    /// Patients with status Churned.
    pub churned_patients: usize,
}

impl DashboardStats {
    /// Counts the given patients.
    pub fn from_patients<'a>(patients: impl IntoIterator<Item = &'a Patient>) -> Self {
        patients.into_iter().fold(Self::default(), |mut stats, patient| {
            stats.total_patients += 1;
            match patient.status {
                PatientStatus::Active => stats.active_patients += 1,
                PatientStatus::Inquiry => stats.inquiry_patients += 1,
                PatientStatus::Onboarding => stats.onboarding_patients += 1,
                PatientStatus::Churned => stats.churned_patients += 1,
            }
            stats
        })
    }

    /// Returns the count for one status.
    pub fn count(&self, status: PatientStatus) -> usize {
        match status {
            PatientStatus::Active => self.active_patients,
            PatientStatus::Inquiry => self.inquiry_patients,
            PatientStatus::Onboarding => self.onboarding_patients,
            PatientStatus::Churned => self.churned_patients,
        }
    }
}

/// What the dashboard shows: counts, the most recent patients, and the
/// recent patients matching the search box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard<'a> {
    /// Counts over every patient supplied.
    pub stats: DashboardStats,
    /// The first patients in list order (the API lists newest first).
    pub recent: &'a [Patient],
    /// Recent patients matching the query.
    pub matches: Vec<&'a Patient>,
}

impl<'a> Dashboard<'a> {
    /// Builds the dashboard from a newest-first patient list.
    pub fn build(patients: &'a [Patient], recent: usize, query: &str) -> Self {
        let recent = &patients[..recent.min(patients.len())];
        Self {
            stats: DashboardStats::from_patients(patients),
            recent,
            matches: PatientFilter::new(query).apply(recent),
        }
    }
}
