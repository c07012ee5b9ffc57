//! List queries over patients and custom field definitions.
//!
//! These apply the records API's list parameters to data already held in
//! memory, so a caller holding every page gets full-dataset results:
//!
//! | Parameter | Patients | Custom fields |
//! |-----------|----------|---------------|
//! | `search` | every term in first, middle or last name | every term in the name |
//! | `status` | exact status | n/a |
//! | `ordering` | `first_name`, `last_name`, `date_of_birth`, `status`, `created_at` (default `-created_at`) | `name`, `field_type`, `created_at` (default `name`) |
//!
//! Search terms are split on whitespace and commas and matched
//! case-insensitively. Sorting is stable, so ties keep their input order.

use std::cmp::Ordering;
use std::fmt;

use carebook_model::{CustomField, Page, Patient, PatientStatus};
use tracing::debug;

use crate::error::{QueryError, QueryResult};

/// The sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

/// A field a list can be ordered by.
pub trait OrderingField: Copy + PartialEq + fmt::Debug {
    /// The record type being ordered.
    type Item;

    /// Names accepted in an ordering expression.
    const ALLOWED: &'static [&'static str];

    /// Looks up a field by its wire name.
    fn from_name(name: &str) -> Option<Self>;

    /// Returns the wire name.
    fn name(self) -> &'static str;

    /// Compares two records by this field, ascending.
    fn compare(self, a: &Self::Item, b: &Self::Item) -> Ordering;

    /// The ordering used when none is requested.
    fn default_ordering() -> Vec<SortDirective<Self>>;
}

/// One term of an ordering expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortDirective<F> {
    /// The field to sort by.
    pub field: F,
    /// The sort direction.
    pub direction: SortDirection,
}

impl<F: OrderingField> SortDirective<F> {
    /// Creates an ascending directive.
    pub fn ascending(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending directive.
    pub fn descending(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Parses a term such as `last_name` or `-created_at`.
    pub fn parse(s: &str) -> QueryResult<Self> {
        let s = s.trim();
        let (name, direction) = match s.strip_prefix('-') {
            Some(stripped) => (stripped, SortDirection::Descending),
            None => (s, SortDirection::Ascending),
        };
        let field = F::from_name(name).ok_or_else(|| QueryError::UnknownOrderingField {
            field: name.to_string(),
            allowed: F::ALLOWED,
        })?;
        Ok(Self { field, direction })
    }

    /// Compares two records according to this directive.
    pub fn compare(&self, a: &F::Item, b: &F::Item) -> Ordering {
        let ordering = self.field.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl<F: OrderingField> fmt::Display for SortDirective<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "{}", self.field.name()),
            SortDirection::Descending => write!(f, "-{}", self.field.name()),
        }
    }
}

/// A comma-separated ordering expression, e.g. `last_name,-date_of_birth`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder<F> {
    directives: Vec<SortDirective<F>>,
}

impl<F: OrderingField> Default for SortOrder<F> {
    fn default() -> Self {
        Self {
            directives: F::default_ordering(),
        }
    }
}

impl<F: OrderingField> SortOrder<F> {
    /// Creates an ordering from directives. An empty list keeps input order.
    pub fn new(directives: Vec<SortDirective<F>>) -> Self {
        Self { directives }
    }

    /// Parses an ordering expression. Empty terms are skipped.
    pub fn parse(s: &str) -> QueryResult<Self> {
        let directives = s
            .split(',')
            .filter(|term| !term.trim().is_empty())
            .map(SortDirective::parse)
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Self { directives })
    }

    /// Returns the directives in priority order.
    pub fn directives(&self) -> &[SortDirective<F>] {
        &self.directives
    }

    /// Compares two records, consulting directives in turn until one differs.
    pub fn compare(&self, a: &F::Item, b: &F::Item) -> Ordering {
        self.directives
            .iter()
            .fold(Ordering::Equal, |acc, d| acc.then_with(|| d.compare(a, b)))
    }

    /// Sorts records in place. Ties keep their relative order.
    pub fn sort(&self, items: &mut [&F::Item]) {
        if self.directives.is_empty() {
            return;
        }
        items.sort_by(|a, b| self.compare(a, b));
    }
}

impl<F: OrderingField> fmt::Display for SortOrder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, directive) in self.directives.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", directive)?;
        }
        Ok(())
    }
}

/// Fields a patient list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatientOrderField {
    /// `first_name`
    FirstName,
    /// `last_name`
    LastName,
    /// `date_of_birth`
    DateOfBirth,
    /// `status`, compared by wire code
    Status,
    /// `created_at`
    CreatedAt,
}

impl OrderingField for PatientOrderField {
    type Item = Patient;

    const ALLOWED: &'static [&'static str] =
        &["first_name", "last_name", "date_of_birth", "status", "created_at"];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "first_name" => Some(Self::FirstName),
            "last_name" => Some(Self::LastName),
            "date_of_birth" => Some(Self::DateOfBirth),
            "status" => Some(Self::Status),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::DateOfBirth => "date_of_birth",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
        }
    }

    fn compare(self, a: &Patient, b: &Patient) -> Ordering {
        match self {
            Self::FirstName => a.first_name.cmp(&b.first_name),
            Self::LastName => a.last_name.cmp(&b.last_name),
            Self::DateOfBirth => a.date_of_birth.cmp(&b.date_of_birth),
            Self::Status => a.status.as_str().cmp(b.status.as_str()),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }

    fn default_ordering() -> Vec<SortDirective<Self>> {
        vec![SortDirective::descending(Self::CreatedAt)]
    }
}

/// Fields a custom field list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrderField {
    /// `name`
    Name,
    /// `field_type`, compared by wire code
    FieldType,
    /// `created_at`
    CreatedAt,
}

impl OrderingField for FieldOrderField {
    type Item = CustomField;

    const ALLOWED: &'static [&'static str] = &["name", "field_type", "created_at"];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(Self::Name),
            "field_type" => Some(Self::FieldType),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::FieldType => "field_type",
            Self::CreatedAt => "created_at",
        }
    }

    fn compare(self, a: &CustomField, b: &CustomField) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::FieldType => a.field_type.as_str().cmp(b.field_type.as_str()),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
        }
    }

    fn default_ordering() -> Vec<SortDirective<Self>> {
        vec![SortDirective::ascending(Self::Name)]
    }
}

/// Splits a search parameter into lowercase terms.
pub fn search_terms(search: &str) -> Vec<String> {
    search
        .replace('\0', "")
        .replace(',', " ")
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// One window of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct Matches<'a, T> {
    /// Number of records that matched before windowing.
    pub total: usize,
    /// The records in the requested window.
    pub items: Vec<&'a T>,
}

impl<T: Clone> Matches<'_, T> {
    /// Clones the window into a list page.
    pub fn into_page(self) -> Page<T> {
        Page::window(self.items.into_iter().cloned().collect(), self.total)
    }
}

fn window<'a, T>(items: Vec<&'a T>, offset: usize, limit: Option<usize>) -> Matches<'a, T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    Matches { total, items }
}

/// Parameters of a patient list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientQuery {
    /// Name search.
    pub search: Option<String>,
    /// Exact status.
    pub status: Option<PatientStatus>,
    /// Result ordering.
    pub ordering: SortOrder<PatientOrderField>,
    /// Records to skip.
    pub offset: usize,
    /// Maximum records to return.
    pub limit: Option<usize>,
}

impl PatientQuery {
    /// Creates a query that returns every patient, newest first.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name search.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restricts results to one status.
    pub fn with_status(mut self, status: PatientStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the ordering from an expression.
    pub fn with_ordering(mut self, ordering: &str) -> QueryResult<Self> {
        self.ordering = SortOrder::parse(ordering)?;
        Ok(self)
    }

    /// Sets the number of records to skip.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of records to return.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if the patient satisfies the search and status filters.
    pub fn matches(&self, patient: &Patient) -> bool {
        if self.status.is_some_and(|status| status != patient.status) {
            return false;
        }
        let terms = self.search.as_deref().map(search_terms).unwrap_or_default();
        terms_match(&terms, patient)
    }

    /// Filters, orders and windows the patients.
    pub fn apply<'a>(&self, patients: &'a [Patient]) -> Matches<'a, Patient> {
        let terms = self.search.as_deref().map(search_terms).unwrap_or_default();
        let mut matched: Vec<&Patient> = patients
            .iter()
            .filter(|p| self.status.is_none_or(|status| status == p.status))
            .filter(|p| terms_match(&terms, p))
            .collect();
        self.ordering.sort(&mut matched);

        let result = window(matched, self.offset, self.limit);
        debug!(
            search = ?self.search,
            status = ?self.status,
            ordering = %self.ordering,
            total = result.total,
            returned = result.items.len(),
            "Applied patient query"
        );
        result
    }
}

fn terms_match(terms: &[String], patient: &Patient) -> bool {
    let names = [
        patient.first_name.to_lowercase(),
        patient.middle_name.as_deref().unwrap_or_default().to_lowercase(),
        patient.last_name.to_lowercase(),
    ];
    terms
        .iter()
        .all(|term| names.iter().any(|name| name.contains(term.as_str())))
}

/// Parameters of a custom field list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldQuery {
    /// Name search.
    pub search: Option<String>,
    /// Result ordering.
    pub ordering: SortOrder<FieldOrderField>,
    /// Records to skip.
    pub offset: usize,
    /// Maximum records to return.
    pub limit: Option<usize>,
}

impl FieldQuery {
    /// Creates a query that returns every definition ordered by name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name search.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the ordering from an expression.
    pub fn with_ordering(mut self, ordering: &str) -> QueryResult<Self> {
        self.ordering = SortOrder::parse(ordering)?;
        Ok(self)
    }

    /// Sets the number of records to skip.
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum number of records to return.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Filters, orders and windows the definitions.
    pub fn apply<'a>(&self, fields: &'a [CustomField]) -> Matches<'a, CustomField> {
        let terms = self.search.as_deref().map(search_terms).unwrap_or_default();
        let mut matched: Vec<&CustomField> = fields
            .iter()
            .filter(|f| {
                let name = f.name.to_lowercase();
                terms.iter().all(|term| name.contains(term.as_str()))
            })
            .collect();
        self.ordering.sort(&mut matched);
        window(matched, self.offset, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebook_model::FieldType;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn patient(id: u64, first: &str, last: &str, status: PatientStatus, created_day: u32) -> Patient {
        let mut p = Patient::new(id, first, last, NaiveDate::from_ymd_opt(1980, 1, id as u32).unwrap());
        p.status = status;
        p.created_at = Some(Utc.with_ymd_and_hms(2024, 1, created_day, 9, 0, 0).unwrap());
        p
    }

    fn roster() -> Vec<Patient> {
        vec![
            patient(1, "Jane", "Doe", PatientStatus::Active, 1),
            patient(2, "John", "Smith", PatientStatus::Inquiry, 3),
            patient(3, "Janet", "Smithson", PatientStatus::Active, 2),
        ]
    }

    fn ids(matches: &Matches<'_, Patient>) -> Vec<u64> {
        matches.items.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_sort_directive_parse() {
        let asc = SortDirective::<PatientOrderField>::parse("last_name").unwrap();
        assert_eq!(asc.field, PatientOrderField::LastName);
        assert_eq!(asc.direction, SortDirection::Ascending);

        let desc = SortDirective::<PatientOrderField>::parse("-date_of_birth").unwrap();
        assert_eq!(desc.field, PatientOrderField::DateOfBirth);
        assert_eq!(desc.direction, SortDirection::Descending);
        assert_eq!(desc.to_string(), "-date_of_birth");
    }

    #[test]
    fn test_unknown_ordering_field() {
        let err = SortOrder::<PatientOrderField>::parse("last_name,-zip").unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot order by 'zip': expected one of first_name, last_name, date_of_birth, status, created_at"
        );
    }

    #[test]
    fn test_default_ordering_is_newest_first() {
        assert_eq!(SortOrder::<PatientOrderField>::default().to_string(), "-created_at");
        assert_eq!(ids(&PatientQuery::new().apply(&roster())), vec![2, 3, 1]);
    }

    #[test]
    fn test_multi_key_ordering() {
        let query = PatientQuery::new().with_ordering("status,-first_name").unwrap();
        assert_eq!(ids(&query.apply(&roster())), vec![3, 1, 2]);
    }

    #[test]
    fn test_empty_ordering_keeps_input_order() {
        let query = PatientQuery::new().with_ordering("").unwrap();
        assert_eq!(ids(&query.apply(&roster())), vec![1, 2, 3]);
    }

    #[test]
    fn test_search_terms_split() {
        assert_eq!(search_terms(" Jane,DOE  x"), vec!["jane", "doe", "x"]);
        assert!(search_terms("  ").is_empty());
    }

    #[test]
    fn test_every_term_must_match_a_name() {
        let roster = roster();
        let query = PatientQuery::new().with_search("jan smith").with_ordering("").unwrap();
        assert_eq!(ids(&query.apply(&roster)), vec![3]);

        let query = PatientQuery::new().with_search("active");
        assert!(query.apply(&roster).items.is_empty());
    }

    #[test]
    fn test_status_filter() {
        let roster = roster();
        let query = PatientQuery::new().with_status(PatientStatus::Active);
        assert_eq!(ids(&query.apply(&roster)), vec![3, 1]);
        assert!(query.matches(&roster[0]));
        assert!(!query.matches(&roster[1]));
    }

    #[test]
    fn test_window() {
        let roster = roster();
        let query = PatientQuery::new().with_offset(1).with_limit(1);
        let result = query.apply(&roster);
        assert_eq!(result.total, 3);
        assert_eq!(ids(&result), vec![3]);

        let page = result.into_page();
        assert_eq!(page.count, 3);
        assert_eq!(page.results.len(), 1);
        assert!(page.has_more());
    }

    #[test]
    fn test_field_query() {
        let fields = vec![
            CustomField::new(1, "Weight", FieldType::Number),
            CustomField::new(2, "Referral source", FieldType::Text),
            CustomField::new(3, "Referral date", FieldType::Date),
        ];

        let names = |m: Matches<'_, CustomField>| m.items.iter().map(|f| f.name.clone()).collect::<Vec<_>>();

        assert_eq!(
            names(FieldQuery::new().apply(&fields)),
            vec!["Referral date", "Referral source", "Weight"]
        );
        assert_eq!(
            names(FieldQuery::new().with_search("REFERRAL").with_ordering("-field_type").unwrap().apply(&fields)),
            vec!["Referral source", "Referral date"]
        );
    }
}
