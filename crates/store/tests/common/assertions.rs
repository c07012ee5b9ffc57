//! Assertion helpers for store results.

#![allow(dead_code)]

use carebook_model::Patient;
use carebook_store::StoreError;

/// Asserts that an error is a validation failure reporting the given field.
///
/// # Panics
///
/// Panics if the error is of another kind or the field is not reported.
pub fn assert_validation_issue(err: &StoreError, field: &str) {
    let errors = err
        .validation_errors()
        .unwrap_or_else(|| panic!("expected validation failure, got {:?}", err));
    assert!(
        errors.has_field(field),
        "Expected an issue for '{}', got: {}",
        field,
        errors
    );
}

/// Asserts that patients appear with the given IDs, in order.
pub fn assert_patient_ids(patients: &[Patient], expected: &[u64]) {
    let actual: Vec<u64> = patients.iter().map(|p| p.id.get()).collect();
    assert_eq!(
        actual, expected,
        "Patient order mismatch: expected {:?}, got {:?}",
        expected, actual
    );
}
