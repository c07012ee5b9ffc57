//! Error types for the model layer.
//!
//! Decoding, enum parsing and draft validation all report through
//! [`ModelError`]. Validation collects every problem it finds into a
//! [`ValidationErrors`] value instead of stopping at the first one.

use std::fmt;

use thiserror::Error;

use crate::custom_field::FieldType;
use crate::patient::PatientStatus;

/// The primary error type for model operations.
#[derive(Error, Debug)]
pub enum ModelError {
    /// A status value that is not one of the known lifecycle states.
    #[error("invalid status '{value}': status must be one of: {}", PatientStatus::valid_values())]
    InvalidStatus {
        /// The rejected input.
        value: String,
    },

    /// A custom field type that is not TEXT, NUMBER or DATE.
    #[error("invalid field type '{value}': field type must be one of: {}", FieldType::valid_values())]
    InvalidFieldType {
        /// The rejected input.
        value: String,
    },

    /// The payload could not be decoded.
    #[error("failed to decode payload: {0}")]
    Decode(#[from] serde_json::Error),

    /// A draft failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

/// Result type alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// A single validation problem, located by a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path of the offending field, e.g. `addresses.0.city`.
    pub field: String,
    /// Human readable message.
    pub message: String,
}

impl ValidationIssue {
    /// Creates a new issue.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every issue found while validating a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<ValidationIssue>,
}

impl ValidationErrors {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(field, message));
    }

    /// Returns the recorded issues in the order they were found.
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Returns true if no issue was recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns true if an issue was recorded for the given field path.
    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// Converts the collection into a result, `Ok` when empty.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
