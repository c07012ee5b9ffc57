//! Error types for patient record sources.

use std::path::PathBuf;

use carebook_model::{CustomFieldId, ModelError, PatientId, ValidationErrors};
use carebook_search::QueryError;
use thiserror::Error;

/// The primary error type for source operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No patient with the given ID.
    #[error("patient not found: {id}")]
    PatientNotFound {
        /// The requested ID.
        id: PatientId,
    },

    /// No custom field definition with the given ID.
    #[error("custom field not found: {id}")]
    CustomFieldNotFound {
        /// The requested ID.
        id: CustomFieldId,
    },

    /// A snapshot file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A payload or draft was rejected by the model layer.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A list query was malformed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<ValidationErrors> for StoreError {
    fn from(errors: ValidationErrors) -> Self {
        StoreError::Model(ModelError::Validation(errors))
    }
}

impl StoreError {
    /// Returns true for the not-found variants.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StoreError::PatientNotFound { .. } | StoreError::CustomFieldNotFound { .. }
        )
    }

    /// Returns the validation issues if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            StoreError::Model(ModelError::Validation(errors)) => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias for source operations.
pub type StoreResult<T> = Result<T, StoreError>;
