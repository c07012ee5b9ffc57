//! Read-only store backed by exported API payloads.
//!
//! A snapshot directory holds `patients.json` and `custom-fields.json`, each
//! either the paginated list envelope or a bare array. A missing file is
//! treated as an empty collection.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use carebook_model::{
    CustomField, CustomFieldId, CustomFieldValue, Page, Patient, PatientId,
};
use carebook_search::{FieldQuery, PatientQuery};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::memory::MemoryStore;
use crate::source::PatientSource;

/// File name of the patient list payload.
pub const PATIENTS_FILE: &str = "patients.json";

/// File name of the custom field definition list payload.
pub const CUSTOM_FIELDS_FILE: &str = "custom-fields.json";

/// A read-only [`PatientSource`] loaded from a snapshot directory.
#[derive(Debug)]
pub struct SnapshotStore {
    dir: PathBuf,
    inner: MemoryStore,
}

impl SnapshotStore {
    /// Loads the snapshot in `dir`.
    ///
    /// # Errors
    ///
    /// * `StoreError::Io` - If a file exists but cannot be read
    /// * `StoreError::Model(Decode)` - If a payload is not valid JSON or holds
    ///   a malformed record
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        let patients: Vec<Patient> = read_list(&dir.join(PATIENTS_FILE)).await?;
        let fields: Vec<CustomField> = read_list(&dir.join(CUSTOM_FIELDS_FILE)).await?;

        info!(
            dir = %dir.display(),
            patients = patients.len(),
            custom_fields = fields.len(),
            "Loaded snapshot"
        );

        Ok(Self {
            dir,
            inner: MemoryStore::with_data(patients, fields),
        })
    }

    /// Returns the snapshot directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the loaded records.
    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    /// Converts into a writable in-memory store holding the same records.
    pub fn into_memory(self) -> MemoryStore {
        self.inner
    }
}

async fn read_list<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => {
            let page = Page::<T>::from_json(&text)?;
            if page.has_more() {
                warn!(
                    path = %path.display(),
                    count = page.count,
                    loaded = page.results.len(),
                    "Snapshot holds only one page of results"
                );
            }
            Ok(page.into_results())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Snapshot file missing, treating as empty");
            Ok(Vec::new())
        }
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[async_trait]
impl PatientSource for SnapshotStore {
    fn source_name(&self) -> &'static str {
        "snapshot"
    }

    async fn list_patients(&self, query: &PatientQuery) -> StoreResult<Page<Patient>> {
        self.inner.list_patients(query).await
    }

    async fn get_patient(&self, id: PatientId) -> StoreResult<Patient> {
        self.inner.get_patient(id).await
    }

    async fn list_custom_fields(&self, query: &FieldQuery) -> StoreResult<Page<CustomField>> {
        self.inner.list_custom_fields(query).await
    }

    async fn get_custom_field(&self, id: CustomFieldId) -> StoreResult<CustomField> {
        self.inner.get_custom_field(id).await
    }

    async fn custom_field_values(&self, id: CustomFieldId) -> StoreResult<Vec<CustomFieldValue>> {
        self.inner.custom_field_values(id).await
    }
}
