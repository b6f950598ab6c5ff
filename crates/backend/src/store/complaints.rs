//! Complaint repository.
//!
//! Persists [`ComplaintRecord`]s under the `complaints` node, keyed by
//! tracking id.

use careline_core::ComplaintId;

use crate::models::complaint::{Complaint, ComplaintRecord};

use super::{DocumentStore, StoreError};

/// Store node holding complaints.
const NODE: &str = "complaints";

/// Repository for complaint store operations.
pub struct ComplaintRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ComplaintRepository<'a> {
    /// Create a new complaint repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Get a complaint by tracking id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    /// Returns `StoreError::DataCorruption` if the stored value is invalid.
    pub async fn get(&self, id: &ComplaintId) -> Result<Option<Complaint>, StoreError> {
        let value = self.store.get(NODE, id.as_str()).await?;
        value.map(|v| decode_record(id.as_str(), v)).transpose()
    }

    /// Create or fully overwrite a complaint.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    pub async fn set(&self, id: &ComplaintId, record: &ComplaintRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)
            .map_err(|e| StoreError::DataCorruption(e.to_string()))?;
        self.store.put(NODE, id.as_str(), value).await
    }

    /// Delete a complaint. Deleting an absent id is a no-op; callers that
    /// need a not-found distinction check existence first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    pub async fn delete(&self, id: &ComplaintId) -> Result<(), StoreError> {
        self.store.delete(NODE, id.as_str()).await
    }

    /// List all complaints, ordered by tracking id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    /// Returns `StoreError::DataCorruption` if any stored value is invalid.
    pub async fn list(&self) -> Result<Vec<Complaint>, StoreError> {
        let docs = self.store.list(NODE).await?;
        docs.into_iter()
            .map(|(key, value)| decode_record(&key, value))
            .collect()
    }
}

/// Decode a stored value into a domain complaint, reuniting it with its key.
fn decode_record(key: &str, value: serde_json::Value) -> Result<Complaint, StoreError> {
    let id = ComplaintId::parse(key)
        .map_err(|e| StoreError::DataCorruption(format!("invalid complaint key {key:?}: {e}")))?;
    let record: ComplaintRecord = serde_json::from_value(value).map_err(|e| {
        StoreError::DataCorruption(format!("invalid complaint record for {key:?}: {e}"))
    })?;
    Ok(Complaint { id, record })
}
