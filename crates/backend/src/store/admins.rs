//! Admin account repository.
//!
//! Persists [`AdminRecord`]s under the `admins` node, keyed by username.

use serde_json::Value;

use careline_core::Username;

use crate::models::admin::{AdminAccount, AdminRecord};

use super::{DocumentStore, StoreError};

/// Store node holding admin accounts.
const NODE: &str = "admins";

/// Repository for admin account store operations.
pub struct AdminRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Get an admin account by username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    /// Returns `StoreError::DataCorruption` if the stored value is invalid.
    pub async fn get(&self, username: &Username) -> Result<Option<AdminAccount>, StoreError> {
        let value = self.store.get(NODE, username.as_str()).await?;
        value
            .map(|v| decode_record(username.as_str(), v))
            .transpose()
    }

    /// Create or fully overwrite an admin account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    pub async fn set(&self, username: &Username, record: &AdminRecord) -> Result<(), StoreError> {
        let value = serde_json::to_value(record)
            .map_err(|e| StoreError::DataCorruption(e.to_string()))?;
        self.store.put(NODE, username.as_str(), value).await
    }

    /// Merge fields into an existing admin account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    pub async fn update(&self, username: &Username, partial: Value) -> Result<(), StoreError> {
        self.store.patch(NODE, username.as_str(), partial).await
    }

    /// Delete an admin account. Deleting an absent username is a no-op;
    /// callers that need a not-found distinction check existence first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    pub async fn delete(&self, username: &Username) -> Result<(), StoreError> {
        self.store.delete(NODE, username.as_str()).await
    }

    /// List all admin accounts, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable`/`Rejected` if the store call fails.
    /// Returns `StoreError::DataCorruption` if any stored value is invalid.
    pub async fn list(&self) -> Result<Vec<AdminAccount>, StoreError> {
        let docs = self.store.list(NODE).await?;
        docs.into_iter()
            .map(|(key, value)| decode_record(&key, value))
            .collect()
    }
}

/// Decode a stored value into a domain account, reuniting it with its key.
fn decode_record(key: &str, value: Value) -> Result<AdminAccount, StoreError> {
    let username = Username::parse(key)
        .map_err(|e| StoreError::DataCorruption(format!("invalid username key {key:?}: {e}")))?;
    let record: AdminRecord = serde_json::from_value(value)
        .map_err(|e| StoreError::DataCorruption(format!("invalid admin record for {key:?}: {e}")))?;
    Ok(AdminAccount { username, record })
}
