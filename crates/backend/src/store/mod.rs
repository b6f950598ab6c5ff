//! Document store access for the Careline backend.
//!
//! Persistence is a remote real-time document store addressed as
//! `{node}/{key}` paths holding JSON values. The [`DocumentStore`] trait
//! keeps the rest of the backend independent of the wire protocol:
//!
//! - [`FirebaseStore`] - Firebase Realtime Database over its REST API
//! - [`MemoryStore`] - in-process map with the same semantics, for tests
//!   and local development
//!
//! Typed repositories ([`AdminRepository`], [`ComplaintRepository`]) sit on
//! top of the trait and convert between stored records and domain types.

pub mod admins;
pub mod complaints;
pub mod firebase;
pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use admins::AdminRepository;
pub use complaints::ComplaintRepository;
pub use firebase::FirebaseStore;
pub use memory::MemoryStore;

/// Errors that can occur during document store operations.
///
/// Absence of a document is not an error; reads return `Option`. An
/// unreachable store is [`StoreError::Unavailable`] and must surface to the
/// caller as a service-unavailable condition, never as "not found".
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached (connectivity, timeout, DNS).
    #[error("store unreachable: {0}")]
    Unavailable(String),

    /// The store answered with a non-success status.
    #[error("store rejected request: status {0}")]
    Rejected(u16),

    /// Data in the store is corrupted or does not match the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        // Body decode failures are data problems; everything else means the
        // round-trip itself failed.
        if e.is_decode() {
            Self::DataCorruption(e.to_string())
        } else {
            Self::Unavailable(e.to_string())
        }
    }
}

/// A JSON document store addressed by `{node}/{key}`.
///
/// Single-key mutations are atomic and read-your-writes: a `get` issued
/// after a completed `put`/`patch`/`delete` for the same key observes the
/// mutation.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the document at `{node}/{key}`, or `None` if absent.
    async fn get(&self, node: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Create or fully overwrite the document at `{node}/{key}`.
    async fn put(&self, node: &str, key: &str, value: Value) -> Result<(), StoreError>;

    /// Merge `partial`'s top-level fields into the document at `{node}/{key}`.
    async fn patch(&self, node: &str, key: &str, partial: Value) -> Result<(), StoreError>;

    /// Delete the document at `{node}/{key}`. Deleting an absent key is a
    /// no-op.
    async fn delete(&self, node: &str, key: &str) -> Result<(), StoreError>;

    /// List all documents under `node`, keyed by their store key.
    async fn list(&self, node: &str) -> Result<BTreeMap<String, Value>, StoreError>;
}
