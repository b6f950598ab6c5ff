//! In-memory document store backend.
//!
//! Mirrors the Realtime Database semantics (`null`-free documents, top-level
//! merge on patch, silent delete of absent keys) without the network. The
//! test suite runs against this backend; it is also handy for local
//! development against no Firebase project.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{DocumentStore, StoreError};

/// In-process `{node}/{key}` map with store semantics.
#[derive(Default)]
pub struct MemoryStore {
    nodes: RwLock<BTreeMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, BTreeMap<String, BTreeMap<String, Value>>> {
        // A poisoned lock means a writer panicked; propagate the data anyway
        self.nodes
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, BTreeMap<String, Value>>> {
        self.nodes
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, node: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read().get(node).and_then(|docs| docs.get(key)).cloned())
    }

    async fn put(&self, node: &str, key: &str, value: Value) -> Result<(), StoreError> {
        self.write()
            .entry(node.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        Ok(())
    }

    async fn patch(&self, node: &str, key: &str, partial: Value) -> Result<(), StoreError> {
        let Value::Object(updates) = partial else {
            return Err(StoreError::DataCorruption(
                "patch payload must be an object".to_string(),
            ));
        };

        let mut nodes = self.write();
        let doc = nodes
            .entry(node.to_owned())
            .or_default()
            .entry(key.to_owned())
            .or_insert_with(|| Value::Object(serde_json::Map::new()));

        let Value::Object(fields) = doc else {
            return Err(StoreError::DataCorruption(format!(
                "document at {node}/{key} is not an object"
            )));
        };

        for (field, value) in updates {
            fields.insert(field, value);
        }
        Ok(())
    }

    async fn delete(&self, node: &str, key: &str) -> Result<(), StoreError> {
        if let Some(docs) = self.write().get_mut(node) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn list(&self, node: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        Ok(self.read().get(node).cloned().unwrap_or_default())
    }
}
