//! Firebase Realtime Database client.
//!
//! Speaks the RTDB REST surface: every document lives at
//! `{base}/{node}/{key}.json` and answers to `GET`/`PUT`/`PATCH`/`DELETE`.
//! A JSON `null` body on `GET` means the path holds nothing.
//!
//! # API Reference
//!
//! - Path format: `https://<db>.firebaseio.com/<node>/<key>.json`
//! - Authentication: database secret or access token via the `auth` query
//!   parameter (optional against open rules or the local emulator)

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use url::Url;

use crate::config::FirebaseConfig;

use super::{DocumentStore, StoreError};

/// Timeout for a single store round-trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Firebase Realtime Database REST client.
#[derive(Clone)]
pub struct FirebaseStore {
    client: reqwest::Client,
    base_url: Url,
    auth_token: Option<SecretString>,
}

impl FirebaseStore {
    /// Create a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if the HTTP client fails to
    /// build.
    pub fn new(config: &FirebaseConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.database_url.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    /// Build the REST URL for a path under the database root.
    ///
    /// `segments` become path components; the final component gets the
    /// `.json` suffix the REST API requires.
    fn url_for(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();

        {
            let mut path = url.path_segments_mut().map_err(|()| {
                StoreError::DataCorruption("database URL cannot be a base".to_string())
            })?;
            // Drop a trailing empty segment so configured URLs may end in "/"
            path.pop_if_empty();
            for (i, segment) in segments.iter().enumerate() {
                if i == segments.len() - 1 {
                    path.push(&format!("{segment}.json"));
                } else {
                    path.push(segment);
                }
            }
        }

        if let Some(token) = &self.auth_token {
            url.query_pairs_mut()
                .append_pair("auth", token.expose_secret());
        }

        Ok(url)
    }

    /// Execute a request and map transport/status failures into
    /// [`StoreError`].
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected(status.as_u16()));
        }
        let value = response.json::<Value>().await?;
        Ok(value)
    }
}

#[async_trait]
impl DocumentStore for FirebaseStore {
    async fn get(&self, node: &str, key: &str) -> Result<Option<Value>, StoreError> {
        let url = self.url_for(&[node, key])?;
        let value = self.send(self.client.get(url)).await?;
        Ok(match value {
            Value::Null => None,
            other => Some(other),
        })
    }

    async fn put(&self, node: &str, key: &str, value: Value) -> Result<(), StoreError> {
        let url = self.url_for(&[node, key])?;
        self.send(self.client.put(url).json(&value)).await?;
        Ok(())
    }

    async fn patch(&self, node: &str, key: &str, partial: Value) -> Result<(), StoreError> {
        let url = self.url_for(&[node, key])?;
        self.send(self.client.patch(url).json(&partial)).await?;
        Ok(())
    }

    async fn delete(&self, node: &str, key: &str) -> Result<(), StoreError> {
        let url = self.url_for(&[node, key])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    async fn list(&self, node: &str) -> Result<BTreeMap<String, Value>, StoreError> {
        let url = self.url_for(&[node])?;
        let value = self.send(self.client.get(url)).await?;
        match value {
            // An empty node reads back as null
            Value::Null => Ok(BTreeMap::new()),
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(StoreError::DataCorruption(format!(
                "expected an object under {node:?}, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store(base: &str, token: Option<&str>) -> FirebaseStore {
        FirebaseStore::new(&FirebaseConfig {
            database_url: Url::parse(base).unwrap(),
            auth_token: token.map(SecretString::from),
        })
        .unwrap()
    }

    #[test]
    fn test_url_for_document() {
        let store = store("https://careline-test.firebaseio.com", None);
        let url = store.url_for(&["admins", "alice"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://careline-test.firebaseio.com/admins/alice.json"
        );
    }

    #[test]
    fn test_url_for_node_listing() {
        let store = store("https://careline-test.firebaseio.com", None);
        let url = store.url_for(&["complaints"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://careline-test.firebaseio.com/complaints.json"
        );
    }

    #[test]
    fn test_url_for_appends_auth_token() {
        let store = store("https://careline-test.firebaseio.com", Some("tkn"));
        let url = store.url_for(&["admins", "alice"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://careline-test.firebaseio.com/admins/alice.json?auth=tkn"
        );
    }

    #[test]
    fn test_url_for_tolerates_trailing_slash() {
        let store = store("https://careline-test.firebaseio.com/", None);
        let url = store.url_for(&["admins", "alice"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://careline-test.firebaseio.com/admins/alice.json"
        );
    }
}
