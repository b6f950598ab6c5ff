//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use secrecy::ExposeSecret;

use crate::config::BackendConfig;
use crate::services::accounts::AccountService;
use crate::store::{AdminRepository, ComplaintRepository, DocumentStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the document store handle, and the session signing key.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BackendConfig,
    store: Arc<dyn DocumentStore>,
    signing_key: Key,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The session signing key is derived from the configured session
    /// secret.
    ///
    /// # Panics
    ///
    /// Panics if the session secret is shorter than 32 bytes; the config
    /// loader enforces that minimum before state construction.
    #[must_use]
    pub fn new(config: BackendConfig, store: Arc<dyn DocumentStore>) -> Self {
        let signing_key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                signing_key,
            }),
        }
    }

    /// Get a reference to the backend configuration.
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.inner.config
    }

    /// Get a reference to the document store.
    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Admin account repository over the shared store.
    #[must_use]
    pub fn admins(&self) -> AdminRepository<'_> {
        AdminRepository::new(self.store())
    }

    /// Complaint repository over the shared store.
    #[must_use]
    pub fn complaints(&self) -> ComplaintRepository<'_> {
        ComplaintRepository::new(self.store())
    }

    /// Account lifecycle service over the shared store and configuration.
    #[must_use]
    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(self.admins(), &self.inner.config.super_admin)
    }
}

// Let SignedCookieJar extract its key from the shared state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.inner.signing_key.clone()
    }
}
