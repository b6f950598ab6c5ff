//! HTTP route handlers for the backend.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                       - Liveness check
//! GET  /health/ready                 - Readiness check (store round-trip)
//!
//! # Auth
//! POST /login                        - Form login, sets session cookie
//! GET  /logout                       - Clear session cookie
//!
//! # Patient-facing complaint intake
//! POST /web/submit                   - Submit a complaint, returns tracking id
//! POST /web/track                    - Look up a complaint by tracking id
//!
//! # Triage dashboard (session required)
//! GET    /api/complaints             - List complaints
//! PUT    /api/complaints/{id}        - Update status and admin comment
//! DELETE /api/complaints/{id}        - Remove a complaint
//!
//! # Admin roster (super admin only unless noted)
//! GET    /api/admins                 - List admin accounts
//! POST   /api/admins                 - Create admin account
//! DELETE /api/admins/{username}      - Remove admin account
//! PUT    /api/admins/update-password - Change own password (session)
//! GET    /api/admins/check-super     - Report own role (session)
//! ```

pub mod admins;
pub mod auth;
pub mod complaints;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

/// Build the full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(auth::router())
        .merge(admins::router())
        .merge(complaints::router())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies store connectivity before returning OK.
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().list("admins").await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
