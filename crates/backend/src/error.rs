//! Unified error handling for the backend.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// Application-level error type for the backend.
///
/// One variant per row of the error taxonomy; every handler failure funnels
/// through here so status codes are assigned in exactly one place.
#[derive(Debug, Error)]
pub enum AppError {
    /// No session, or the session no longer resolves to an account.
    #[error("Not authenticated")]
    Unauthenticated,

    /// Valid session, insufficient privilege.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Malformed input (empty field, short password, reserved name, ...).
    #[error("{0}")]
    Validation(String),

    /// Operation target absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The document store could not be reached.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(_) | StoreError::Rejected(_) => {
                Self::StoreUnavailable(e.to_string())
            }
            StoreError::DataCorruption(msg) => Self::Internal(msg),
        }
    }
}

/// JSON error body: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::StoreUnavailable(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Backend request error"
            );
        }

        let status = match &self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let detail = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::StoreUnavailable(_) => "Service temporarily unavailable".to_string(),
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}
