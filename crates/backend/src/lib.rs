//! Careline backend library.
//!
//! This crate provides the complaint intake and admin triage backend as a
//! library, allowing it to be tested and reused. The binary in `main.rs` is
//! a thin wrapper that loads configuration and serves [`app`].
//!
//! # Architecture
//!
//! - Axum web framework
//! - Firebase Realtime Database (REST) for persistence
//! - Signed session cookies (no server-side session state)
//! - Argon2id password hashing for admin accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

use axum::Router;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::state::AppState;

/// Build the application with its middleware stack.
///
/// Everything except the Sentry layers, which the binary adds outermost.
#[must_use]
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record("latency_ms", latency.as_millis() as u64);
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}
