//! Shared helpers for backend API tests.
//!
//! Tests drive the real router over the in-memory store backend, so the
//! suite needs no running server and no Firebase project.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use tower::ServiceExt;
use url::Url;

use careline_backend::app;
use careline_backend::config::{BackendConfig, FirebaseConfig, SuperAdminConfig};
use careline_backend::state::AppState;
use careline_backend::store::{DocumentStore, MemoryStore};
use careline_core::Username;

/// Reserved super-admin credentials used throughout the tests.
pub const SUPER_USERNAME: &str = "root";
pub const SUPER_PASSWORD: &str = "Openforme";

/// Build an application over a fresh in-memory store, bootstrap included.
pub async fn test_app() -> Router {
    test_app_over(Arc::new(MemoryStore::new())).await
}

/// Build an application over the given store backend, bootstrap included.
pub async fn test_app_over(store: Arc<dyn DocumentStore>) -> Router {
    let config = BackendConfig {
        firebase: FirebaseConfig {
            database_url: Url::parse("https://careline-test.firebaseio.com")
                .expect("valid test url"),
            auth_token: None,
        },
        host: "127.0.0.1".parse().expect("valid host"),
        port: 8000,
        base_url: "http://127.0.0.1:8000".to_string(),
        session_secret: SecretString::from("k".repeat(64)),
        super_admin: SuperAdminConfig {
            username: Username::parse(SUPER_USERNAME).expect("valid username"),
            password: SecretString::from(SUPER_PASSWORD),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 1.0,
    };

    let state = AppState::new(config, store);
    state
        .accounts()
        .bootstrap()
        .await
        .expect("bootstrap against an in-memory store cannot fail");

    app(state)
}

/// Log in through the real endpoint and return the session cookie
/// (`name=value`) to send back on later requests.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .expect("valid request"),
        )
        .await
        .expect("infallible");

    assert_eq!(response.status(), StatusCode::SEE_OTHER, "login should succeed");
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/admin")
    );

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("login should set a session cookie");

    set_cookie
        .split(';')
        .next()
        .expect("cookie header has a name=value part")
        .to_string()
}

/// Send a request and return `(status, parsed JSON body)`.
pub async fn send_json(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is JSON")
    };
    (status, json)
}

/// Build a GET request with an optional session cookie.
pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("valid request")
}

/// Build a JSON-bodied request with an optional session cookie.
pub fn json_request(
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: &serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// Build a form-bodied POST request.
pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}
