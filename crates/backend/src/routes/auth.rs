//! Authentication route handlers.
//!
//! Form login sets the signed session cookie; logout clears it. Failed
//! logins redirect back with a generic error so the response never reveals
//! whether the username exists.

use axum::{
    Form, Router,
    extract::State,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::SignedCookieJar;
use serde::Deserialize;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::{build_session_cookie, clear_session_cookie};
use crate::services::AccountError;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", get(logout))
}

/// Handle login form submission.
///
/// POST /login
#[instrument(skip(state, jar, form), fields(username = %form.username))]
async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match state.accounts().login(&form.username, &form.password).await {
        Ok(admin) => {
            let cookie = build_session_cookie(&admin, state.config().is_secure())
                .map_err(|e| AppError::Internal(e.to_string()))?;

            tracing::info!(username = %admin.username, "Admin logged in");
            Ok((jar.add(cookie), Redirect::to("/admin")).into_response())
        }
        Err(AccountError::InvalidCredentials) => {
            tracing::info!("Login rejected");
            Ok(Redirect::to("/login?error=invalid-credentials").into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Logout and clear the session cookie. Idempotent when no session exists.
///
/// GET /logout
async fn logout(jar: SignedCookieJar) -> impl IntoResponse {
    (jar.remove(clear_session_cookie()), Redirect::to("/login"))
}
