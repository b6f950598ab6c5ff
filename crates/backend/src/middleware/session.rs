//! Signed session cookie handling.
//!
//! Sessions are bearer state: the server keeps no session table, the signed
//! cookie carries the whole payload. Anything that fails to parse or verify
//! resolves to "no session" rather than an error.

use axum_extra::extract::SignedCookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use careline_core::Username;

use crate::models::session::CurrentAdmin;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "careline_session";

/// Session lifetime in hours.
const SESSION_TTL_HOURS: i64 = 12;

/// What the signed cookie carries.
///
/// `expires_at` (unix seconds) is the claim the server trusts; the cookie
/// `Max-Age` merely keeps well-behaved clients from sending stale cookies.
#[derive(Debug, Serialize, Deserialize)]
struct SessionPayload {
    username: Username,
    is_super_admin: bool,
    expires_at: i64,
}

/// Build the signed session cookie for a logged-in admin.
///
/// # Errors
///
/// Returns a serialization error if the payload cannot be encoded (which
/// would indicate a bug, not bad input).
pub fn build_session_cookie(
    admin: &CurrentAdmin,
    secure: bool,
) -> Result<Cookie<'static>, serde_json::Error> {
    let payload = SessionPayload {
        username: admin.username.clone(),
        is_super_admin: admin.is_super_admin,
        expires_at: (Utc::now() + chrono::Duration::hours(SESSION_TTL_HOURS)).timestamp(),
    };
    // Base64 keeps the cookie value inside the RFC 6265 character set
    let value = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&payload)?);

    Ok(Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(time::Duration::hours(SESSION_TTL_HOURS))
        .build())
}

/// Resolve the current session from the signed jar.
///
/// Fails closed: a missing cookie, bad signature, unparseable payload, or
/// expired claim all come back as `None`.
#[must_use]
pub fn resolve_session(jar: &SignedCookieJar) -> Option<CurrentAdmin> {
    let cookie = jar.get(SESSION_COOKIE_NAME)?;
    let bytes = URL_SAFE_NO_PAD.decode(cookie.value()).ok()?;
    let payload: SessionPayload = serde_json::from_slice(&bytes).ok()?;

    if payload.expires_at <= Utc::now().timestamp() {
        return None;
    }

    Some(CurrentAdmin {
        username: payload.username,
        is_super_admin: payload.is_super_admin,
    })
}

/// The removal cookie for logout. Path must match the session cookie for
/// browsers to drop it.
#[must_use]
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, "")).path("/").build()
}
