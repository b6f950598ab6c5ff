//! Authentication extractors for admin endpoints.
//!
//! Both extractors resolve the signed session cookie and then re-check the
//! store before trusting it: an admin deleted mid-session loses access on
//! their next request, and the super-admin flag is read fresh rather than
//! from the login-time snapshot in the cookie. The reserved super-admin
//! identity is always valid, store record or not.
//!
//! A store failure during the re-check is surfaced as service-unavailable,
//! never as "not logged in".

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use axum_extra::extract::SignedCookieJar;

use crate::error::AppError;
use crate::models::session::CurrentAdmin;
use crate::state::AppState;

use super::session::resolve_session;

/// Extractor that requires a logged-in admin.
///
/// Rejects with 401 if there is no valid session or the account no longer
/// exists, and 503 if the store cannot be consulted.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAdminAuth(admin): RequireAdminAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", admin.username)
/// }
/// ```
pub struct RequireAdminAuth(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = authenticate(parts, state).await?;
        Ok(Self(admin))
    }
}

/// Extractor that requires a super-admin.
///
/// Runs the same authentication as [`RequireAdminAuth`], then requires the
/// reserved identity or a store record with the super-admin flag; 403
/// otherwise.
pub struct RequireSuperAdmin(pub CurrentAdmin);

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = authenticate(parts, state).await?;

        if !admin.is_super_admin {
            return Err(AppError::Forbidden(
                "Only super admins can access this resource".to_string(),
            ));
        }

        Ok(Self(admin))
    }
}

/// Resolve and re-validate the session identity.
///
/// The returned `is_super_admin` reflects the store record as of this
/// request, not the cookie snapshot.
async fn authenticate(parts: &mut Parts, state: &AppState) -> Result<CurrentAdmin, AppError> {
    let jar = match SignedCookieJar::from_request_parts(parts, state).await {
        Ok(jar) => jar,
        Err(never) => match never {},
    };

    let session = resolve_session(&jar).ok_or(AppError::Unauthenticated)?;

    // The reserved identity exists outside the store and is always valid
    if session.username == state.config().super_admin.username {
        return Ok(CurrentAdmin {
            username: session.username,
            is_super_admin: true,
        });
    }

    // Everyone else must still have a record; deletion ends the session here
    let account = state
        .admins()
        .get(&session.username)
        .await?
        .ok_or(AppError::Unauthenticated)?;

    Ok(CurrentAdmin {
        username: account.username,
        is_super_admin: account.record.is_super_admin,
    })
}
