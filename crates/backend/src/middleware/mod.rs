//! Session resolution and access-control extractors.

pub mod auth;
pub mod session;

pub use auth::{RequireAdminAuth, RequireSuperAdmin};
pub use session::{SESSION_COOKIE_NAME, build_session_cookie, clear_session_cookie};
