//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use careline_core::Username;

/// Session-bound admin identity.
///
/// Minimal data carried in the signed session cookie to identify the
/// logged-in admin. The super-admin flag is a login-time snapshot; the
/// access-control guard re-reads the store before trusting it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's username.
    pub username: Username,
    /// Role flag as of login.
    pub is_super_admin: bool,
}
