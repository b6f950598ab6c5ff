//! Admin account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use careline_core::Username;

/// `created_by` value for the record materialized at bootstrap.
pub const CREATED_BY_SYSTEM: &str = "system";

/// Stored shape of an admin account.
///
/// The username is the store key, not a field; [`AdminAccount`] reunites the
/// two on the way out of the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminRecord {
    /// Salted Argon2id hash in PHC string format.
    pub password_hash: String,
    /// Whether this account holds super-admin privileges.
    pub is_super_admin: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Username of the creator, or `"system"` for the bootstrap record.
    pub created_by: String,
    /// When the password was last changed, if ever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An admin account (domain type).
#[derive(Debug, Clone)]
pub struct AdminAccount {
    /// Unique username, the store key.
    pub username: Username,
    /// Stored fields.
    pub record: AdminRecord,
}

/// Listing view of an admin account.
///
/// What the roster endpoint returns; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSummary {
    pub username: Username,
    pub is_super_admin: bool,
    /// `None` for the reserved super-admin while its record is not yet
    /// materialized in the store.
    pub created_at: Option<DateTime<Utc>>,
    pub created_by: String,
}

impl From<&AdminAccount> for AdminSummary {
    fn from(account: &AdminAccount) -> Self {
        Self {
            username: account.username.clone(),
            is_super_admin: account.record.is_super_admin,
            created_at: Some(account.record.created_at),
            created_by: account.record.created_by.clone(),
        }
    }
}

impl AdminSummary {
    /// The synthetic roster entry for the reserved super-admin before its
    /// store record exists.
    #[must_use]
    pub fn synthetic_super_admin(username: Username) -> Self {
        Self {
            username,
            is_super_admin: true,
            created_at: None,
            created_by: CREATED_BY_SYSTEM.to_string(),
        }
    }
}
