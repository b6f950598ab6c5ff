//! Account lifecycle service.
//!
//! Orchestrates bootstrap, login, admin roster management, and self-service
//! password changes over the admin repository. The reserved super-admin is
//! the one identity defined by configuration instead of the store; bootstrap
//! materializes it so every later read path can treat all admins uniformly.

mod error;

pub use error::AccountError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use careline_core::Username;

use crate::config::{MIN_PASSWORD_LENGTH, SuperAdminConfig};
use crate::models::admin::{AdminAccount, AdminRecord, AdminSummary, CREATED_BY_SYSTEM};
use crate::models::session::CurrentAdmin;
use crate::store::AdminRepository;

/// Account lifecycle service.
///
/// Handles bootstrap, login, and admin roster management.
pub struct AccountService<'a> {
    admins: AdminRepository<'a>,
    super_admin: &'a SuperAdminConfig,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(admins: AdminRepository<'a>, super_admin: &'a SuperAdminConfig) -> Self {
        Self {
            admins,
            super_admin,
        }
    }

    // =========================================================================
    // Bootstrap
    // =========================================================================

    /// Materialize the reserved super-admin record if it does not exist yet.
    ///
    /// Idempotent: an existing record is left untouched, whatever its
    /// contents. Runs once at startup.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Store` if the store cannot be reached and
    /// `AccountError::PasswordHash` if hashing fails.
    pub async fn bootstrap(&self) -> Result<(), AccountError> {
        let reserved = &self.super_admin.username;

        if self.admins.get(reserved).await?.is_some() {
            tracing::debug!(username = %reserved, "Super-admin record already materialized");
            return Ok(());
        }

        let record = AdminRecord {
            password_hash: hash_password(self.super_admin.password.expose_secret())?,
            is_super_admin: true,
            created_at: Utc::now(),
            created_by: CREATED_BY_SYSTEM.to_string(),
            updated_at: None,
        };
        self.admins.set(reserved, &record).await?;

        tracing::info!(username = %reserved, "Materialized super-admin record");
        Ok(())
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Authenticate a username/password pair.
    ///
    /// The reserved identity is checked against the configured password in
    /// constant time; everyone else against their stored hash. Unknown user
    /// and wrong password are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidCredentials` on any mismatch and
    /// `AccountError::Store` if the store cannot be consulted.
    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentAdmin, AccountError> {
        if username == self.super_admin.username.as_str() {
            let configured = self.super_admin.password.expose_secret().as_bytes();
            if bool::from(password.as_bytes().ct_eq(configured)) {
                return Ok(CurrentAdmin {
                    username: self.super_admin.username.clone(),
                    is_super_admin: true,
                });
            }
            return Err(AccountError::InvalidCredentials);
        }

        // A name that does not even parse cannot have an account; same error
        let username = Username::parse(username).map_err(|_| AccountError::InvalidCredentials)?;

        let account = self
            .admins
            .get(&username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        verify_password(password, &account.record.password_hash)?;

        Ok(CurrentAdmin {
            username: account.username,
            is_super_admin: account.record.is_super_admin,
        })
    }

    // =========================================================================
    // Roster Management
    // =========================================================================

    /// List all admin accounts, reserved identity first.
    ///
    /// If bootstrap has not materialized the reserved record yet, a
    /// synthetic entry stands in for it.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Store` if the store cannot be reached.
    pub async fn list_admins(&self) -> Result<Vec<AdminSummary>, AccountError> {
        let accounts = self.admins.list().await?;

        let reserved = &self.super_admin.username;
        let mut summaries = Vec::with_capacity(accounts.len() + 1);

        match accounts.iter().find(|a| &a.username == reserved) {
            Some(account) => summaries.push(AdminSummary::from(account)),
            None => summaries.push(AdminSummary::synthetic_super_admin(reserved.clone())),
        }

        summaries.extend(
            accounts
                .iter()
                .filter(|a| &a.username != reserved)
                .map(AdminSummary::from),
        );

        Ok(summaries)
    }

    /// Create a new (non-super) admin account.
    ///
    /// Two concurrent creates for the same fresh username can both pass the
    /// existence check and race to overwrite; the store's key atomicity
    /// makes that last-writer-wins.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidUsername` / `ReservedUsername` /
    /// `AlreadyExists` / `WeakPassword` on validation failure and
    /// `AccountError::Store` if the store cannot be reached.
    pub async fn create_admin(
        &self,
        username: &str,
        password: &str,
        created_by: &Username,
    ) -> Result<AdminAccount, AccountError> {
        let username = Username::parse(username)?;

        if username == self.super_admin.username {
            return Err(AccountError::ReservedUsername);
        }

        validate_password(password)?;

        if self.admins.get(&username).await?.is_some() {
            return Err(AccountError::AlreadyExists);
        }

        let record = AdminRecord {
            password_hash: hash_password(password)?,
            is_super_admin: false,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            updated_at: None,
        };
        self.admins.set(&username, &record).await?;

        tracing::info!(username = %username, created_by = %created_by, "Admin account created");

        Ok(AdminAccount { username, record })
    }

    /// Delete an admin account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::ProtectedAccount` for the reserved identity,
    /// `AccountError::NotFound` if the account does not exist, and
    /// `AccountError::Store` if the store cannot be reached.
    pub async fn delete_admin(&self, username: &Username) -> Result<(), AccountError> {
        if username == &self.super_admin.username {
            return Err(AccountError::ProtectedAccount);
        }

        if self.admins.get(username).await?.is_none() {
            return Err(AccountError::NotFound);
        }

        self.admins.delete(username).await?;

        tracing::info!(username = %username, "Admin account deleted");
        Ok(())
    }

    /// Change an account's own password.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::PasswordImmutable` for the reserved identity,
    /// `AccountError::InvalidCredentials` if `current` does not verify,
    /// `AccountError::WeakPassword` if `new` is too short, and
    /// `AccountError::Store` if the store cannot be reached.
    pub async fn update_password(
        &self,
        username: &Username,
        current: &str,
        new: &str,
    ) -> Result<(), AccountError> {
        if username == &self.super_admin.username {
            return Err(AccountError::PasswordImmutable);
        }

        let account = self
            .admins
            .get(username)
            .await?
            .ok_or(AccountError::NotFound)?;

        verify_password(current, &account.record.password_hash)?;
        validate_password(new)?;

        let updated = serde_json::json!({
            "password_hash": hash_password(new)?,
            "updated_at": Utc::now(),
        });
        self.admins.update(username, updated).await?;

        tracing::info!(username = %username, "Admin password updated");
        Ok(())
    }
}

// =============================================================================
// Password Helpers
// =============================================================================

/// Check password requirements.
fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id with a fresh random salt.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

/// Verify a password against a PHC hash string.
fn verify_password(password: &str, hash: &str) -> Result<(), AccountError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AccountError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use crate::store::{DocumentStore, MemoryStore};

    use super::*;

    fn super_admin() -> SuperAdminConfig {
        SuperAdminConfig {
            username: Username::parse("root").unwrap(),
            password: SecretString::from("Openforme"),
        }
    }

    fn service<'a>(store: &'a MemoryStore, config: &'a SuperAdminConfig) -> AccountService<'a> {
        AccountService::new(AdminRepository::new(store), config)
    }

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).is_ok());
        assert!(verify_password("secret2", &hash).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_bootstrap_materializes_reserved_record() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.bootstrap().await.unwrap();

        let account = svc
            .admins
            .get(&config.username)
            .await
            .unwrap()
            .expect("record should exist");
        assert!(account.record.is_super_admin);
        assert_eq!(account.record.created_by, CREATED_BY_SYSTEM);
        assert!(verify_password("Openforme", &account.record.password_hash).is_ok());
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.bootstrap().await.unwrap();
        let first = svc.admins.get(&config.username).await.unwrap().unwrap();

        svc.bootstrap().await.unwrap();
        let second = svc.admins.get(&config.username).await.unwrap().unwrap();

        assert_eq!(first.record.password_hash, second.record.password_hash);
        assert_eq!(first.record.created_at, second.record.created_at);
    }

    #[tokio::test]
    async fn test_login_reserved_identity() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        // Works even before bootstrap materializes the record
        let admin = svc.login("root", "Openforme").await.unwrap();
        assert!(admin.is_super_admin);
        assert_eq!(admin.username.as_str(), "root");

        assert!(matches!(
            svc.login("root", "wrong").await,
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_create_then_login() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.create_admin("bob", "secret1", &config.username)
            .await
            .unwrap();

        let admin = svc.login("bob", "secret1").await.unwrap();
        assert!(!admin.is_super_admin);
        assert_eq!(admin.username.as_str(), "bob");
    }

    #[tokio::test]
    async fn test_login_is_enumeration_safe() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.create_admin("bob", "secret1", &config.username)
            .await
            .unwrap();

        let unknown_user = svc.login("ghost", "secret1").await.unwrap_err();
        let wrong_password = svc.login("bob", "wrong12").await.unwrap_err();

        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn test_create_rejects_reserved_username() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        assert!(matches!(
            svc.create_admin("root", "secret1", &config.username).await,
            Err(AccountError::ReservedUsername)
        ));

        // Store untouched
        assert!(store.list("admins").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_short_password() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        assert!(matches!(
            svc.create_admin("bob", "five5", &config.username).await,
            Err(AccountError::WeakPassword(_))
        ));
        assert!(store.list("admins").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.create_admin("bob", "secret1", &config.username)
            .await
            .unwrap();

        assert!(matches!(
            svc.create_admin("bob", "secret2", &config.username).await,
            Err(AccountError::AlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_malformed_username() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        assert!(matches!(
            svc.create_admin("", "secret1", &config.username).await,
            Err(AccountError::InvalidUsername(_))
        ));
        assert!(matches!(
            svc.create_admin("a/b", "secret1", &config.username).await,
            Err(AccountError::InvalidUsername(_))
        ));
    }

    #[tokio::test]
    async fn test_list_admins_synthetic_reserved_entry_first() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        // No bootstrap yet: synthetic entry stands in
        let admins = svc.list_admins().await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].username.as_str(), "root");
        assert!(admins[0].is_super_admin);
        assert!(admins[0].created_at.is_none());
    }

    #[tokio::test]
    async fn test_list_admins_deduplicates_after_bootstrap() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.bootstrap().await.unwrap();
        svc.create_admin("alice", "secret1", &config.username)
            .await
            .unwrap();

        let admins = svc.list_admins().await.unwrap();
        let names: Vec<_> = admins.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, ["root", "alice"]);
        // Materialized now, so the entry carries its creation time
        assert!(admins[0].created_at.is_some());
    }

    #[tokio::test]
    async fn test_delete_admin() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.create_admin("bob", "secret1", &config.username)
            .await
            .unwrap();
        svc.delete_admin(&Username::parse("bob").unwrap())
            .await
            .unwrap();

        assert!(matches!(
            svc.login("bob", "secret1").await,
            Err(AccountError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_delete_reserved_is_protected() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.bootstrap().await.unwrap();

        assert!(matches!(
            svc.delete_admin(&config.username).await,
            Err(AccountError::ProtectedAccount)
        ));
        assert!(svc.admins.get(&config.username).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_absent_is_not_found() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        assert!(matches!(
            svc.delete_admin(&Username::parse("ghost").unwrap()).await,
            Err(AccountError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_password() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.create_admin("bob", "secret1", &config.username)
            .await
            .unwrap();

        let bob = Username::parse("bob").unwrap();
        svc.update_password(&bob, "secret1", "secret2").await.unwrap();

        assert!(svc.login("bob", "secret2").await.is_ok());
        assert!(svc.login("bob", "secret1").await.is_err());

        let account = svc.admins.get(&bob).await.unwrap().unwrap();
        assert!(account.record.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_password_wrong_current_leaves_hash_unchanged() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.create_admin("bob", "secret1", &config.username)
            .await
            .unwrap();
        let bob = Username::parse("bob").unwrap();
        let before = svc.admins.get(&bob).await.unwrap().unwrap();

        assert!(matches!(
            svc.update_password(&bob, "wrong12", "secret2").await,
            Err(AccountError::InvalidCredentials)
        ));

        let after = svc.admins.get(&bob).await.unwrap().unwrap();
        assert_eq!(before.record.password_hash, after.record.password_hash);
    }

    #[tokio::test]
    async fn test_update_password_reserved_is_immutable() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.bootstrap().await.unwrap();

        assert!(matches!(
            svc.update_password(&config.username, "Openforme", "NewPass1")
                .await,
            Err(AccountError::PasswordImmutable)
        ));
    }

    #[tokio::test]
    async fn test_update_password_rejects_short_new_password() {
        let store = MemoryStore::new();
        let config = super_admin();
        let svc = service(&store, &config);

        svc.create_admin("bob", "secret1", &config.username)
            .await
            .unwrap();

        assert!(matches!(
            svc.update_password(&Username::parse("bob").unwrap(), "secret1", "short")
                .await,
            Err(AccountError::WeakPassword(_))
        ));
    }
}
