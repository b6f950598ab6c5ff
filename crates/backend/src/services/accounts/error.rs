//! Account service error types.

use thiserror::Error;

use careline_core::UsernameError;

use crate::error::AppError;
use crate::store::StoreError;

/// Errors that can occur during account lifecycle operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Username is malformed.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Username collides with the reserved super-admin identity.
    #[error("this username is reserved")]
    ReservedUsername,

    /// Username is already taken.
    #[error("username already exists")]
    AlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Wrong password, or no such account. Deliberately one error for both
    /// so callers cannot enumerate usernames.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Target account does not exist.
    #[error("admin not found")]
    NotFound,

    /// The reserved super-admin account cannot be deleted.
    #[error("the built-in super-admin account cannot be deleted")]
    ProtectedAccount,

    /// The reserved super-admin password cannot be changed through
    /// self-service; it is configuration.
    #[error("the built-in super-admin password cannot be changed")]
    PasswordImmutable,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AccountError> for AppError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::InvalidUsername(_)
            | AccountError::ReservedUsername
            | AccountError::AlreadyExists
            | AccountError::WeakPassword(_)
            | AccountError::InvalidCredentials
            | AccountError::ProtectedAccount
            | AccountError::PasswordImmutable => Self::Validation(e.to_string()),
            AccountError::NotFound => Self::NotFound("admin not found".to_string()),
            AccountError::PasswordHash => Self::Internal(e.to_string()),
            AccountError::Store(store) => store.into(),
        }
    }
}
