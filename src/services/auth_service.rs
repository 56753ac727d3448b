//! Domain service for credential authentication.
//!
//! Produces the session principal from an email/password pair. Session
//! issuance and capability checks live in `crate::auth`; this service owns
//! only the database-backed credential check.

use thiserror::Error;

use crate::auth::Principal;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Bad credentials, inactive account, or an account without a password
    /// hash. The sub-cases are deliberately indistinguishable to callers.
    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Verifies credentials and returns the principal.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthenticationFailed`] for every unsuccessful
    /// sub-case: unknown email, inactive account, missing password hash, or
    /// hash mismatch. Callers must not be able to tell these apart.
    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError>;
}
