//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;

use crate::auth::{Principal, Role};
use crate::db::Store;
use crate::db::repositories::user::verify_password;
use crate::services::auth_service::{AuthError, AuthService};

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn authenticate(&self, email: &str, password: &str) -> Result<Principal, AuthError> {
        // Case-sensitive exact match on email.
        let user = self.store.find_user_by_email(email).await?;

        let Some(user) = user else {
            tracing::debug!(email, "login rejected: no such user");
            return Err(AuthError::AuthenticationFailed);
        };

        if !user.is_active {
            tracing::debug!(user_id = user.id, "login rejected: account inactive");
            return Err(AuthError::AuthenticationFailed);
        }

        let Some(stored_hash) = &user.password_hash else {
            tracing::debug!(user_id = user.id, "login rejected: credential login disabled");
            return Err(AuthError::AuthenticationFailed);
        };

        let is_valid = verify_password(password, stored_hash).await?;

        if !is_valid {
            tracing::debug!(user_id = user.id, "login rejected: password mismatch");
            return Err(AuthError::AuthenticationFailed);
        }

        let role = Role::parse(&user.role).ok_or_else(|| {
            // A user row with an unknown role cannot be given a session;
            // the permission table would deny it everything anyway.
            AuthError::Internal(format!("User {} has unknown role '{}'", user.id, user.role))
        })?;

        tracing::info!(user_id = user.id, role = %role, "login succeeded");

        Ok(Principal {
            id: user.id,
            email: user.email,
            name: user.name,
            role,
            image: user.image,
        })
    }
}
