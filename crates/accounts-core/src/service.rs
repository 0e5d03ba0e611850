use std::sync::Arc;

use crate::auth::TokenAuthenticator;
use crate::error::AppError;
use crate::models::{NewUser, User, UserUpdate};
use crate::password::CredentialHasher;
use crate::traits::UserStore;

/// Account operations on top of a [`UserStore`]: hashing on sign-up,
/// existence checks before mutation, credential checks and token issuance.
///
/// Generic over the store so the same logic runs against PostgreSQL and the
/// in-memory backend.
#[derive(Debug, Clone)]
pub struct UserService<S: UserStore> {
    store: S,
    hasher: CredentialHasher,
    authenticator: Arc<TokenAuthenticator>,
}

impl<S: UserStore> UserService<S> {
    pub fn new(store: S, hasher: CredentialHasher, authenticator: Arc<TokenAuthenticator>) -> Self {
        Self {
            store,
            hasher,
            authenticator,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn authenticator(&self) -> &TokenAuthenticator {
        &self.authenticator
    }

    /// Hash the password and persist the account.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        let NewUser {
            username,
            email,
            password,
        } = new_user;

        let hasher = self.hasher;
        let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))??;

        let user = self.store.create(&username, &email, &hash).await?;
        tracing::info!(id = user.id, "User created");
        Ok(user)
    }

    pub async fn get_user(&self, id: i32) -> Result<User, AppError> {
        self.store.select_by_id(id).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.store.select_all().await
    }

    pub async fn remove_user(&self, id: i32) -> Result<(), AppError> {
        self.ensure_exists(id).await?;
        self.store.remove(id).await?;
        tracing::info!(id, "User removed");
        Ok(())
    }

    /// Apply the fields present in `update`. An empty update only checks existence.
    pub async fn update_user(&self, id: i32, update: UserUpdate) -> Result<(), AppError> {
        self.ensure_exists(id).await?;
        if update.is_empty() {
            return Ok(());
        }

        if let Some(username) = update.username {
            self.store.update_username(id, &username).await?;
            tracing::info!(id, "Username updated");
        }
        Ok(())
    }

    /// Check an email/password pair and issue a token for the matching account.
    ///
    /// Unknown email and wrong password both yield [`AppError::InvalidCredentials`].
    pub async fn authenticate_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = match self.store.select_by_email(email).await {
            Ok(user) => user,
            Err(AppError::NotFound(_)) => return Err(AppError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        let hash = match self.store.select_hash_by_id(user.id).await {
            Ok(hash) => hash,
            Err(AppError::NotFound(_)) => return Err(AppError::InvalidCredentials),
            Err(e) => return Err(e),
        };

        let hasher = self.hasher;
        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {e}")))??;

        if !valid {
            tracing::debug!(id = user.id, "Password mismatch");
            return Err(AppError::InvalidCredentials);
        }

        self.authenticator.generate_token(user.id, &user.email)
    }

    pub fn verify_token(&self, token: &str) -> bool {
        self.authenticator.verify_token(token)
    }

    async fn ensure_exists(&self, id: i32) -> Result<(), AppError> {
        if self.store.exists(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("User ID {id} doesn't exist")))
        }
    }
}
