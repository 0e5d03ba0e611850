use std::sync::Arc;

use accounts_core::{
    AppError, CredentialHasher, InMemoryUserStore, TokenAuthenticator, User, UserService,
    UserStore,
};
use accounts_db::{Backend, Database, UserRepository};

use crate::settings::{ApiConfig, Settings};

/// Storage backend picked from `database.backend` at startup.
#[derive(Debug, Clone)]
pub enum UserBackend {
    Postgres(UserRepository),
    Memory(InMemoryUserStore),
}

impl UserStore for UserBackend {
    async fn create(&self, username: &str, email: &str, hash: &str) -> Result<User, AppError> {
        match self {
            Self::Postgres(repo) => repo.create(username, email, hash).await,
            Self::Memory(store) => store.create(username, email, hash).await,
        }
    }

    async fn select_by_id(&self, id: i32) -> Result<User, AppError> {
        match self {
            Self::Postgres(repo) => repo.select_by_id(id).await,
            Self::Memory(store) => store.select_by_id(id).await,
        }
    }

    async fn select_by_email(&self, email: &str) -> Result<User, AppError> {
        match self {
            Self::Postgres(repo) => repo.select_by_email(email).await,
            Self::Memory(store) => store.select_by_email(email).await,
        }
    }

    async fn select_hash_by_id(&self, id: i32) -> Result<String, AppError> {
        match self {
            Self::Postgres(repo) => repo.select_hash_by_id(id).await,
            Self::Memory(store) => store.select_hash_by_id(id).await,
        }
    }

    async fn select_all(&self) -> Result<Vec<User>, AppError> {
        match self {
            Self::Postgres(repo) => repo.select_all().await,
            Self::Memory(store) => store.select_all().await,
        }
    }

    async fn remove(&self, id: i32) -> Result<(), AppError> {
        match self {
            Self::Postgres(repo) => repo.remove(id).await,
            Self::Memory(store) => store.remove(id).await,
        }
    }

    async fn update_username(&self, id: i32, username: &str) -> Result<(), AppError> {
        match self {
            Self::Postgres(repo) => repo.update_username(id, username).await,
            Self::Memory(store) => store.update_username(id, username).await,
        }
    }

    async fn exists(&self, id: i32) -> Result<bool, AppError> {
        match self {
            Self::Postgres(repo) => repo.exists(id).await,
            Self::Memory(store) => store.exists(id).await,
        }
    }
}

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub service: UserService<UserBackend>,
    /// Used to build absolute `Location` URLs.
    pub api: ApiConfig,
}

impl AppState {
    /// Wire the authenticator, hasher and storage backend described by `settings`.
    ///
    /// Connects and migrates when the backend is PostgreSQL. Any failure here is
    /// fatal at startup.
    pub async fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let authenticator = Arc::new(TokenAuthenticator::from_config(&settings.auth)?);
        tracing::info!(
            public_key = %authenticator.public_key_base64(),
            ttl_secs = settings.auth.token_ttl_secs,
            "Token authenticator ready"
        );

        let hasher = CredentialHasher::new(settings.auth.bcrypt_cost)?;

        let backend = match settings.database.backend {
            Backend::Postgres => {
                let db = Database::connect(&settings.database).await?;
                db.migrate().await?;
                tracing::info!("Connected to PostgreSQL, migrations applied");
                UserBackend::Postgres(db.user_repo())
            }
            Backend::Memory => {
                tracing::warn!("Using in-memory storage, data is lost on shutdown");
                UserBackend::Memory(InMemoryUserStore::new())
            }
        };

        Ok(Self {
            service: UserService::new(backend, hasher, authenticator),
            api: settings.api.clone(),
        })
    }
}
