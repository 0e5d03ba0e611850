use accounts_core::AppError;
use serde::Deserialize;

/// Which [`UserStore`](accounts_core::UserStore) implementation backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Postgres,
    Memory,
}

/// The `database` settings section.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Connection string. Required for the PostgreSQL backend, ignored otherwise.
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            url: String::new(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// Reject settings the selected backend cannot start with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.backend != Backend::Postgres {
            return Ok(());
        }
        if self.url.trim().is_empty() {
            return Err(AppError::ConfigError(
                "database.url not set. Required for the postgres backend.".into(),
            ));
        }
        if self.max_connections == 0 {
            return Err(AppError::ConfigError(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
