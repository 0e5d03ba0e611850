use std::path::Path;

use accounts_core::{AppError, AuthConfig};
use accounts_db::DatabaseConfig;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Prefix for environment overrides, e.g. `ACCOUNTS__API__PORT=9000`.
pub const ENV_PREFIX: &str = "ACCOUNTS";

/// The `api` settings section.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Scheme used when building `Location` headers.
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// Public host (and port) clients reach the service at.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path every route is mounted under. Empty or `/` mounts at the root.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_protocol() -> String {
    "http".into()
}

fn default_base_url() -> String {
    "localhost:8080".into()
}

fn default_prefix() -> String {
    "/api/v1".into()
}

fn default_host() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8080
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            protocol: default_protocol(),
            base_url: default_base_url(),
            prefix: default_prefix(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Prefix to nest the router under, without a trailing slash.
    /// `None` when routes are served from the root.
    pub fn mount_prefix(&self) -> Option<&str> {
        let prefix = self.prefix.trim().trim_end_matches('/');
        (!prefix.is_empty()).then_some(prefix)
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Absolute URL for a resource at `path` (which must start with `/`).
    pub fn resource_url(&self, path: &str) -> String {
        format!("{}://{}{}", self.protocol, self.base_url, path)
    }
}

/// Environment source reading `ACCOUNTS__SECTION__KEY` variables.
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Complete service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl Settings {
    /// Load from a YAML file, then apply `ACCOUNTS__SECTION__KEY` environment overrides.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        Self::load_with_env(path, environment())
    }

    /// Load from a YAML file layered under `env`, which wins on conflicts.
    pub fn load_with_env(path: &Path, env: Environment) -> Result<Self, AppError> {
        let settings: Settings = Config::builder()
            .add_source(File::from(path))
            .add_source(env)
            .build()
            .map_err(|e| AppError::ConfigError(format!("{}: {e}", path.display())))?
            .try_deserialize()
            .map_err(|e| AppError::ConfigError(format!("{}: {e}", path.display())))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(prefix) = self.api.mount_prefix()
            && !prefix.starts_with('/')
        {
            return Err(AppError::ConfigError(format!(
                "api.prefix must start with '/', got '{prefix}'"
            )));
        }
        if self.api.protocol.is_empty() || self.api.base_url.is_empty() {
            return Err(AppError::ConfigError(
                "api.protocol and api.base_url must be set".into(),
            ));
        }
        self.database.validate()
    }
}
