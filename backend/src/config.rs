//! Application configuration file support.
//!
//! Configuration is read from a TOML file whose path comes from the
//! `CONFIG_PATH` environment variable or, failing that, the `--config`
//! command-line flag. The `ENV` environment variable overrides the `env` key.
//!
//! ```toml
//! env = "local"
//! storage_path = "storage/students.db"
//! storage_backend = "sqlite"
//!
//! [http_server]
//! address = "127.0.0.1:8082"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::db::RepositoryType;
#[cfg(feature = "sqlite-repo")]
use crate::db::SqliteConfig;

/// Environment variable holding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";
/// Environment variable overriding [`Config::env`].
pub const ENV_OVERRIDE_ENV: &str = "ENV";

/// Errors raised while locating, reading or checking the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config path is not set: use the CONFIG_PATH env variable or the --config flag")]
    PathNotSet,

    #[error("config file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Deployment environment name ("local", "dev", "production", ...)
    #[serde(default)]
    pub env: String,
    /// SQLite database file path
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Which repository backend to build
    #[serde(default)]
    pub storage_backend: RepositoryType,
    pub http_server: HttpServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
}

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerSettings {
    #[serde(default)]
    pub address: String,
    /// Grace period for in-flight requests after a shutdown signal
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,
}

/// Connection pool settings for the SQLite backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_connection_timeout_secs")]
    pub connection_timeout_secs: u64,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            connection_timeout_secs: default_connection_timeout_secs(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_storage_path() -> String {
    "storage/students.db".to_string()
}

fn default_shutdown_timeout_secs() -> u64 {
    5
}

fn default_max_connections() -> u32 {
    8
}

fn default_connection_timeout_secs() -> u64 {
    30
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Pick the configuration file path.
///
/// A non-empty `CONFIG_PATH` wins over the command-line flag.
pub fn resolve_path(cli_path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    cli_path
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .ok_or(ConfigError::PathNotSet)
}

impl Config {
    /// Resolve the path, then load it with [`Config::from_file`].
    pub fn load(cli_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = resolve_path(cli_path)?;
        Self::from_file(path)
    }

    /// Load configuration from a TOML file, applying environment overrides.
    ///
    /// # Returns
    /// * `Ok(Config)` if the file exists, parses and validates
    /// * `Err(ConfigError)` otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: Config = toml::from_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate TOML text. Environment overrides are not applied.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(env) = std::env::var(ENV_OVERRIDE_ENV) {
            if !env.trim().is_empty() {
                self.env = env;
            }
        }
    }

    /// Check required keys and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.env.trim().is_empty() {
            return Err(ConfigError::Invalid("env is required".into()));
        }
        if self.http_server.address.trim().is_empty() {
            return Err(ConfigError::Invalid("http_server.address is required".into()));
        }
        if self.storage_backend == RepositoryType::Sqlite && self.storage_path.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "storage_path is required for the sqlite backend".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.http_server.shutdown_timeout_secs)
    }

    /// Connection settings for the SQLite repository.
    #[cfg(feature = "sqlite-repo")]
    pub fn to_sqlite_config(&self) -> SqliteConfig {
        SqliteConfig {
            database_path: self.storage_path.clone(),
            max_pool_size: self.database.max_connections,
            connection_timeout_sec: self.database.connection_timeout_secs,
            busy_timeout_ms: self.database.busy_timeout_ms,
        }
    }
}
