//! Repository factory for dependency injection.
//!
//! Builds the [`StudentRepository`] selected by the application
//! configuration. The handle is created once at startup and handed to the
//! HTTP layer; nothing here is global.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::repositories::LocalRepository;
#[cfg(feature = "sqlite-repo")]
use super::repositories::{SqliteConfig, SqliteRepository};
#[cfg(feature = "sqlite-repo")]
use super::repository::ErrorContext;
use super::repository::{RepositoryError, RepositoryResult, StudentRepository};
use crate::config::Config;

/// Repository backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    /// SQLite + Diesel implementation
    #[default]
    Sqlite,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("sqlite", "local"), ignoring case.
    /// `sqlite3` and `memory` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl<'de> Deserialize<'de> for RepositoryType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite => f.write_str("sqlite"),
            Self::Local => f.write_str("local"),
        }
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```ignore
/// use students_api::config::Config;
/// use students_api::db::RepositoryFactory;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = Config::load(None)?;
///     let repo = RepositoryFactory::create(&config).await?;
///     assert!(repo.health_check().await?);
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create the repository named by `config.storage_backend`.
    pub async fn create(config: &Config) -> RepositoryResult<Arc<dyn StudentRepository>> {
        match config.storage_backend {
            RepositoryType::Sqlite => {
                #[cfg(feature = "sqlite-repo")]
                {
                    let repo = Self::create_sqlite(config.to_sqlite_config()).await?;
                    Ok(repo as Arc<dyn StudentRepository>)
                }
                #[cfg(not(feature = "sqlite-repo"))]
                {
                    Err(RepositoryError::configuration(
                        "SQLite repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Open a SQLite repository, running migrations off the async runtime.
    #[cfg(feature = "sqlite-repo")]
    pub async fn create_sqlite(config: SqliteConfig) -> RepositoryResult<Arc<SqliteRepository>> {
        let repo = tokio::task::spawn_blocking(move || SqliteRepository::new(config))
            .await
            .map_err(|e| {
                RepositoryError::internal_with_context(
                    format!("Task join error: {}", e),
                    ErrorContext::new("create_sqlite"),
                )
            })??;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn StudentRepository> {
        Arc::new(LocalRepository::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_type_from_str() {
        assert_eq!(
            RepositoryType::from_str("local").unwrap(),
            RepositoryType::Local
        );
        assert_eq!(
            RepositoryType::from_str("SQLite").unwrap(),
            RepositoryType::Sqlite
        );
        assert!(RepositoryType::from_str("postgres").is_err());
    }

    #[test]
    fn test_repository_type_display_round_trips() {
        for repo_type in [RepositoryType::Sqlite, RepositoryType::Local] {
            assert_eq!(repo_type.to_string().parse::<RepositoryType>(), Ok(repo_type));
        }
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create_local();
        assert!(repo.health_check().await.unwrap());
        assert!(repo.list_students().await.unwrap().is_empty());
    }
}
