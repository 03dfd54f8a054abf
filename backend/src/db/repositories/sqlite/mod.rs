//! SQLite repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Per-connection pragmas (WAL journal, busy timeout)
//! - Automatic migration execution
//!
//! ## Configuration
//!
//! Built from the service configuration by
//! [`Config::to_sqlite_config`](crate::config::Config::to_sqlite_config):
//! `storage_path` selects the database file and the `[database]` table sets
//! `max_connections`, `connection_timeout_secs` and `busy_timeout_ms`.

use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_types::BigInt;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::path::Path;
use std::time::Duration;
use tokio::task;
use tracing::{debug, info};

use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, StudentRepository,
};
use crate::models::Student;

mod models;
mod schema;

use models::{NewStudentRow, StudentChangeset, StudentRow};
use schema::students;

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Path that selects a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Configuration for opening the SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database file path, or `:memory:`
    pub database_path: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Connection timeout in seconds
    pub connection_timeout_sec: u64,
    /// How long a connection waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_path: IN_MEMORY_PATH.to_string(),
            max_pool_size: 8,
            connection_timeout_sec: 30,
            busy_timeout_ms: 5000,
        }
    }
}

impl SqliteConfig {
    /// Create a new configuration for a database path.
    pub fn with_path(database_path: impl Into<String>) -> Self {
        Self {
            database_path: database_path.into(),
            ..Default::default()
        }
    }

    /// Configuration for a throwaway in-memory database.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path == IN_MEMORY_PATH
    }
}

/// Applies pragmas to every pooled connection.
#[derive(Debug, Clone, Copy)]
struct ConnectionOptions {
    busy_timeout_ms: u64,
    enable_wal: bool,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let mut pragmas = format!("PRAGMA busy_timeout = {};", self.busy_timeout_ms);
        if self.enable_wal {
            pragmas.push_str(" PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Diesel-backed repository for SQLite.
#[derive(Clone, Debug)]
pub struct SqliteRepository {
    pool: SqlitePool,
    config: SqliteConfig,
}

impl SqliteRepository {
    /// Open the database, build the pool and run pending migrations.
    ///
    /// Parent directories of a file path are created when missing. An
    /// in-memory database is limited to a single pooled connection so every
    /// query sees the same data.
    pub fn new(config: SqliteConfig) -> RepositoryResult<Self> {
        let in_memory = config.is_in_memory();
        if !in_memory {
            ensure_parent_dir(&config.database_path)?;
        }

        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_path);
        let max_size = if in_memory { 1 } else { config.max_pool_size.max(1) };

        let mut builder = Pool::builder()
            .max_size(max_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .connection_customizer(Box::new(ConnectionOptions {
                busy_timeout_ms: config.busy_timeout_ms,
                enable_wal: !in_memory,
            }));
        if in_memory {
            // Dropping the only connection would drop the database with it.
            builder = builder.idle_timeout(None).max_lifetime(None);
        }

        let pool = builder.build(manager).map_err(|e| {
            RepositoryError::connection_with_context(
                e.to_string(),
                ErrorContext::new("create_pool")
                    .with_details(format!("path={}", config.database_path)),
            )
        })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        info!(
            path = %config.database_path,
            pool_size = max_size,
            "SQLite repository ready"
        );

        Ok(Self { pool, config })
    }

    /// Configuration the repository was opened with.
    pub fn config(&self) -> &SqliteConfig {
        &self.config
    }

    /// Run pending database migrations.
    fn run_migrations(conn: &mut SqliteConnection) -> RepositoryResult<()> {
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;
        debug!(count = applied.len(), "applied migrations");

        Ok(())
    }

    /// Run a blocking Diesel operation on a pooled connection.
    async fn with_conn<T, F>(&self, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            f(&mut conn)
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new("spawn_blocking"),
            )
        })?
    }
}

fn ensure_parent_dir(database_path: &str) -> RepositoryResult<()> {
    match Path::new(database_path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|e| {
                RepositoryError::ConfigurationError {
                    message: format!("Failed to create storage directory: {}", e),
                    context: ErrorContext::new("create_pool")
                        .with_details(format!("dir={}", parent.display())),
                }
            })
        }
        _ => Ok(()),
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

#[async_trait]
impl StudentRepository for SqliteRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn(|conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn create_student(&self, student: &Student) -> RepositoryResult<String> {
        let student = student.clone();
        let id = student.id.clone();

        self.with_conn(move |conn| {
            let row = NewStudentRow::from_student(&student, now())?;
            diesel::insert_into(students::table)
                .values(&row)
                .execute(conn)?;
            Ok(student.id.clone())
        })
        .await
        .map_err(|e| e.within("create_student", Some(&id)))
    }

    async fn get_student_by_id(&self, id: &str) -> RepositoryResult<Student> {
        let id = id.to_string();

        self.with_conn(move |conn| {
            let row: Option<StudentRow> = students::table
                .find(&id)
                .select(StudentRow::as_select())
                .first(conn)
                .optional()?;

            match row {
                Some(row) => Student::try_from(row),
                None => Err(RepositoryError::not_found_with_context(
                    format!("student with id {} not found", id),
                    ErrorContext::new("get_student_by_id")
                        .with_entity("student")
                        .with_entity_id(&id),
                )),
            }
        })
        .await
    }

    async fn update_student(&self, student: &Student) -> RepositoryResult<()> {
        let student = student.clone();
        let id = student.id.clone();

        self.with_conn(move |conn| {
            let changes = StudentChangeset::from_student(&student, now())?;
            let affected = diesel::update(students::table.find(&student.id))
                .set(&changes)
                .execute(conn)?;

            if affected == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("student with id {} not found", student.id),
                    ErrorContext::new("update_student")
                        .with_entity("student")
                        .with_entity_id(&student.id),
                ));
            }
            Ok(())
        })
        .await
        .map_err(|e| e.within("update_student", Some(&id)))
    }

    async fn delete_student(&self, id: &str) -> RepositoryResult<()> {
        let target = id.to_string();

        self.with_conn(move |conn| {
            let affected = diesel::delete(students::table.find(&target)).execute(conn)?;

            if affected == 0 {
                return Err(RepositoryError::not_found_with_context(
                    format!("student with id {} not found", target),
                    ErrorContext::new("delete_student")
                        .with_entity("student")
                        .with_entity_id(&target),
                ));
            }
            Ok(())
        })
        .await
        .map_err(|e| e.within("delete_student", Some(id)))
    }

    async fn list_students(&self) -> RepositoryResult<Vec<Student>> {
        self.with_conn(|conn| {
            let rows: Vec<StudentRow> = students::table
                .select(StudentRow::as_select())
                .order_by(students::created_at.desc())
                .then_order_by(sql::<BigInt>("rowid").desc())
                .load(conn)?;

            rows.into_iter().map(Student::try_from).collect()
        })
        .await
        .map_err(|e| e.within("list_students", None))
    }
}
