//! Database module for student record storage.
//!
//! Storage is reached through the [`StudentRepository`] trait so handlers
//! never depend on a concrete database.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (http/)                                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │ Arc<dyn StudentRepository>
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository trait (repository/) - Abstract Interface     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────────┐
//!     │ SqliteRepository                 │ LocalRepository
//!     │ (Diesel + r2d2)                  │ (in-memory)
//!     └──────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `repository`: trait definition and error types
//! - `repositories::sqlite`: SQLite implementation with Diesel ORM
//! - `repositories::local`: in-memory implementation for tests and local development
//! - `factory`: builds the configured backend

pub mod factory;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
#[cfg(feature = "sqlite-repo")]
pub use repositories::{SqliteConfig, SqliteRepository};
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, StudentRepository};
