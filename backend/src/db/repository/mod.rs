//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`student`]: CRUD operations for student records

pub mod error;
pub mod student;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};
pub use student::StudentRepository;
