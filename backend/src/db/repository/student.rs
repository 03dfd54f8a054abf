//! Student repository trait for CRUD operations.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::Student;

/// Storage capability for student records.
///
/// Handlers and services only see this trait, so backends can be swapped
/// without touching request handling or validation.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Check if the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store answers
    /// - `Ok(false)` if it is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the probe itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert a new student.
    ///
    /// The caller assigns `student.id`; the repository never generates one.
    ///
    /// # Returns
    /// * `Ok(String)` - The id of the stored record
    /// * `Err(RepositoryError::Conflict)` - If the email or id is already taken
    /// * `Err(RepositoryError)` - If the write fails for any other reason
    async fn create_student(&self, student: &Student) -> RepositoryResult<String>;

    /// Fetch a student by id.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no record has this id
    /// * `Err(RepositoryError::InternalError)` - If the stored subjects are corrupted
    async fn get_student_by_id(&self, id: &str) -> RepositoryResult<Student>;

    /// Replace every field of the record identified by `student.id`.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no record has this id
    /// * `Err(RepositoryError::Conflict)` - If the new email belongs to another record
    async fn update_student(&self, student: &Student) -> RepositoryResult<()>;

    /// Remove a student.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no record has this id
    async fn delete_student(&self, id: &str) -> RepositoryResult<()>;

    /// All students, most recently created first. Empty when none exist.
    async fn list_students(&self) -> RepositoryResult<Vec<Student>>;
}
