//! In-memory local repository implementation.
//!
//! Stores students in a `HashMap` guarded by a lock, enforcing the same
//! uniqueness and ordering rules as the SQLite backend. Suitable for unit
//! testing and local development.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, StudentRepository,
};
use crate::models::Student;

/// In-memory local repository.
///
/// # Example
/// ```
/// use students_api::db::repositories::LocalRepository;
/// use students_api::db::StudentRepository;
/// use students_api::models::Student;
///
/// let runtime = tokio::runtime::Runtime::new().unwrap();
/// runtime.block_on(async {
///     let repo = LocalRepository::new();
///     let mut student = Student::new("Ada", "ada@example.com");
///     student.id = "s-1".to_string();
///     repo.create_student(&student).await.unwrap();
///     assert_eq!(repo.list_students().await.unwrap().len(), 1);
/// });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    students: HashMap<String, StoredStudent>,
    // Insertion counter standing in for created_at.
    next_sequence: u64,
    is_unhealthy: bool,
}

struct StoredStudent {
    sequence: u64,
    student: Student,
}

impl LocalData {
    fn email_owner(&self, email: &str) -> Option<&str> {
        self.students
            .values()
            .find(|stored| stored.student.email == email)
            .map(|stored| stored.student.id.as_str())
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored students.
    pub fn len(&self) -> usize {
        self.data.read().students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flip the health flag reported by `health_check`.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_unhealthy = !healthy;
    }
}

#[async_trait]
impl StudentRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(!self.data.read().is_unhealthy)
    }

    async fn create_student(&self, student: &Student) -> RepositoryResult<String> {
        let mut data = self.data.write();
        if data.students.contains_key(&student.id) {
            return Err(RepositoryError::Conflict {
                message: "UNIQUE constraint failed: students.id".into(),
                context: ErrorContext::new("create_student")
                    .with_entity("student")
                    .with_entity_id(&student.id),
            });
        }
        if data.email_owner(&student.email).is_some() {
            return Err(RepositoryError::Conflict {
                message: "UNIQUE constraint failed: students.email".into(),
                context: ErrorContext::new("create_student").with_entity("student"),
            });
        }

        let sequence = data.next_sequence;
        data.next_sequence += 1;
        data.students.insert(
            student.id.clone(),
            StoredStudent {
                sequence,
                student: student.clone(),
            },
        );

        Ok(student.id.clone())
    }

    async fn get_student_by_id(&self, id: &str) -> RepositoryResult<Student> {
        self.data
            .read()
            .students
            .get(id)
            .map(|stored| stored.student.clone())
            .ok_or_else(|| not_found("get_student_by_id", id))
    }

    async fn update_student(&self, student: &Student) -> RepositoryResult<()> {
        let mut data = self.data.write();
        if !data.students.contains_key(&student.id) {
            return Err(not_found("update_student", &student.id));
        }
        if let Some(owner) = data.email_owner(&student.email) {
            if owner != student.id {
                return Err(RepositoryError::Conflict {
                    message: "UNIQUE constraint failed: students.email".into(),
                    context: ErrorContext::new("update_student")
                        .with_entity("student")
                        .with_entity_id(&student.id),
                });
            }
        }

        if let Some(stored) = data.students.get_mut(&student.id) {
            stored.student = student.clone();
        }
        Ok(())
    }

    async fn delete_student(&self, id: &str) -> RepositoryResult<()> {
        self.data
            .write()
            .students
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("delete_student", id))
    }

    async fn list_students(&self) -> RepositoryResult<Vec<Student>> {
        let data = self.data.read();
        let mut stored: Vec<&StoredStudent> = data.students.values().collect();
        stored.sort_by(|a, b| b.sequence.cmp(&a.sequence));
        Ok(stored.into_iter().map(|s| s.student.clone()).collect())
    }
}

fn not_found(operation: &str, id: &str) -> RepositoryError {
    RepositoryError::not_found_with_context(
        format!("student with id {} not found", id),
        ErrorContext::new(operation)
            .with_entity("student")
            .with_entity_id(id),
    )
}
