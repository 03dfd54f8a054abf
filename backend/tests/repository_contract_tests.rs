//! Behaviour every `StudentRepository` backend must share.
//!
//! Each check is written once against `&dyn StudentRepository` and run for
//! the in-memory backend and, when enabled, the SQLite backend.

mod support;

use std::sync::Arc;

use students_api::db::repositories::LocalRepository;
use students_api::db::repository::{RepositoryError, StudentRepository};
use support::sample_student;

async fn check_create_and_get(repo: &dyn StudentRepository) {
    let student = sample_student("s-1", "one@example.com");
    let id = repo.create_student(&student).await.unwrap();
    assert_eq!(id, "s-1");

    let loaded = repo.get_student_by_id("s-1").await.unwrap();
    assert_eq!(loaded, student);
}

async fn check_duplicate_email_conflicts(repo: &dyn StudentRepository) {
    repo.create_student(&sample_student("s-1", "same@example.com"))
        .await
        .unwrap();

    let err = repo
        .create_student(&sample_student("s-2", "same@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "unexpected error: {err}");

    let fresh = repo
        .create_student(&sample_student("s-3", "other@example.com"))
        .await
        .unwrap();
    assert_eq!(fresh, "s-3");
    assert_eq!(repo.list_students().await.unwrap().len(), 2);
}

async fn check_unknown_ids_are_not_found(repo: &dyn StudentRepository) {
    let err = repo.get_student_by_id("missing").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.context().entity_id.as_deref(), Some("missing"));

    let err = repo
        .update_student(&sample_student("missing", "m@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));

    let err = repo.delete_student("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

async fn check_empty_list_is_ok(repo: &dyn StudentRepository) {
    let students = repo.list_students().await.unwrap();
    assert!(students.is_empty());
}

async fn check_subjects_round_trip_in_order(repo: &dyn StudentRepository) {
    let student = sample_student("s-1", "subjects@example.com")
        .with_subjects(["Zoology", "Algebra", "Music", "Algebra"]);
    repo.create_student(&student).await.unwrap();

    let loaded = repo.get_student_by_id("s-1").await.unwrap();
    assert_eq!(loaded.subjects, vec!["Zoology", "Algebra", "Music", "Algebra"]);

    let empty = sample_student("s-2", "empty@example.com").with_subjects(Vec::<String>::new());
    repo.create_student(&empty).await.unwrap();
    assert!(repo.get_student_by_id("s-2").await.unwrap().subjects.is_empty());
}

async fn check_list_is_newest_first(repo: &dyn StudentRepository) {
    for (id, email) in [("a", "a@example.com"), ("b", "b@example.com"), ("c", "c@example.com")] {
        repo.create_student(&sample_student(id, email)).await.unwrap();
    }

    let ids: Vec<String> = repo
        .list_students()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["c", "b", "a"]);
}

async fn check_update_replaces_record(repo: &dyn StudentRepository) {
    repo.create_student(&sample_student("s-1", "before@example.com"))
        .await
        .unwrap();

    let mut replacement = sample_student("s-1", "after@example.com").with_subjects(["Chemistry"]);
    replacement.name = "Renamed".to_string();
    replacement.enrolled = false;
    repo.update_student(&replacement).await.unwrap();

    assert_eq!(repo.get_student_by_id("s-1").await.unwrap(), replacement);
}

async fn check_update_to_taken_email_conflicts(repo: &dyn StudentRepository) {
    repo.create_student(&sample_student("s-1", "first@example.com"))
        .await
        .unwrap();
    repo.create_student(&sample_student("s-2", "second@example.com"))
        .await
        .unwrap();

    let err = repo
        .update_student(&sample_student("s-2", "first@example.com"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(
        repo.get_student_by_id("s-2").await.unwrap().email,
        "second@example.com"
    );
}

async fn check_delete_removes_record(repo: &dyn StudentRepository) {
    repo.create_student(&sample_student("s-1", "gone@example.com"))
        .await
        .unwrap();
    repo.delete_student("s-1").await.unwrap();

    assert!(repo.get_student_by_id("s-1").await.unwrap_err().is_not_found());
    assert!(repo.delete_student("s-1").await.unwrap_err().is_not_found());

    // The email is free again.
    repo.create_student(&sample_student("s-2", "gone@example.com"))
        .await
        .unwrap();
}

async fn check_health(repo: &dyn StudentRepository) {
    assert!(repo.health_check().await.unwrap());
}

macro_rules! contract_tests {
    ($backend:ident, $make:expr) => {
        mod $backend {
            use super::*;

            #[tokio::test]
            async fn create_and_get() {
                let (repo, _guard) = $make;
                check_create_and_get(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn duplicate_email_conflicts() {
                let (repo, _guard) = $make;
                check_duplicate_email_conflicts(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn unknown_ids_are_not_found() {
                let (repo, _guard) = $make;
                check_unknown_ids_are_not_found(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn empty_list_is_ok() {
                let (repo, _guard) = $make;
                check_empty_list_is_ok(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn subjects_round_trip_in_order() {
                let (repo, _guard) = $make;
                check_subjects_round_trip_in_order(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn list_is_newest_first() {
                let (repo, _guard) = $make;
                check_list_is_newest_first(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn update_replaces_record() {
                let (repo, _guard) = $make;
                check_update_replaces_record(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn update_to_taken_email_conflicts() {
                let (repo, _guard) = $make;
                check_update_to_taken_email_conflicts(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn delete_removes_record() {
                let (repo, _guard) = $make;
                check_delete_removes_record(repo.as_ref()).await;
            }

            #[tokio::test]
            async fn health() {
                let (repo, _guard) = $make;
                check_health(repo.as_ref()).await;
            }
        }
    };
}

fn local_repo() -> (Arc<dyn StudentRepository>, ()) {
    (Arc::new(LocalRepository::new()), ())
}

contract_tests!(local, local_repo());

#[cfg(feature = "sqlite-repo")]
fn sqlite_repo() -> (Arc<dyn StudentRepository>, tempfile::TempDir) {
    use students_api::db::repositories::{SqliteConfig, SqliteRepository};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("students.db");
    let repo = SqliteRepository::new(SqliteConfig::with_path(path.to_string_lossy())).unwrap();
    (Arc::new(repo), dir)
}

#[cfg(feature = "sqlite-repo")]
contract_tests!(sqlite, sqlite_repo());
