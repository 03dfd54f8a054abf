//! HTTP handlers for the REST API.
//!
//! Each handler decodes and checks its input, calls the repository and
//! wraps the outcome in an [`ApiResponse`].

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{Method, StatusCode, Uri},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::dto::{
    decode_student, DeletedData, HealthData, StudentCreatedData, StudentData, StudentListData,
};
use super::error::AppError;
use super::response::ApiResponse;
use super::state::AppState;
use crate::services::{
    quick_check, validate_required_fields, validate_student, validate_update_fields,
};

/// Result type for handlers.
pub type HandlerResult = Result<ApiResponse, AppError>;

fn body_bytes(body: Result<Bytes, BytesRejection>) -> Result<Bytes, AppError> {
    body.map_err(|rejection| {
        warn!(error = %rejection, "failed to read request body");
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    })
}

// =============================================================================
// Service
// =============================================================================

/// GET /
pub async fn hello_world() -> &'static str {
    "Hello, World!"
}

/// GET /health
///
/// Reports whether the storage backend answers.
pub async fn health_check(State(state): State<AppState>) -> ApiResponse {
    match state.repository.health_check().await {
        Ok(true) => ApiResponse::success(
            "service is healthy",
            HealthData {
                database: "connected".to_string(),
            },
        ),
        Ok(false) => {
            warn!("health check: database reported unhealthy");
            ApiResponse::service_unavailable("database is not available")
        }
        Err(e) => {
            error!(error = %e, "health check failed");
            ApiResponse::service_unavailable("database is not available")
        }
    }
}

// =============================================================================
// Student CRUD
// =============================================================================

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let body = body_bytes(body)?;
    let mut student = decode_student(&body)?;

    quick_check(&student).map_err(AppError::InvalidField)?;

    let result = validate_student(&student);
    if !result.is_valid {
        return Err(AppError::Validation(result.errors));
    }

    student.id = Uuid::new_v4().to_string();

    let id = state
        .repository
        .create_student(&student)
        .await
        .map_err(|e| {
            if e.is_conflict() {
                AppError::Repository(e)
            } else {
                error!(error = %e, "failed to save student to database");
                AppError::Internal("failed to save student".to_string())
            }
        })?;

    info!(student_id = %id, "student created");
    Ok(ApiResponse::created(
        "Student added successfully",
        StudentCreatedData { student, id },
    ))
}

/// GET /api/students
pub async fn list_students(State(state): State<AppState>) -> HandlerResult {
    let students = state.repository.list_students().await?;
    let total = students.len();

    Ok(ApiResponse::success(
        "Students retrieved successfully",
        StudentListData { students, total },
    ))
}

/// GET /api/students/{id}
pub async fn get_student(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let student = state.repository.get_student_by_id(&id).await?;

    Ok(ApiResponse::success(
        "Student retrieved successfully",
        StudentData { student },
    ))
}

/// PUT /api/students/{id}
///
/// Full replacement. The id in the path wins over any id in the body.
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Bytes, BytesRejection>,
) -> HandlerResult {
    let body = body_bytes(body)?;
    let mut student = decode_student(&body)?;
    student.id = id;

    let missing = validate_required_fields(&student);
    if !missing.is_empty() {
        return Err(AppError::MissingFields(missing));
    }

    let result = validate_update_fields(&student);
    if !result.is_valid {
        return Err(AppError::Validation(result.errors));
    }

    state.repository.update_student(&student).await?;

    info!(student_id = %student.id, "student updated");
    Ok(ApiResponse::success(
        "Student updated successfully",
        StudentData { student },
    ))
}

/// DELETE /api/students/{id}
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult {
    state.repository.delete_student(&id).await?;

    info!(student_id = %id, "student deleted");
    Ok(ApiResponse::success(
        "Student deleted successfully",
        DeletedData { id },
    ))
}

// =============================================================================
// Fallbacks
// =============================================================================

/// Any unmatched path.
pub async fn not_found(method: Method, uri: Uri) -> ApiResponse {
    ApiResponse::not_found(format!("no route for {} {}", method, uri.path()))
}

/// A known path with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiResponse {
    ApiResponse::client_error(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("method {} not allowed for {}", method, uri.path()),
    )
}
