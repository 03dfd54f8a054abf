//! HTTP error handling.
//!
//! Handlers return [`AppError`]; each variant renders as an [`ApiResponse`]
//! envelope. Server-side details are logged and never sent to the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::response::ApiResponse;
use crate::db::repository::RepositoryError;
use crate::services::FieldError;

/// Application error type for HTTP handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid request (empty body, wrong JSON types)
    #[error("{0}")]
    BadRequest(String),

    /// Body is not acceptable JSON
    #[error("Invalid JSON format: {0}")]
    JsonParse(String),

    /// Required fields absent
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The quick check rejected a single field
    #[error("Invalid field '{}': {}", .0.field, .0.message)]
    InvalidField(FieldError),

    /// Comprehensive validation failed
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The request was rejected before reaching the handler body
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Internal server error; the message is what the client sees
    #[error("{0}")]
    Internal(String),

    /// Repository error
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<AppError> for ApiResponse {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => ApiResponse::bad_request(msg),
            AppError::JsonParse(detail) => ApiResponse::json_parse_error(detail),
            AppError::MissingFields(fields) => ApiResponse::missing_fields_error(&fields),
            AppError::InvalidField(e) => ApiResponse::invalid_field_error(&e.field, &e.message),
            AppError::Validation(errors) => {
                ApiResponse::validation_error("Validation failed", json!({ "errors": errors }))
            }
            AppError::Rejected { status, message } => ApiResponse::client_error(status, message),
            AppError::NotFound(msg) => ApiResponse::not_found(msg),
            AppError::Internal(msg) => ApiResponse::internal_server_error(msg),
            AppError::Repository(e) => match e {
                RepositoryError::NotFound { .. } => ApiResponse::not_found("student not found"),
                RepositoryError::Conflict { .. } => {
                    ApiResponse::conflict("a student with this email already exists")
                }
                other => {
                    tracing::error!(error = %other, "repository operation failed");
                    ApiResponse::internal_server_error("internal server error")
                }
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ApiResponse::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response::ResponseStatus;

    #[test]
    fn test_repository_errors_map_to_status() {
        let not_found: ApiResponse = AppError::from(RepositoryError::not_found("gone")).into();
        assert_eq!(not_found.status_code, 404);

        let conflict: ApiResponse = AppError::from(RepositoryError::conflict("dup")).into();
        assert_eq!(conflict.status_code, 409);

        let internal: ApiResponse = AppError::from(RepositoryError::query("syntax")).into();
        assert_eq!(internal.status_code, 500);
        assert_eq!(internal.status, ResponseStatus::Error);
        assert!(!internal.message.contains("syntax"));
    }

    #[test]
    fn test_validation_lists_every_error() {
        let response: ApiResponse = AppError::Validation(vec![
            FieldError::new("name", "name is required"),
            FieldError::new("email", "email is required"),
        ])
        .into();

        let errors = &response.data.unwrap()["errors"];
        assert_eq!(errors[0]["field"], "name");
        assert_eq!(errors[1]["field"], "email");
    }
}
