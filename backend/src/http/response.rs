//! Uniform JSON response envelope.
//!
//! Every JSON response has the shape
//! `{status, message?, data?, error?, status_code}` where `status` is
//! `success`, `fail` (client-caused, 4xx) or `error` (server-caused, 5xx).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Outcome category carried in the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Fail,
    Error,
}

/// The response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status_code: u16,
}

fn to_data<T: Serialize>(data: T) -> Option<Value> {
    match serde_json::to_value(data) {
        Ok(Value::Null) => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response data");
            None
        }
    }
}

impl ApiResponse {
    fn build(
        status: ResponseStatus,
        code: StatusCode,
        message: impl Into<String>,
        data: Option<Value>,
        error: Option<&str>,
    ) -> Self {
        Self {
            status,
            message: message.into(),
            data,
            error: error.map(str::to_string),
            status_code: code.as_u16(),
        }
    }

    fn fail(code: StatusCode, message: impl Into<String>, error: &str) -> Self {
        Self::build(ResponseStatus::Fail, code, message, None, Some(error))
    }

    // 2xx

    pub fn success<T: Serialize>(message: impl Into<String>, data: T) -> Self {
        Self::build(ResponseStatus::Success, StatusCode::OK, message, to_data(data), None)
    }

    pub fn created<T: Serialize>(message: impl Into<String>, data: T) -> Self {
        Self::build(
            ResponseStatus::Success,
            StatusCode::CREATED,
            message,
            to_data(data),
            None,
        )
    }

    // 4xx

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::fail(StatusCode::BAD_REQUEST, message, "Bad Request")
    }

    pub fn validation_error<T: Serialize>(message: impl Into<String>, details: T) -> Self {
        Self::build(
            ResponseStatus::Fail,
            StatusCode::BAD_REQUEST,
            message,
            to_data(details),
            Some("Validation Failed"),
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::fail(StatusCode::NOT_FOUND, message, "Resource Not Found")
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::fail(StatusCode::CONFLICT, message, "Conflict")
    }

    /// 400 for a body that is not acceptable JSON.
    pub fn json_parse_error(detail: impl std::fmt::Display) -> Self {
        Self::bad_request(format!("Invalid JSON format: {}", detail))
    }

    pub fn missing_fields_error(fields: &[&str]) -> Self {
        let message = if fields.is_empty() {
            "Missing required fields".to_string()
        } else {
            format!("Missing required fields: {}", fields.join(", "))
        };
        Self::validation_error(message, json!({ "missing_fields": fields }))
    }

    pub fn invalid_field_error(field: &str, reason: &str) -> Self {
        Self::validation_error(
            format!("Invalid field '{}': {}", field, reason),
            json!({ "invalid_field": field, "reason": reason }),
        )
    }

    /// Any other client error, labelled with the status' canonical reason.
    pub fn client_error(code: StatusCode, message: impl Into<String>) -> Self {
        let reason = code.canonical_reason().unwrap_or("Client Error");
        Self::fail(code, message, reason)
    }

    // 5xx

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::build(
            ResponseStatus::Error,
            StatusCode::INTERNAL_SERVER_ERROR,
            message,
            None,
            Some("Internal Server Error"),
        )
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::build(
            ResponseStatus::Error,
            StatusCode::SERVICE_UNAVAILABLE,
            message,
            None,
            Some("Service Unavailable"),
        )
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}
