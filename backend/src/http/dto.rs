//! Data Transfer Objects for the HTTP API.
//!
//! Payloads placed in the `data` field of the response envelope, plus the
//! request body decoder.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use tracing::warn;

use super::error::AppError;
use crate::models::Student;

/// `data` of a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCreatedData {
    pub student: Student,
    pub id: String,
}

/// `data` of a single-record read or replace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentData {
    pub student: Student,
}

/// `data` of a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentListData {
    pub students: Vec<Student>,
    pub total: usize,
}

/// `data` of a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedData {
    pub id: String,
}

/// `data` of the health probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthData {
    pub database: String,
}

/// Decode a request body into a [`Student`].
///
/// Failures are classified so the client can tell an empty body, truncated
/// JSON, a syntax error and a type mismatch apart.
pub fn decode_student(body: &[u8]) -> Result<Student, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest("request body is empty".to_string()));
    }

    serde_json::from_slice(body).map_err(|err| {
        warn!(error = %err, "error decoding json");
        match err.classify() {
            Category::Eof => AppError::BadRequest("malformed json".to_string()),
            Category::Syntax => AppError::JsonParse(format!("json syntax error: {}", err)),
            Category::Data => AppError::BadRequest("invalid data type in JSON body".to_string()),
            Category::Io => AppError::JsonParse(format!("error parsing json: {}", err)),
        }
    })
}
