//! HTTP response types for the stage-execution API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::types::{Error, StoreError};

/// Site template identity reported by the stage endpoint
pub const TEMPLATE_NAME: &str = "Astro";

/// Result of a stage-execution request
///
/// `success` mirrors the subprocess exit code; stdout/stderr stay in the
/// server logs.
#[derive(Debug, Serialize)]
pub struct StageResponse {
    pub name: &'static str,
    pub stage: String,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub duration_ms: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub config_present: bool,
}

/// Standard error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error: &Error) -> Self {
        Self {
            error: error.to_string(),
            code: error_to_code(error),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Convert error types to API error codes
fn error_to_code(error: &Error) -> String {
    match error {
        Error::Catalog(_) => "CATALOG_ERROR".to_string(),
        Error::Template(_) => "TEMPLATE_ERROR".to_string(),
        Error::Store(StoreError::NotFound { .. }) => "CONFIG_NOT_FOUND".to_string(),
        Error::Store(StoreError::Parse(_)) => "CONFIG_PARSE_ERROR".to_string(),
        Error::Store(_) => "CONFIG_STORE_ERROR".to_string(),
        Error::Scaffold(_) => "SCAFFOLD_ERROR".to_string(),
        Error::Execution(_) => "EXECUTION_ERROR".to_string(),
        Error::Validation { .. } => "VALIDATION_ERROR".to_string(),
        Error::Io(_) => "IO_ERROR".to_string(),
    }
}

/// Convert error types to HTTP status codes
pub fn error_to_status_code(error: &Error) -> StatusCode {
    match error {
        Error::Validation { .. } => StatusCode::BAD_REQUEST,
        Error::Store(StoreError::NotFound { .. }) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = error_to_status_code(&self);
        let error_response = ErrorResponse::new(&self);
        (status_code, Json(error_response)).into_response()
    }
}
