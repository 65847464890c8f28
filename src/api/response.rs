//! Response types for the Overtime Engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::OvertimeRequest;

/// Response body for `DELETE /overtime/:user_id/:date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    /// True if a record was deleted.
    pub cancelled: bool,
    /// The deleted record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<OvertimeRequest>,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }

    /// Creates an unauthenticated error response.
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new("UNAUTHENTICATED", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            ),
            EngineError::ConfigParseError { path, message } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            ),
            EngineError::InvalidTime { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("INVALID_TIME", message),
            ),
            EngineError::InvalidInput { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(message),
            ),
            EngineError::InvalidHours { .. } => ApiErrorResponse::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "INVALID_HOURS",
                    message,
                    "The end time must be after the start time and before the credit cutoff",
                ),
            ),
            EngineError::EmployeeNotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("EMPLOYEE_NOT_FOUND", message),
            ),
            EngineError::Forbidden { .. } => ApiErrorResponse::new(
                StatusCode::FORBIDDEN,
                ApiError::new("FORBIDDEN", message),
            ),
            EngineError::DuplicateOvertime { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("DUPLICATE_OVERTIME", message),
            ),
            EngineError::SubmissionInProgress { .. } => ApiErrorResponse::new(
                StatusCode::CONFLICT,
                ApiError::new("SUBMISSION_IN_PROGRESS", message),
            ),
            EngineError::OvertimeNotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("OVERTIME_NOT_FOUND", message),
            ),
            EngineError::Storage { message: raw } => ApiErrorResponse::new(
                StatusCode::BAD_GATEWAY,
                ApiError::with_details("STORAGE_ERROR", "Storage backend failed", raw),
            ),
        }
    }
}
