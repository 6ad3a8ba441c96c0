/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; errors render as the error
/// envelope from [`crate::response`].
///
/// | Variant | HTTP | code |
/// |---|---|---|
/// | `BadFormat` | 400 | `bad_format` |
/// | `FieldIncorrect` | 400 | `field_incorrect` |
/// | `Unauthorized` | 401 | `unauthorized` |
/// | `NotFound` | 404 | `not_found` |
/// | `InternalError` | 500 | `internal_error` |
///
/// # Example
///
/// ```
/// use taskboard_api::error::{ApiError, ApiResult};
///
/// fn parse_id(raw: &str) -> ApiResult<i32> {
///     raw.parse().map_err(|_| ApiError::BadFormat("Invalid request body".to_string()))
/// }
/// ```

use crate::response::Envelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use taskboard_shared::repository::RepoError;
use taskboard_shared::validation::FieldViolation;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Description returned for every internal failure
pub const INTERNAL_ERROR_DESCRIPTION: &str = "Internal server error";

/// Description returned when a request body cannot be decoded
pub const INVALID_BODY_DESCRIPTION: &str = "Invalid request body";

/// Description of a `bad_format` error for a path that cannot be decoded
pub const INVALID_PATH_DESCRIPTION: &str = "Invalid request path";

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Request could not be decoded (400)
    BadFormat(String),

    /// Request decoded but a field broke its rules (400)
    FieldIncorrect(String),

    /// Missing or rejected bearer token (401)
    Unauthorized(String),

    /// Referenced entity does not exist (404)
    NotFound(String),

    /// Anything else (500); the message is logged, never returned
    InternalError(String),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadFormat(_) | ApiError::FieldIncorrect(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Envelope error code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadFormat(_) => "bad_format",
            ApiError::FieldIncorrect(_) => "field_incorrect",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::NotFound(_) => "not_found",
            ApiError::InternalError(_) => "internal_error",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadFormat(msg) => write!(f, "Bad format: {}", msg),
            ApiError::FieldIncorrect(msg) => write!(f, "Field incorrect: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let description = match self {
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!(error = %msg, "Internal error");
                INTERNAL_ERROR_DESCRIPTION.to_string()
            }
            ApiError::BadFormat(msg)
            | ApiError::FieldIncorrect(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::NotFound(msg) => {
                tracing::warn!(code, description = %msg, "Request failed");
                msg
            }
        };

        (status, Json(Envelope::error(code, description))).into_response()
    }
}

/// Convert validation failures to API errors
impl From<FieldViolation> for ApiError {
    fn from(violation: FieldViolation) -> Self {
        ApiError::FieldIncorrect(violation.to_string())
    }
}

/// Convert repository errors to API errors
impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(entity) => ApiError::NotFound(format!("{} not found", entity)),
            other => ApiError::InternalError(error_chain(&other)),
        }
    }
}

/// Renders an error with all of its sources
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }

    message
}
