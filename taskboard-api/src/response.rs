/// Response envelope
///
/// Every `/v1` response body has the same shape:
///
/// ```json
/// { "status": "success", "data": { "task_id": "42" } }
/// { "status": "success" }
/// { "status": "error", "error": { "code": "not_found", "description": "task not found" } }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Outcome marker in the envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// Error body inside the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable code (e.g. `field_incorrect`)
    pub code: String,

    /// Human-readable description
    pub description: String,
}

/// Response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: Status,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl<T: Serialize> Envelope<T> {
    /// Successful envelope carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    /// Successful envelope without a payload
    pub fn empty() -> Self {
        Self {
            status: Status::Success,
            data: None,
            error: None,
        }
    }

    /// Error envelope
    pub fn error(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            data: None,
            error: Some(ErrorBody {
                code: code.into(),
                description: description.into(),
            }),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
