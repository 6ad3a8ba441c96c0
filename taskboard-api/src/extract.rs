/// Request extractors
///
/// [`JsonBody`] and [`PathParams`] stand in for axum's `Json` and `Path` so a
/// request that cannot be decoded becomes an [`ApiError::BadFormat`] envelope
/// instead of axum's plain-text rejection.

use crate::error::{ApiError, INVALID_BODY_DESCRIPTION, INVALID_PATH_DESCRIPTION};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// JSON request body
///
/// The body is decoded as JSON whatever `Content-Type` the client sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(reason = %rejection.body_text(), "Unreadable request body");
            ApiError::BadFormat(INVALID_BODY_DESCRIPTION.to_string())
        })?;

        serde_json::from_slice(&bytes).map(JsonBody).map_err(|e| {
            tracing::debug!(error = %e, "Rejected request body");
            ApiError::BadFormat(INVALID_BODY_DESCRIPTION.to_string())
        })
    }
}

/// Path parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct PathParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParams<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParams(value)),
            Err(rejection) => {
                tracing::debug!(reason = %rejection.body_text(), "Rejected request path");
                Err(ApiError::BadFormat(INVALID_PATH_DESCRIPTION.to_string()))
            }
        }
    }
}

/// Decodes a string field where JSON `null` means the same as absent
///
/// Use together with `#[serde(default)]` so both cases reach the validator as
/// an empty string.
pub fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
