/// User endpoints
///
/// ```text
/// POST /v1/users   {"name": "alice", "password": "p"}  ->  {"user_id": "1"}
/// ```

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{null_as_empty, JsonBody},
    response::Envelope,
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use taskboard_shared::models::id_string;
use taskboard_shared::models::user::CreateUser;
use taskboard_shared::validation::RequestRules;
use validator::Validate;

/// Body of `POST /v1/users`
#[derive(Clone, Default, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required"))]
    pub name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required"))]
    pub password: String,
}

impl std::fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl RequestRules for CreateUserRequest {
    const NAME: &'static str = "CreateUserRequest";
    const FIELDS: &'static [(&'static str, &'static str)] =
        &[("name", "Name"), ("password", "Password")];
}

/// Payload of a successful create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    #[serde(with = "id_string")]
    pub user_id: i32,
}

/// POST /v1/users
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> ApiResult<Envelope<CreateUserResponse>> {
    state.validator.validate(&request)?;

    let user_id = state
        .repo
        .create_user(CreateUser {
            name: request.name,
            password: request.password,
        })
        .await?;

    tracing::info!(user_id, "User created");

    Ok(Envelope::success(CreateUserResponse { user_id }))
}
