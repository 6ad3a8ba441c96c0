/// Task endpoints
///
/// Every handler runs the same pipeline: decode the request, validate it
/// against the registry in [`AppState`], call the repository, wrap the
/// outcome in an [`Envelope`].
///
/// # Endpoints
///
/// ```text
/// POST   /v1/tasks                          create a task
/// GET    /v1/tasks/all                      list every task
/// GET    /v1/tasks/:id                      one task
/// PUT    /v1/tasks/:id/:status              change status
/// DELETE /v1/tasks/:id                      delete a task
/// GET    /v1/tasks/users/:user              tasks of a user (numeric id or name)
/// GET    /v1/tasks/users/:user/last         most recent task of a user id
/// GET    /v1/tasks/users/by-name/:username  tasks of a user name
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{null_as_empty, JsonBody, PathParams},
    response::Envelope,
};
use axum::extract::State;
use serde::{Deserialize, Serialize};
use taskboard_shared::models::id_string;
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus, DEFAULT_TASK_DATA};
use taskboard_shared::validation::rules::{
    parse_int_string, validate_int_string, validate_task_status,
};
use taskboard_shared::validation::{FieldViolation, RequestRules, ValidationKind};
use validator::Validate;

/// Body of `POST /v1/tasks`
///
/// Missing and `null` fields decode as empty strings so the validator can
/// report them as required.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, code = "required"))]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_task_status"))]
    pub status: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(
        length(min = 1, code = "required"),
        custom(function = "validate_int_string")
    )]
    pub user_id: String,
}

impl RequestRules for CreateTaskRequest {
    const NAME: &'static str = "CreateTaskRequest";
    const FIELDS: &'static [(&'static str, &'static str)] = &[
        ("title", "Title"),
        ("data", "Data"),
        ("status", "Status"),
        ("user_id", "UserID"),
    ];
}

impl CreateTaskRequest {
    /// Converts a validated request into repository input
    fn into_create_task(self) -> ApiResult<CreateTask> {
        let user_id = parse_id::<Self>(&self.user_id, "UserID")?;

        let status = if self.status.is_empty() {
            TaskStatus::default()
        } else {
            self.status
                .parse()
                .map_err(|_| FieldViolation::of::<Self>(ValidationKind::InvalidFormat, "Status"))?
        };

        let data = if self.data.is_empty() {
            DEFAULT_TASK_DATA.to_string()
        } else {
            self.data
        };

        Ok(CreateTask {
            user_id,
            title: self.title,
            data,
            status,
        })
    }
}

/// Task ID taken from the path
#[derive(Debug, Clone, Default, Validate)]
pub struct TaskIdRequest {
    #[validate(
        length(min = 1, code = "required"),
        custom(function = "validate_int_string")
    )]
    pub id: String,
}

impl RequestRules for TaskIdRequest {
    const NAME: &'static str = "TaskIdRequest";
    const FIELDS: &'static [(&'static str, &'static str)] = &[("id", "ID")];
}

/// User ID taken from the path
#[derive(Debug, Clone, Default, Validate)]
pub struct UserIdRequest {
    #[validate(
        length(min = 1, code = "required"),
        custom(function = "validate_int_string")
    )]
    pub id: String,
}

impl RequestRules for UserIdRequest {
    const NAME: &'static str = "UserIdRequest";
    const FIELDS: &'static [(&'static str, &'static str)] = &[("id", "ID")];
}

/// Task ID and new status taken from the path
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateStatusRequest {
    #[validate(
        length(min = 1, code = "required"),
        custom(function = "validate_int_string")
    )]
    pub id: String,

    #[validate(
        length(min = 1, code = "required"),
        custom(function = "validate_task_status")
    )]
    pub status: String,
}

impl RequestRules for UpdateStatusRequest {
    const NAME: &'static str = "UpdateStatusRequest";
    const FIELDS: &'static [(&'static str, &'static str)] = &[("id", "ID"), ("status", "Status")];
}

/// User name taken from the path
#[derive(Debug, Clone, Default, Validate)]
pub struct UserNameRequest {
    #[validate(length(min = 1, code = "required"))]
    pub name: String,
}

impl RequestRules for UserNameRequest {
    const NAME: &'static str = "UserNameRequest";
    const FIELDS: &'static [(&'static str, &'static str)] = &[("name", "Name")];
}

/// Payload of a successful create
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    #[serde(with = "id_string")]
    pub task_id: i32,
}

fn is_integer_shaped(segment: &str) -> bool {
    let digits = segment
        .strip_prefix(|c| c == '+' || c == '-')
        .unwrap_or(segment);

    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn parse_id<T: RequestRules>(value: &str, field: &'static str) -> ApiResult<i32> {
    parse_int_string(value)
        .ok_or_else(|| FieldViolation::of::<T>(ValidationKind::InvalidIntString, field).into())
}

/// POST /v1/tasks
pub async fn create_task(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateTaskRequest>,
) -> ApiResult<Envelope<CreateTaskResponse>> {
    state.validator.validate(&request)?;
    let task = request.into_create_task()?;

    let task_id = state.repo.create_task(task).await?;
    tracing::info!(task_id, "Task created");

    Ok(Envelope::success(CreateTaskResponse { task_id }))
}

/// GET /v1/tasks/all
pub async fn get_all_tasks(State(state): State<AppState>) -> ApiResult<Envelope<Vec<Task>>> {
    let tasks = state.repo.get_all_tasks().await?;
    Ok(Envelope::success(tasks))
}

/// GET /v1/tasks/:id
pub async fn get_task_by_id(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
) -> ApiResult<Envelope<Task>> {
    let request = TaskIdRequest { id };
    state.validator.validate(&request)?;
    let id = parse_id::<TaskIdRequest>(&request.id, "ID")?;

    let task = state.repo.get_task_by_id(id).await?;
    Ok(Envelope::success(task))
}

/// GET /v1/tasks/users/:user
///
/// A segment shaped like an integer (optional sign, then digits) is a user
/// ID and is validated as one, so out-of-range IDs are rejected rather than
/// looked up as names. Anything else is a user name.
pub async fn get_tasks_by_user(
    State(state): State<AppState>,
    PathParams(user): PathParams<String>,
) -> ApiResult<Envelope<Vec<Task>>> {
    if is_integer_shaped(&user) {
        tasks_by_user_id(&state, user).await
    } else {
        tasks_by_user_name(&state, user).await
    }
}

/// GET /v1/tasks/users/by-name/:username
pub async fn get_tasks_by_user_name(
    State(state): State<AppState>,
    PathParams(name): PathParams<String>,
) -> ApiResult<Envelope<Vec<Task>>> {
    tasks_by_user_name(&state, name).await
}

/// GET /v1/tasks/users/:user/last
pub async fn get_last_task_by_user_id(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
) -> ApiResult<Envelope<Task>> {
    let request = UserIdRequest { id };
    state.validator.validate(&request)?;
    let user_id = parse_id::<UserIdRequest>(&request.id, "ID")?;

    let task = state.repo.get_last_task_by_user_id(user_id).await?;
    Ok(Envelope::success(task))
}

/// PUT /v1/tasks/:id/:status
pub async fn update_status_by_id(
    State(state): State<AppState>,
    PathParams((id, status)): PathParams<(String, String)>,
) -> ApiResult<Envelope<()>> {
    let request = UpdateStatusRequest { id, status };
    state.validator.validate(&request)?;

    let id = parse_id::<UpdateStatusRequest>(&request.id, "ID")?;
    let status: TaskStatus = request.status.parse().map_err(|_| {
        ApiError::from(FieldViolation::of::<UpdateStatusRequest>(
            ValidationKind::InvalidFormat,
            "Status",
        ))
    })?;

    state.repo.update_status_by_id(id, status).await?;
    tracing::info!(task_id = id, status = %status, "Task status updated");

    Ok(Envelope::empty())
}

/// DELETE /v1/tasks/:id
pub async fn delete_task_by_id(
    State(state): State<AppState>,
    PathParams(id): PathParams<String>,
) -> ApiResult<Envelope<()>> {
    let request = TaskIdRequest { id };
    state.validator.validate(&request)?;
    let id = parse_id::<TaskIdRequest>(&request.id, "ID")?;

    state.repo.delete_task_by_id(id).await?;
    tracing::info!(task_id = id, "Task deleted");

    Ok(Envelope::empty())
}

async fn tasks_by_user_id(state: &AppState, id: String) -> ApiResult<Envelope<Vec<Task>>> {
    let request = UserIdRequest { id };
    state.validator.validate(&request)?;
    let user_id = parse_id::<UserIdRequest>(&request.id, "ID")?;

    let tasks = state.repo.get_all_tasks_by_user_id(user_id).await?;
    Ok(Envelope::success(tasks))
}

async fn tasks_by_user_name(state: &AppState, name: String) -> ApiResult<Envelope<Vec<Task>>> {
    let request = UserNameRequest { name };
    state.validator.validate(&request)?;

    let tasks = state.repo.get_tasks_by_user_name(&request.name).await?;
    Ok(Envelope::success(tasks))
}
