/// Task model
///
/// A task is a unit of work owned by a user, with a bounded status.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id SERIAL PRIMARY KEY,
///     user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL DEFAULT 'new',
///     status TEXT NOT NULL DEFAULT 'new' CHECK (status IN ('new', 'in_progress', 'done')),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// The free-text payload is stored in `description` and exposed as `data`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::id_string;

/// Value stored in `data` when a task is created without one
pub const DEFAULT_TASK_DATA: &str = "new";

/// Task status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Freshly created
    #[default]
    New,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [TaskStatus; 3] = [TaskStatus::New, TaskStatus::InProgress, TaskStatus::Done];

    /// Converts status to its database/wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::New => "new",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known statuses
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Task ID
    #[serde(with = "id_string")]
    pub id: i32,

    /// Owning user
    #[serde(with = "id_string")]
    pub user_id: i32,

    /// Title
    pub title: String,

    /// Free-text payload
    #[sqlx(rename = "description")]
    pub data: String,

    /// Current status
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTask {
    /// Owning user; the insert is skipped if this user does not exist
    pub user_id: i32,

    /// Title
    pub title: String,

    /// Free-text payload
    pub data: String,

    /// Initial status
    pub status: TaskStatus,
}

impl CreateTask {
    /// Builds a task in the `new` state with the default payload
    pub fn new(user_id: i32, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
            data: DEFAULT_TASK_DATA.to_string(),
            status: TaskStatus::New,
        }
    }
}
