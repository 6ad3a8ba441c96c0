/// Persistence adapter
///
/// [`Repository`] is the contract between request handlers and storage: one
/// operation per use case, each returning either a value, a
/// [`RepoError::NotFound`] naming the missing entity, or a wrapped storage
/// failure. [`postgres::PgRepository`] is the PostgreSQL implementation.
///
/// # Not-found policy
///
/// Every lookup "by user" checks that the user exists first and reports
/// `NotFound("user")` when it does not, so callers can tell a missing user
/// from a user without tasks. Task creation follows the same rule: the
/// insert is conditional on the user existing, and writing zero rows is
/// reported as `NotFound("user")`.
///
/// # Cancellation
///
/// Operations are plain futures. Dropping one (request timeout, client
/// disconnect) aborts the statement in flight; nothing is retried.

pub mod postgres;

use async_trait::async_trait;

use crate::auth::password::PasswordError;
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::CreateUser;

/// Result alias for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Entity named in [`RepoError::NotFound`]
pub const USER: &str = "user";

/// Entity named in [`RepoError::NotFound`]
pub const TASK: &str = "task";

/// Repository error
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Referenced entity is absent, or an update/delete matched no rows
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Any other storage failure, with the operation that hit it
    #[error("failed to {operation}: {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// Credential could not be encoded for storage
    #[error("failed to encode credential: {0}")]
    Credential(#[from] PasswordError),
}

impl RepoError {
    /// Returns `true` for [`RepoError::NotFound`]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound(_))
    }
}

/// Attaches the failing operation to a sqlx error
pub(crate) trait DatabaseContext<T> {
    fn context(self, operation: &'static str) -> RepoResult<T>;
}

impl<T> DatabaseContext<T> for Result<T, sqlx::Error> {
    fn context(self, operation: &'static str) -> RepoResult<T> {
        self.map_err(|source| RepoError::Database { operation, source })
    }
}

/// Data access for users and tasks
#[async_trait]
pub trait Repository: Send + Sync {
    /// Inserts a task if its user exists and returns the new task ID
    ///
    /// Returns `NotFound("user")` when the user does not exist; no row is written.
    async fn create_task(&self, task: CreateTask) -> RepoResult<i32>;

    /// Returns every task
    async fn get_all_tasks(&self) -> RepoResult<Vec<Task>>;

    /// Returns one task, or `NotFound("task")`
    async fn get_task_by_id(&self, id: i32) -> RepoResult<Task>;

    /// Returns all tasks of a user, or `NotFound("user")`
    async fn get_all_tasks_by_user_id(&self, user_id: i32) -> RepoResult<Vec<Task>>;

    /// Returns the user's most recently created task
    ///
    /// `NotFound("user")` if the user is absent, `NotFound("task")` if the
    /// user has no tasks.
    async fn get_last_task_by_user_id(&self, user_id: i32) -> RepoResult<Task>;

    /// Returns all tasks of the user with this name, or `NotFound("user")`
    async fn get_tasks_by_user_name(&self, name: &str) -> RepoResult<Vec<Task>>;

    /// Sets a task's status; `NotFound("task")` if no row matched
    async fn update_status_by_id(&self, id: i32, status: TaskStatus) -> RepoResult<()>;

    /// Deletes a task; `NotFound("task")` if no row matched
    async fn delete_task_by_id(&self, id: i32) -> RepoResult<()>;

    /// Stores a user and returns the new user ID
    ///
    /// A duplicate name surfaces as a plain database error.
    async fn create_user(&self, user: CreateUser) -> RepoResult<i32>;

    /// Checks that storage is reachable
    async fn ping(&self) -> RepoResult<()>;
}
