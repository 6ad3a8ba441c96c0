/// PostgreSQL repository
///
/// SQL is written inline next to each operation. Status values are bound
/// as their text form and decoded back through [`TaskStatus`]'s
/// `TryFrom<String>`, so a row with an unknown status fails to decode
/// instead of leaking out.
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::password::PasswordStorage;
/// use taskboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskboard_shared::models::task::CreateTask;
/// use taskboard_shared::repository::{postgres::PgRepository, Repository};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// let repo = PgRepository::new(pool, PasswordStorage::Plain.encoder());
///
/// let task_id = repo.create_task(CreateTask::new(1, "write report")).await?;
/// let task = repo.get_task_by_id(task_id).await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::{DatabaseContext, RepoError, RepoResult, Repository, TASK, USER};
use crate::auth::password::PasswordEncoder;
use crate::models::task::{CreateTask, Task, TaskStatus};
use crate::models::user::CreateUser;

const TASK_COLUMNS: &str = "id, user_id, title, description, status, created_at";

/// [`Repository`] backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
    encoder: Arc<dyn PasswordEncoder>,
}

impl PgRepository {
    /// Creates a repository over `pool`, storing credentials through `encoder`
    pub fn new(pool: PgPool, encoder: Arc<dyn PasswordEncoder>) -> Self {
        Self { pool, encoder }
    }

    /// Underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn user_exists(&self, user_id: i32) -> RepoResult<bool> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .context("check user")?;

        Ok(exists)
    }

    async fn user_name_exists(&self, name: &str) -> RepoResult<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .context("check user name")?;

        Ok(exists)
    }
}

impl std::fmt::Debug for PgRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgRepository")
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Repository for PgRepository {
    async fn create_task(&self, task: CreateTask) -> RepoResult<i32> {
        // Conditional insert: no row comes back when the user is missing.
        let id: Option<(i32,)> = sqlx::query_as(
            r#"
            INSERT INTO tasks (user_id, title, description, status)
            SELECT $1, $2, $3, $4
            WHERE EXISTS (SELECT 1 FROM users WHERE id = $1)
            RETURNING id
            "#,
        )
        .bind(task.user_id)
        .bind(&task.title)
        .bind(&task.data)
        .bind(task.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .context("insert task")?;

        match id {
            Some((id,)) => {
                tracing::debug!(task_id = id, user_id = task.user_id, "Task created");
                Ok(id)
            }
            None => Err(RepoError::NotFound(USER)),
        }
    }

    async fn get_all_tasks(&self) -> RepoResult<Vec<Task>> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks ORDER BY id",
            TASK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .context("list tasks")
    }

    async fn get_task_by_id(&self, id: i32) -> RepoResult<Task> {
        sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("get task")?
            .ok_or(RepoError::NotFound(TASK))
    }

    async fn get_all_tasks_by_user_id(&self, user_id: i32) -> RepoResult<Vec<Task>> {
        if !self.user_exists(user_id).await? {
            return Err(RepoError::NotFound(USER));
        }

        sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY id",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("list tasks by user")
    }

    async fn get_last_task_by_user_id(&self, user_id: i32) -> RepoResult<Task> {
        if !self.user_exists(user_id).await? {
            return Err(RepoError::NotFound(USER));
        }

        // id breaks ties between tasks created in the same instant
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .context("get last task")?
        .ok_or(RepoError::NotFound(TASK))
    }

    async fn get_tasks_by_user_name(&self, name: &str) -> RepoResult<Vec<Task>> {
        if !self.user_name_exists(name).await? {
            return Err(RepoError::NotFound(USER));
        }

        sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.user_id, t.title, t.description, t.status, t.created_at
            FROM users u
            JOIN tasks t ON t.user_id = u.id
            WHERE u.username = $1
            ORDER BY t.id
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .context("list tasks by user name")
    }

    async fn update_status_by_id(&self, id: i32, status: TaskStatus) -> RepoResult<()> {
        let result = sqlx::query("UPDATE tasks SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("update task status")?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(TASK));
        }

        tracing::debug!(task_id = id, status = %status, "Task status updated");
        Ok(())
    }

    async fn delete_task_by_id(&self, id: i32) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete task")?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(TASK));
        }

        tracing::debug!(task_id = id, "Task deleted");
        Ok(())
    }

    async fn create_user(&self, user: CreateUser) -> RepoResult<i32> {
        let stored = self.encoder.encode(&user.password)?;

        let (id,): (i32,) =
            sqlx::query_as("INSERT INTO users (username, password) VALUES ($1, $2) RETURNING id")
                .bind(&user.name)
                .bind(stored)
                .fetch_one(&self.pool)
                .await
                .context("insert user")?;

        tracing::debug!(user_id = id, "User created");
        Ok(id)
    }

    async fn ping(&self) -> RepoResult<()> {
        crate::db::pool::health_check(&self.pool)
            .await
            .context("ping database")
    }
}
