//! Common test utilities for API tests
//!
//! This module provides shared infrastructure for API tests:
//! - An in-memory `Repository` that counts calls
//! - A `TestApp` wrapping the real router
//! - Request and response helpers

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::ApiConfig;
use taskboard_shared::auth::token::StaticTokenAuthorizer;
use taskboard_shared::models::task::{CreateTask, Task, TaskStatus};
use taskboard_shared::models::user::{CreateUser, User};
use taskboard_shared::repository::{RepoError, RepoResult, Repository, TASK, USER};
use tower::Service as _;

/// Token accepted by the test router
pub const TOKEN: &str = "test-token";

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
    next_user_id: i32,
    next_task_id: i32,
}

/// Repository backed by vectors
///
/// Mirrors the PostgreSQL adapter's not-found policy. `calls` counts every
/// operation so tests can assert that invalid requests never reach storage.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
    calls: AtomicUsize,
    fail: bool,
}

impl InMemoryRepository {
    /// Repository whose every operation fails with a database error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Number of operations invoked so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of stored tasks
    pub fn task_count(&self) -> usize {
        self.tables.lock().unwrap().tasks.len()
    }

    fn enter(&self, operation: &'static str) -> RepoResult<std::sync::MutexGuard<'_, Tables>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail {
            return Err(RepoError::Database {
                operation,
                source: sqlx::Error::PoolTimedOut,
            });
        }

        Ok(self.tables.lock().unwrap())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_task(&self, task: CreateTask) -> RepoResult<i32> {
        let mut tables = self.enter("insert task")?;

        if !tables.users.iter().any(|u| u.id == task.user_id) {
            return Err(RepoError::NotFound(USER));
        }

        tables.next_task_id += 1;
        let id = tables.next_task_id;

        // Strictly increasing timestamps keep "last" well defined.
        let created_at = Utc::now() + Duration::milliseconds(id as i64);

        tables.tasks.push(Task {
            id,
            user_id: task.user_id,
            title: task.title,
            data: task.data,
            status: task.status,
            created_at,
        });

        Ok(id)
    }

    async fn get_all_tasks(&self) -> RepoResult<Vec<Task>> {
        let tables = self.enter("list tasks")?;
        Ok(tables.tasks.clone())
    }

    async fn get_task_by_id(&self, id: i32) -> RepoResult<Task> {
        let tables = self.enter("get task")?;

        tables
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(RepoError::NotFound(TASK))
    }

    async fn get_all_tasks_by_user_id(&self, user_id: i32) -> RepoResult<Vec<Task>> {
        let tables = self.enter("list tasks by user")?;

        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(RepoError::NotFound(USER));
        }

        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_last_task_by_user_id(&self, user_id: i32) -> RepoResult<Task> {
        let tables = self.enter("get last task")?;

        if !tables.users.iter().any(|u| u.id == user_id) {
            return Err(RepoError::NotFound(USER));
        }

        tables
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .max_by_key(|t| (t.created_at, t.id))
            .cloned()
            .ok_or(RepoError::NotFound(TASK))
    }

    async fn get_tasks_by_user_name(&self, name: &str) -> RepoResult<Vec<Task>> {
        let tables = self.enter("list tasks by user name")?;

        let user_id = tables
            .users
            .iter()
            .find(|u| u.name == name)
            .map(|u| u.id)
            .ok_or(RepoError::NotFound(USER))?;

        Ok(tables
            .tasks
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_status_by_id(&self, id: i32, status: TaskStatus) -> RepoResult<()> {
        let mut tables = self.enter("update task status")?;

        let task = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(RepoError::NotFound(TASK))?;

        task.status = status;
        Ok(())
    }

    async fn delete_task_by_id(&self, id: i32) -> RepoResult<()> {
        let mut tables = self.enter("delete task")?;

        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != id);

        if tables.tasks.len() == before {
            return Err(RepoError::NotFound(TASK));
        }

        Ok(())
    }

    async fn create_user(&self, user: CreateUser) -> RepoResult<i32> {
        let mut tables = self.enter("insert user")?;

        if tables.users.iter().any(|u| u.name == user.name) {
            return Err(RepoError::Database {
                operation: "insert user",
                source: sqlx::Error::Protocol("duplicate user name".into()),
            });
        }

        tables.next_user_id += 1;
        let id = tables.next_user_id;

        tables.users.push(User {
            id,
            name: user.name,
            password: user.password,
            created_at: Utc::now(),
        });

        Ok(id)
    }

    async fn ping(&self) -> RepoResult<()> {
        self.enter("ping database").map(|_| ())
    }
}

/// Router wired to an in-memory repository
pub struct TestApp {
    pub app: axum::Router,
    pub repo: Arc<InMemoryRepository>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_repo(InMemoryRepository::default())
    }

    pub fn with_repo(repo: InMemoryRepository) -> Self {
        let repo = Arc::new(repo);
        let state = AppState::new(
            repo.clone(),
            Arc::new(StaticTokenAuthorizer::new(TOKEN)),
            ApiConfig::default(),
        );

        Self {
            app: build_router(state),
            repo,
        }
    }

    /// Returns authorization header value
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", TOKEN)
    }

    /// Sends an authorized request and returns status and JSON body
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("authorization", self.auth_header());

        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    /// Sends a raw request and returns status and JSON body
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Creates a user through the API and returns its ID string
    pub async fn create_user(&self, name: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/v1/users",
                Some(serde_json::json!({ "name": name, "password": "p" })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "create user failed: {}", body);
        body["data"]["user_id"].as_str().unwrap().to_string()
    }

    /// Creates a task through the API and returns its ID string
    pub async fn create_task(&self, user_id: &str, title: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/v1/tasks",
                Some(serde_json::json!({ "title": title, "user_id": user_id })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "create task failed: {}", body);
        body["data"]["task_id"].as_str().unwrap().to_string()
    }
}

/// Asserts an error envelope with the given code
pub fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["status"], "error", "unexpected body: {}", body);
    assert_eq!(body["error"]["code"], code, "unexpected body: {}", body);
}
