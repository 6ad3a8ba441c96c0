/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use taskboard_shared::auth::token::StaticTokenAuthorizer;
/// use taskboard_shared::db::pool::create_pool;
/// use taskboard_shared::repository::postgres::PgRepository;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database).await?;
///
/// let state = AppState::new(
///     Arc::new(PgRepository::new(pool, config.password_storage.encoder())),
///     Arc::new(StaticTokenAuthorizer::new(config.auth_token.clone())),
///     config.api.clone(),
/// );
///
/// let app = build_router(state);
/// let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::ApiConfig;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use taskboard_shared::auth::token::Authorizer;
use taskboard_shared::repository::Repository;
use taskboard_shared::validation::Validator;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is an `Arc`, so clones are cheap and nothing is mutated
/// after startup.
#[derive(Clone)]
pub struct AppState {
    /// Storage
    pub repo: Arc<dyn Repository>,

    /// Request rules registry
    pub validator: Arc<Validator>,

    /// Bearer-token check for `/v1`
    pub authorizer: Arc<dyn Authorizer>,

    /// Server settings
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Creates new application state with the default rules registry
    pub fn new(
        repo: Arc<dyn Repository>,
        authorizer: Arc<dyn Authorizer>,
        config: ApiConfig,
    ) -> Self {
        Self {
            repo,
            validator: Arc::new(Validator::new()),
            authorizer,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                               # Health check (public)
/// └── /v1/                                      # Bearer token required
///     ├── POST   /users
///     ├── POST   /tasks
///     ├── GET    /tasks/all
///     ├── GET    /tasks/:id
///     ├── PUT    /tasks/:id/:status
///     ├── DELETE /tasks/:id
///     ├── GET    /tasks/users/:user             # numeric id or user name
///     ├── GET    /tasks/users/:user/last
///     └── GET    /tasks/users/by-name/:username
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. CORS (tower-http CorsLayer)
/// 2. Logging (tower-http TraceLayer)
/// 3. Request deadline (tower-http TimeoutLayer, 408 on expiry)
/// 4. Bearer authentication (`/v1` only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Route parameters at the same position share a name.
    let v1_routes = Router::new()
        .route("/users", post(routes::users::create_user))
        .route("/tasks", post(routes::tasks::create_task))
        .route("/tasks/all", get(routes::tasks::get_all_tasks))
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task_by_id).delete(routes::tasks::delete_task_by_id),
        )
        .route("/tasks/:id/:status", put(routes::tasks::update_status_by_id))
        .route("/tasks/users/:user", get(routes::tasks::get_tasks_by_user))
        .route(
            "/tasks/users/:user/last",
            get(routes::tasks::get_last_task_by_user_id),
        )
        .route(
            "/tasks/users/by-name/:username",
            get(routes::tasks::get_tasks_by_user_name),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_bearer,
        ));

    let timeout = Duration::from_secs(state.config.request_timeout_seconds);
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(TimeoutLayer::new(timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([header::LINK])
        .max_age(Duration::from_secs(300))
}
