/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `PORT`: Port to bind to (default: 8080)
/// - `REQUEST_TIMEOUT`: Per-request deadline in seconds (default: 30)
/// - `CORS_ORIGINS`: Comma-separated allowed origins (default: *)
/// - `LOG_LEVEL`: Default log filter when `RUST_LOG` is unset (default: info)
/// - `LOG_FORMAT`: `json` or `pretty` (default: json)
/// - `AUTH_TOKEN`: Static bearer token (required)
/// - `PASSWORD_STORAGE`: `plain` or `argon2` (default: plain)
/// - `DATABASE_URL`: PostgreSQL connection string; overrides the `DB_*` settings
/// - `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`: connection settings
/// - `DB_SSL_MODE`: sqlx SSL mode (default: disable)
/// - `DB_POOL_MAX_CONNS`, `DB_POOL_MIN_CONNS`: pool bounds (default: 5, 0)
/// - `DB_POOL_MAX_CONN_LIFETIME`, `DB_POOL_MAX_CONN_IDLE_TIME`,
///   `DB_POOL_ACQUIRE_TIMEOUT`: durations in seconds (default: 180, 100, 30)
///
/// Durations accept plain seconds (`30`) or a trailing `s` (`30s`).
///
/// # Example
///
/// ```no_run
/// use taskboard_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use std::env;
use std::str::FromStr;
use taskboard_shared::auth::password::PasswordStorage;
use taskboard_shared::db::pool::DatabaseConfig;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Logging configuration
    pub log: LogConfig,

    /// Static bearer token every `/v1` request must present
    pub auth_token: String,

    /// How user credentials are stored
    pub password_storage: PasswordStorage,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Per-request deadline in seconds
    pub request_timeout_seconds: u64,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_seconds: 30,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,

    /// Human-readable, multi-line
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => anyhow::bail!("unknown log format: {}", other),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Default filter directive
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// `local.env` and then `.env` are loaded first when present; variables
    /// already set in the environment win.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load env files if present (for development)
        dotenvy::from_filename("local.env").ok();
        dotenvy::dotenv().ok();

        Self::from_source(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use taskboard_api::config::Config;
    ///
    /// let vars = HashMap::from([
    ///     ("AUTH_TOKEN", "secret"),
    ///     ("DATABASE_URL", "postgresql://localhost/taskboard"),
    /// ]);
    ///
    /// let config = Config::from_source(|key| vars.get(key).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.api.port, 8080);
    /// ```
    pub fn from_source<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_defaults = ApiConfig::default();
        let api = ApiConfig {
            host: get("API_HOST").unwrap_or(api_defaults.host),
            port: parse_or(&get, "PORT", api_defaults.port)?,
            request_timeout_seconds: seconds_or(
                &get,
                "REQUEST_TIMEOUT",
                api_defaults.request_timeout_seconds,
            )?,
            cors_origins: get("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or(api_defaults.cors_origins),
        };

        let log_defaults = LogConfig::default();
        let log = LogConfig {
            level: get("LOG_LEVEL").unwrap_or(log_defaults.level),
            format: parse_or(&get, "LOG_FORMAT", log_defaults.format)?,
        };

        let database = database_config(&get)?;

        let auth_token = get("AUTH_TOKEN")
            .ok_or_else(|| anyhow::anyhow!("AUTH_TOKEN environment variable is required"))?;

        let password_storage = match get("PASSWORD_STORAGE") {
            Some(value) => value
                .parse::<PasswordStorage>()
                .map_err(|e| anyhow::anyhow!("Invalid PASSWORD_STORAGE: {}", e))?,
            None => PasswordStorage::default(),
        };

        Ok(Self {
            api,
            database,
            log,
            auth_token,
            password_storage,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn database_config<F>(get: &F) -> anyhow::Result<DatabaseConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = DatabaseConfig::default();
    let url = get("DATABASE_URL");

    // Discrete settings are only mandatory without a URL.
    let required = |key: &str| -> anyhow::Result<String> {
        match get(key) {
            Some(value) => Ok(value),
            None if url.is_some() => Ok(String::new()),
            None => anyhow::bail!("{} environment variable is required (or set DATABASE_URL)", key),
        }
    };

    Ok(DatabaseConfig {
        host: get("DB_HOST").unwrap_or(defaults.host),
        port: parse_or(get, "DB_PORT", defaults.port)?,
        name: required("DB_NAME")?,
        user: required("DB_USER")?,
        password: get("DB_PASSWORD").unwrap_or_default(),
        ssl_mode: get("DB_SSL_MODE").unwrap_or(defaults.ssl_mode),
        max_connections: parse_or(get, "DB_POOL_MAX_CONNS", defaults.max_connections)?,
        min_connections: parse_or(get, "DB_POOL_MIN_CONNS", defaults.min_connections)?,
        acquire_timeout_seconds: seconds_or(
            get,
            "DB_POOL_ACQUIRE_TIMEOUT",
            defaults.acquire_timeout_seconds,
        )?,
        idle_timeout_seconds: optional_seconds(get, "DB_POOL_MAX_CONN_IDLE_TIME")?
            .or(defaults.idle_timeout_seconds),
        max_lifetime_seconds: optional_seconds(get, "DB_POOL_MAX_CONN_LIFETIME")?
            .or(defaults.max_lifetime_seconds),
        url,
        ..defaults
    })
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Invalid {}: {}", key, e)),
        None => Ok(default),
    }
}

fn seconds_or<F>(get: &F, key: &str, default: u64) -> anyhow::Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(optional_seconds(get, key)?.unwrap_or(default))
}

fn optional_seconds<F>(get: &F, key: &str) -> anyhow::Result<Option<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|value| parse_seconds(&value).with_context(|| format!("Invalid {}", key)))
        .transpose()
}

/// Parses a duration given as whole seconds, with an optional `s` suffix
pub fn parse_seconds(value: &str) -> anyhow::Result<u64> {
    let value = value.trim();
    let digits = value.strip_suffix('s').unwrap_or(value);

    digits
        .parse::<u64>()
        .map_err(|_| anyhow::anyhow!("expected seconds, got {:?}", value))
}
