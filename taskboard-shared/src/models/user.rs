/// User model
///
/// Users are created once and referenced by tasks. They are never updated
/// or deleted by the service.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     username TEXT UNIQUE NOT NULL,
///     password TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id_string;

/// User row
///
/// `password` holds whatever the configured credential encoder produced and
/// is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// User ID
    #[serde(with = "id_string")]
    pub id: i32,

    /// Unique user name
    #[sqlx(rename = "username")]
    pub name: String,

    /// Stored credential
    #[serde(skip_serializing, default)]
    pub password: String,

    /// When the user was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// `password` is the raw credential; the repository encodes it before storage.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Unique user name
    pub name: String,

    /// Raw password
    pub password: String,
}
