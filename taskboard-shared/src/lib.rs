//! # Taskboard Shared Library
//!
//! Domain types, validation rules, credential handling and persistence used
//! by the Taskboard API server.
//!
//! ## Module Organization
//!
//! - `models`: User and task records
//! - `validation`: Request rule registry and custom rules
//! - `auth`: Bearer-token authorization and credential encoders
//! - `db`: Connection pool and migrations
//! - `repository`: Storage contract and its PostgreSQL implementation

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;
pub mod validation;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
