/// Database layer for Taskboard
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool construction and health checks
/// - `migrations`: embedded schema migrations
///
/// Query text lives with the persistence adapter in `crate::repository`.

pub mod migrations;
pub mod pool;
