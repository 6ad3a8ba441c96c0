/// Middleware modules for the API server
///
/// - `auth`: Bearer-token check in front of the `/v1` routes

pub mod auth;
