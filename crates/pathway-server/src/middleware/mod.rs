//! Middleware for `axum::Router` and HTTP request processing.

mod auth;

pub use auth::{require_admin, require_authentication, require_staff};

/// Tracing target for authentication middleware.
pub(crate) const TRACING_TARGET_AUTH: &str = "pathway_server::middleware::auth";
