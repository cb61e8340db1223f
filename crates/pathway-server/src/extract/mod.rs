//! Request extractors with consistent error responses.

mod auth;
mod json;
mod validated_json;

pub use auth::{AuthClaims, AuthState, Identity, PrincipalRole, TokenUse};
pub use json::Json;
pub use validated_json::ValidateJson;
