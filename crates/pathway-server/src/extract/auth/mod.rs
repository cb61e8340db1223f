//! Authentication extractors and token claims.

mod auth_state;
mod claims;

pub use auth_state::AuthState;
pub use claims::{AuthClaims, Identity, PrincipalRole, TokenUse};
