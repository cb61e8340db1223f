//! Authentication core: token issuance/verification and credential checks.

mod authenticator;
mod token_service;

pub use authenticator::Authenticator;
pub use token_service::TokenService;
