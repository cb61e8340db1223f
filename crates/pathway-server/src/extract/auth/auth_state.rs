//! Authenticated request state extractor.
//!
//! [`AuthState`] is the auth gate's entry point: it extracts the bearer
//! token from the `Authorization` header, verifies it through the token
//! service, and exposes the verified claims to handlers. Verification is
//! pure (signature + expiry + claims); tokens are stateless and no
//! database lookup is involved.

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;
use derive_more::Deref;

use super::AuthClaims;
use crate::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::TokenService;

/// Verified authentication state of a request.
///
/// Extraction succeeds only for requests carrying a valid access token:
/// a missing header fails closed with `missing_auth_token`, a header that
/// is not a bearer token with `malformed_auth_token`, and any
/// verification failure (signature, expiry, wrong token use) with the
/// generic `unauthorized` kind. The verified state is cached in request
/// extensions so later extractions in the same request are free.
#[derive(Debug, Clone, Deref, PartialEq, Eq)]
pub struct AuthState(pub AuthClaims);

impl AuthState {
    /// Creates a new [`AuthState`] from already-verified claims.
    #[inline]
    #[must_use]
    pub const fn from_verified_claims(auth_claims: AuthClaims) -> Self {
        Self(auth_claims)
    }

    /// Consumes this state and returns the verified claims.
    #[inline]
    pub fn into_claims(self) -> AuthClaims {
        self.0
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Check for cached auth state to avoid re-verifying the token.
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header =
            <TypedHeader<Authorization<Bearer>> as FromRequestParts<S>>::from_request_parts(
                parts, state,
            )
            .await
            .map_err(|rejection| match rejection.reason() {
                TypedHeaderRejectionReason::Missing => {
                    tracing::debug!(
                        target: TRACING_TARGET_AUTHENTICATION,
                        "request rejected: no authorization header"
                    );
                    ErrorKind::MissingAuthToken.into_error()
                }
                _ => {
                    tracing::debug!(
                        target: TRACING_TARGET_AUTHENTICATION,
                        "request rejected: authorization header is not a bearer token"
                    );
                    ErrorKind::MalformedAuthToken.into_error()
                }
            })?;

        let token_service = TokenService::from_ref(state);
        let auth_claims = token_service.verify_access(auth_header.token())?;

        tracing::debug!(
            target: TRACING_TARGET_AUTHENTICATION,
            subject_id = %auth_claims.subject_id,
            token_id = %auth_claims.token_id,
            role = %auth_claims.role,
            "access token verified"
        );

        let auth_state = Self::from_verified_claims(auth_claims);
        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}

impl<S> OptionalFromRequestParts<S> for AuthState
where
    S: Send + Sync,
    TokenService: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        match <Self as FromRequestParts<S>>::from_request_parts(parts, state).await {
            Ok(auth_state) => Ok(Some(auth_state)),
            Err(_) => Ok(None),
        }
    }
}
