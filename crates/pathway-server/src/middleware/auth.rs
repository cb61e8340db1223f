//! Role-gating middleware for protected routes.
//!
//! Each function is the auth gate for one required-role set. Extraction of
//! [`AuthState`] performs token verification and fails closed with 401;
//! the role check fails closed with 403. Requests are gated independently,
//! with no retries and no state carried between them.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthState;
use crate::handler::Result;
use crate::middleware::TRACING_TARGET_AUTH;

/// Requires a valid access token to proceed with the request.
///
/// Any authenticated principal (patient, staff, or admin) passes.
///
/// #### Notes
///
/// - [`AuthState`] can't be extracted from requests without a *verified*
///   `Authorization` bearer token, so reaching the handler implies the
///   token was checked.
pub async fn require_authentication(
    AuthState(_): AuthState,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}

/// Requires a valid access token with the staff or admin role.
pub async fn require_staff(
    AuthState(auth_claims): AuthState,
    request: Request,
    next: Next,
) -> Result<Response> {
    auth_claims.authorize_staff()?;

    tracing::debug!(
        target: TRACING_TARGET_AUTH,
        subject_id = %auth_claims.subject_id,
        role = %auth_claims.role,
        "staff gate passed"
    );

    Ok(next.run(request).await)
}

/// Requires a valid access token with the admin role.
pub async fn require_admin(
    AuthState(auth_claims): AuthState,
    request: Request,
    next: Next,
) -> Result<Response> {
    auth_claims.authorize_admin()?;

    tracing::debug!(
        target: TRACING_TARGET_AUTH,
        subject_id = %auth_claims.subject_id,
        "admin gate passed"
    );

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::extract::FromRef;
    use axum::http::StatusCode;
    use axum::middleware::from_fn_with_state;
    use axum::routing::get;
    use axum_test::TestServer;
    use uuid::Uuid;

    use super::*;
    use crate::extract::{Identity, PrincipalRole};
    use crate::handler::test::{create_test_server, create_test_state};
    use crate::service::TokenService;

    async fn probe() -> &'static str {
        "ok"
    }

    fn identity(role: PrincipalRole) -> Identity {
        let subject_id = Uuid::new_v4();
        Identity {
            subject_id,
            role,
            department: None,
            visit_id: (role == PrincipalRole::Patient).then_some(subject_id),
        }
    }

    #[tokio::test]
    async fn missing_token_is_unauthenticated() -> anyhow::Result<()> {
        let (server, _state, _keys_dir) = create_test_server().await?;

        let response = server.get("/steps").await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "missing_auth_token");
        Ok(())
    }

    #[tokio::test]
    async fn non_bearer_header_is_malformed() -> anyhow::Result<()> {
        let (server, _state, _keys_dir) = create_test_server().await?;

        let response = server
            .get("/steps")
            .add_header("Authorization", "Basic bm90LWEtdG9rZW4=")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "malformed_auth_token");
        Ok(())
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_unauthorized() -> anyhow::Result<()> {
        let (server, _state, _keys_dir) = create_test_server().await?;

        let response = server
            .get("/steps")
            .add_header("Authorization", "Bearer not-a-token")
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "unauthorized");
        Ok(())
    }

    #[tokio::test]
    async fn patient_is_forbidden_on_staff_routes() -> anyhow::Result<()> {
        let (server, state, _keys_dir) = create_test_server().await?;
        let token_service = TokenService::from_ref(&state);

        let token = token_service.issue_access_token(&identity(PrincipalRole::Patient))?;
        let response = server
            .get("/visits")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn staff_is_forbidden_on_admin_routes() -> anyhow::Result<()> {
        let (state, _keys_dir) = create_test_state().await?;
        let token_service = TokenService::from_ref(&state);

        let app = Router::new()
            .route("/probe", get(probe))
            .route_layer(from_fn_with_state(state.clone(), require_admin))
            .with_state(state);
        let server = TestServer::new(app)?;

        let token = token_service.issue_access_token(&identity(PrincipalRole::Staff))?;
        let response = server
            .get("/probe")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
        Ok(())
    }

    #[tokio::test]
    async fn admin_passes_the_admin_gate() -> anyhow::Result<()> {
        let (state, _keys_dir) = create_test_state().await?;
        let token_service = TokenService::from_ref(&state);

        let app = Router::new()
            .route("/probe", get(probe))
            .route_layer(from_fn_with_state(state.clone(), require_admin))
            .with_state(state);
        let server = TestServer::new(app)?;

        let token = token_service.issue_access_token(&identity(PrincipalRole::Admin))?;
        let response = server
            .get("/probe")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;
        response.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn refresh_token_is_rejected_by_the_gate() -> anyhow::Result<()> {
        let (state, _keys_dir) = create_test_state().await?;
        let token_service = TokenService::from_ref(&state);

        let app = Router::new()
            .route("/probe", get(probe))
            .route_layer(from_fn_with_state(state.clone(), require_authentication))
            .with_state(state);
        let server = TestServer::new(app)?;

        // A refresh token must not grant resource access.
        let token = token_service.issue_refresh_token(&identity(PrincipalRole::Admin))?;
        let response = server
            .get("/probe")
            .add_header("Authorization", format!("Bearer {token}"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        Ok(())
    }
}
