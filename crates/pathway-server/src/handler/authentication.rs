//! Authentication handlers for patient login, staff login, and token
//! refresh.
//!
//! Login failures are always the generic 401 body, whether the identifier
//! was unknown or the secret mismatched. No secret-derived values (hospital
//! numbers, passwords, hashes) are ever logged.

use axum::Router;
use axum::extract::State;
use axum::routing::post;
use pathway_postgres::model::StaffAccount;
use pathway_postgres::types::StaffRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{Json, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{Authenticator, ServiceState, TokenService};

/// Tracing target for authentication handlers.
const TRACING_TARGET: &str = "pathway_server::handler::authentication";

/// Request payload for patient login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct PatientLoginRequest {
    /// Visit number printed on the visit slip.
    #[validate(length(min = 1, max = 32))]
    pub vn: String,
    /// Hospital number, used as the login secret.
    #[validate(length(min = 1, max = 64))]
    pub hn: String,
}

/// Response returned after successful patient login.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatientLoginResponse {
    /// Short-lived access token.
    pub token: String,
    /// Longer-lived refresh token.
    pub refresh_token: String,
    /// ID of the authenticated visit.
    pub visit_id: Uuid,
}

/// Authenticates a patient and issues a token pair.
#[tracing::instrument(skip_all)]
async fn patient_login(
    State(authenticator): State<Authenticator>,
    State(token_service): State<TokenService>,
    ValidateJson(request): ValidateJson<PatientLoginRequest>,
) -> Result<Json<PatientLoginResponse>> {
    tracing::trace!(
        target: TRACING_TARGET,
        vn = %request.vn.trim(),
        "patient login attempt"
    );

    let identity = authenticator
        .authenticate_patient(&request.vn, &request.hn)
        .await?;

    let token = token_service.issue_access_token(&identity)?;
    let refresh_token = token_service.issue_refresh_token(&identity)?;

    let visit_id = identity.visit_id.ok_or_else(|| {
        tracing::error!(
            target: TRACING_TARGET,
            subject_id = %identity.subject_id,
            "patient identity is missing the visit linkage"
        );
        ErrorKind::InternalServerError.into_error()
    })?;

    Ok(Json(PatientLoginResponse {
        token,
        refresh_token,
        visit_id,
    }))
}

/// Request payload for staff login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct StaffLoginRequest {
    /// Login username of the account.
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Password of the account.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Staff account details returned after login.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaffUserResponse {
    /// ID of the account.
    pub id: Uuid,
    /// Login username of the account.
    pub username: String,
    /// Role of the account.
    pub role: StaffRole,
    /// Department the account belongs to.
    pub department: Option<String>,
    /// Human-readable name of the account holder.
    pub full_name: String,
    /// Whether this account may register patient visits.
    pub can_add_patients: bool,
}

impl From<StaffAccount> for StaffUserResponse {
    fn from(account: StaffAccount) -> Self {
        Self {
            id: account.id,
            username: account.username,
            role: account.role,
            department: account.department,
            full_name: account.full_name,
            can_add_patients: account.can_add_patients,
        }
    }
}

/// Response returned after successful staff login.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaffLoginResponse {
    /// Short-lived access token.
    pub token: String,
    /// Longer-lived refresh token.
    pub refresh_token: String,
    /// Details of the authenticated account.
    pub user: StaffUserResponse,
}

/// Authenticates a staff account and issues a token pair.
#[tracing::instrument(skip_all)]
async fn staff_login(
    State(authenticator): State<Authenticator>,
    State(token_service): State<TokenService>,
    ValidateJson(request): ValidateJson<StaffLoginRequest>,
) -> Result<Json<StaffLoginResponse>> {
    tracing::trace!(
        target: TRACING_TARGET,
        username = %request.username.trim(),
        "staff login attempt"
    );

    let (identity, account) = authenticator
        .authenticate_staff(&request.username, &request.password)
        .await?;

    let token = token_service.issue_access_token(&identity)?;
    let refresh_token = token_service.issue_refresh_token(&identity)?;

    Ok(Json(StaffLoginResponse {
        token,
        refresh_token,
        user: account.into(),
    }))
}

/// Request payload for exchanging a refresh token.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest {
    /// Refresh token obtained at login.
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Response returned after a successful refresh.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    /// New short-lived access token.
    pub token: String,
}

/// Exchanges a valid refresh token for a new access token.
///
/// The refresh token grants nothing but this exchange; the encoded
/// identity is carried over unchanged.
#[tracing::instrument(skip_all)]
async fn refresh(
    State(token_service): State<TokenService>,
    ValidateJson(request): ValidateJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let claims = token_service.verify_refresh(request.refresh_token.trim())?;
    let token = token_service.issue_access_token(&claims.identity())?;

    tracing::info!(
        target: TRACING_TARGET,
        subject_id = %claims.subject_id,
        role = %claims.role,
        "access token refreshed"
    );

    Ok(Json(RefreshResponse { token }))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/auth/login", post(patient_login))
        .route("/auth/staff-login", post(staff_login))
        .route("/auth/refresh", post(refresh))
}

#[cfg(test)]
mod tests {
    use axum::extract::FromRef;
    use axum::http::StatusCode;

    use super::*;
    use crate::extract::{Identity, PrincipalRole};
    use crate::handler::test::create_test_server;

    fn patient_identity() -> Identity {
        let visit_id = Uuid::new_v4();
        Identity {
            subject_id: visit_id,
            role: PrincipalRole::Patient,
            department: None,
            visit_id: Some(visit_id),
        }
    }

    #[tokio::test]
    async fn login_with_malformed_body_is_bad_request() -> anyhow::Result<()> {
        let (server, _state, _keys_dir) = create_test_server().await?;

        // Missing both fields entirely.
        let response = server
            .post("/auth/login")
            .json(&serde_json::json!({}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // Present but empty fields fail validation with field detail.
        let response = server
            .post("/auth/login")
            .json(&serde_json::json!({"vn": "", "hn": ""}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "bad_request");
        assert!(body["message"].as_str().unwrap().contains("vn"));

        Ok(())
    }

    #[tokio::test]
    async fn staff_login_with_malformed_body_is_bad_request() -> anyhow::Result<()> {
        let (server, _state, _keys_dir) = create_test_server().await?;

        let response = server
            .post("/auth/staff-login")
            .json(&serde_json::json!({"username": "nurse"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn refresh_exchanges_for_new_access_token() -> anyhow::Result<()> {
        let (server, state, _keys_dir) = create_test_server().await?;
        let token_service = TokenService::from_ref(&state);

        let identity = patient_identity();
        let refresh_token = token_service.issue_refresh_token(&identity)?;

        let response = server
            .post("/auth/refresh")
            .json(&serde_json::json!({"refreshToken": refresh_token}))
            .await;
        response.assert_status_ok();

        let body: RefreshResponse = response.json();
        assert!(!body.token.is_empty());

        // The returned token is a working access token for the same subject.
        let claims = token_service.verify_access(&body.token)?;
        assert_eq!(claims.subject_id, identity.subject_id);
        assert_eq!(claims.visit_id, identity.visit_id);

        Ok(())
    }

    #[tokio::test]
    async fn refresh_with_invalid_token_is_unauthorized() -> anyhow::Result<()> {
        let (server, _state, _keys_dir) = create_test_server().await?;

        let response = server
            .post("/auth/refresh")
            .json(&serde_json::json!({"refreshToken": "not-a-token"}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = response.json();
        assert_eq!(body["name"], "unauthorized");

        Ok(())
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() -> anyhow::Result<()> {
        let (server, state, _keys_dir) = create_test_server().await?;
        let token_service = TokenService::from_ref(&state);

        // An access token must not pass for a refresh token.
        let access_token = token_service.issue_access_token(&patient_identity())?;

        let response = server
            .post("/auth/refresh")
            .json(&serde_json::json!({"refreshToken": access_token}))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);

        Ok(())
    }
}
