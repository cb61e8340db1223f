//! Staff-facing visit handlers: registration, queue, journey progress,
//! and the printable QR login payload.
//!
//! All routes in this module sit behind the staff gate; registering a
//! visit additionally requires the `can_add_patients` capability, which is
//! checked against the store rather than the token so capability changes
//! apply immediately.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use pathway_postgres::PgClient;
use pathway_postgres::model::{NewPatientVisit, PatientVisit};
use pathway_postgres::query::{
    JourneyStepRepository, PatientVisitRepository, ServiceStepRepository, StaffAccountRepository,
};
use pathway_postgres::types::{JourneyStatus, Pagination};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{AuthState, Json, PrincipalRole, ValidateJson};
use crate::handler::response::{JourneyStepResponse, VisitResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::{PasswordHasher, ServiceState};

/// Tracing target for visit handlers.
const TRACING_TARGET: &str = "pathway_server::handler::visits";

/// URI scheme of the patient login deep link encoded into visit QR codes.
const QR_LOGIN_SCHEME: &str = "pathway://login";

/// Request payload for registering a patient visit.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RegisterVisitRequest {
    /// Visit number printed on the visit slip.
    #[validate(length(min = 1, max = 32))]
    pub vn: String,
    /// Hospital number, stored only as a one-way hash.
    #[validate(length(min = 1, max = 64))]
    pub hn: String,
    /// Display name of the patient.
    #[validate(length(min = 1, max = 120))]
    pub patient_name: String,
    /// Department the visit is registered under.
    #[validate(length(min = 1, max = 120))]
    pub department: Option<String>,
}

/// Registers a new patient visit.
///
/// Staff need the `can_add_patients` capability; administrators always
/// may. A duplicate visit number yields 409.
#[tracing::instrument(skip_all)]
async fn register_visit(
    State(pg_client): State<PgClient>,
    State(password_hasher): State<PasswordHasher>,
    AuthState(auth_claims): AuthState,
    ValidateJson(request): ValidateJson<RegisterVisitRequest>,
) -> Result<(StatusCode, Json<VisitResponse>)> {
    let mut conn = pg_client.get_connection().await?;

    // The capability lives in the store, not the token, so revoking it
    // takes effect without waiting for token expiry. Patients never reach
    // this handler (staff gate), but the account must still exist.
    if auth_claims.role == PrincipalRole::Staff {
        let account = conn
            .find_account_by_id(auth_claims.subject_id)
            .await?
            .ok_or_else(|| ErrorKind::Unauthorized.into_error())?;

        if !account.may_add_patients() {
            tracing::warn!(
                target: TRACING_TARGET,
                account_id = %account.id,
                "visit registration denied: missing can_add_patients capability"
            );
            return Err(ErrorKind::Forbidden
                .with_message("This account may not register patient visits"));
        }
    }

    let hospital_number_hash = password_hasher.hash_secret(request.hn.trim())?;
    let visit = conn
        .create_visit(NewPatientVisit {
            visit_number: request.vn,
            hospital_number_hash,
            patient_name: request.patient_name,
            department: request.department,
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        visit_id = %visit.id,
        visit_number = %visit.visit_number,
        subject_id = %auth_claims.subject_id,
        "patient visit registered"
    );

    Ok((StatusCode::CREATED, Json(visit.into())))
}

/// Query parameters for the visit queue.
#[must_use]
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisitQueueQuery {
    /// 1-based page number.
    pub page: Option<i64>,
    /// Page size.
    pub per_page: Option<i64>,
    /// Restrict the queue to a single department.
    pub department: Option<String>,
}

/// Lists open visits, oldest first.
#[tracing::instrument(skip_all)]
async fn list_visits(
    State(pg_client): State<PgClient>,
    Query(query): Query<VisitQueueQuery>,
) -> Result<Json<Vec<VisitResponse>>> {
    let pagination = Pagination::from_page(
        query.page.unwrap_or(1),
        query.per_page.unwrap_or(Pagination::default().limit),
    );

    let mut conn = pg_client.get_connection().await?;
    let visits = conn
        .list_open_visits(query.department.as_deref(), pagination)
        .await?;

    Ok(Json(visits.into_iter().map(Into::into).collect()))
}

/// Loads a visit or fails with 404.
async fn find_visit(
    conn: &mut pathway_postgres::PgConn,
    visit_id: Uuid,
) -> Result<PatientVisit> {
    conn.find_visit_by_id(visit_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_resource("visit"))
}

/// Response returned for a visit's journey.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisitJourneyResponse {
    /// The visit the journey belongs to.
    pub visit: VisitResponse,
    /// Every catalog step with the visit's recorded progress.
    pub steps: Vec<JourneyStepResponse>,
}

/// Returns the journey of any visit.
#[tracing::instrument(skip_all, fields(visit_id = %visit_id))]
async fn visit_journey(
    State(pg_client): State<PgClient>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<VisitJourneyResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let visit = find_visit(&mut conn, visit_id).await?;
    let journey = conn.journey_for_visit(visit_id).await?;

    Ok(Json(VisitJourneyResponse {
        visit: visit.into(),
        steps: journey.into_iter().map(Into::into).collect(),
    }))
}

/// Request payload for recording journey progress.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct RecordProgressRequest {
    /// Catalog step to record progress against.
    pub service_step_id: Uuid,
    /// New progress status.
    pub status: JourneyStatus,
    /// Free-form note shown to the patient.
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

/// Records progress for a visit against a catalog step.
#[tracing::instrument(skip_all, fields(visit_id = %visit_id))]
async fn record_progress(
    State(pg_client): State<PgClient>,
    AuthState(auth_claims): AuthState,
    Path(visit_id): Path<Uuid>,
    ValidateJson(request): ValidateJson<RecordProgressRequest>,
) -> Result<Json<JourneyStepResponse>> {
    let mut conn = pg_client.get_connection().await?;
    find_visit(&mut conn, visit_id).await?;

    let step = conn
        .find_step_by_id(request.service_step_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_resource("step"))?;

    let progress = conn
        .record_progress(visit_id, step.id, request.status, request.note)
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        visit_id = %visit_id,
        step_id = %step.id,
        status = %progress.status,
        subject_id = %auth_claims.subject_id,
        "journey progress recorded"
    );

    Ok(Json((step, Some(progress)).into()))
}

/// Response returned for a visit's QR login payload.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VisitQrResponse {
    /// ID of the visit.
    pub visit_id: Uuid,
    /// Patient-facing visit number.
    pub visit_number: String,
    /// Deep-link payload the UI renders as a QR image.
    pub payload: String,
}

/// Returns the QR login payload for a visit.
///
/// The payload encodes only the visit number; the patient still has to
/// present the hospital number to log in.
#[tracing::instrument(skip_all, fields(visit_id = %visit_id))]
async fn visit_qr(
    State(pg_client): State<PgClient>,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<VisitQrResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let visit = find_visit(&mut conn, visit_id).await?;

    let payload = format!("{QR_LOGIN_SCHEME}?vn={}", visit.visit_number);

    Ok(Json(VisitQrResponse {
        visit_id: visit.id,
        visit_number: visit.visit_number,
        payload,
    }))
}

/// Closes a visit, ending its ability to authenticate.
///
/// Closing an already-closed visit yields 409.
#[tracing::instrument(skip_all, fields(visit_id = %visit_id))]
async fn close_visit(
    State(pg_client): State<PgClient>,
    AuthState(auth_claims): AuthState,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<VisitResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let visit = find_visit(&mut conn, visit_id).await?;

    if visit.is_closed() {
        return Err(ErrorKind::Conflict
            .with_message("Visit is already closed")
            .with_resource("visit"));
    }

    let visit = conn
        .close_visit(visit_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_resource("visit"))?;

    tracing::info!(
        target: TRACING_TARGET,
        visit_id = %visit.id,
        visit_number = %visit.visit_number,
        subject_id = %auth_claims.subject_id,
        "visit closed"
    );

    Ok(Json(visit.into()))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .route("/visits", get(list_visits).post(register_visit))
        .route("/visits/{visit_id}/journey", get(visit_journey))
        .route("/visits/{visit_id}/progress", post(record_progress))
        .route("/visits/{visit_id}/qr", get(visit_qr))
        .route("/visits/{visit_id}/close", post(close_visit))
}
