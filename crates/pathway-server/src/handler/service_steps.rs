//! Service step catalog handlers.
//!
//! Every authenticated principal may read the catalog; creating and
//! updating steps is restricted to administrators.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use pathway_postgres::PgClient;
use pathway_postgres::model::{NewServiceStep, UpdateServiceStep};
use pathway_postgres::query::ServiceStepRepository;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::extract::{AuthState, Json, ValidateJson};
use crate::handler::response::ServiceStepResponse;
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for service step handlers.
const TRACING_TARGET: &str = "pathway_server::handler::service_steps";

/// Lists the full step catalog in display order.
#[tracing::instrument(skip_all)]
async fn list_steps(
    State(pg_client): State<PgClient>,
) -> Result<Json<Vec<ServiceStepResponse>>> {
    let mut conn = pg_client.get_connection().await?;
    let steps = conn.list_steps().await?;

    Ok(Json(steps.into_iter().map(Into::into).collect()))
}

/// Request payload for creating a service step.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct CreateServiceStepRequest {
    /// Display name of the step.
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    /// Longer patient-facing description.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Department responsible for the step.
    #[validate(length(min = 1, max = 120))]
    pub department: Option<String>,
    /// Ordering key within the catalog.
    #[validate(range(min = 0))]
    pub display_order: i32,
}

/// Creates a new service step. Administrators only.
#[tracing::instrument(skip_all)]
async fn create_step(
    State(pg_client): State<PgClient>,
    AuthState(auth_claims): AuthState,
    ValidateJson(request): ValidateJson<CreateServiceStepRequest>,
) -> Result<(StatusCode, Json<ServiceStepResponse>)> {
    auth_claims.authorize_admin()?;

    let mut conn = pg_client.get_connection().await?;
    let step = conn
        .create_step(NewServiceStep {
            name: request.name,
            description: request.description,
            department: request.department,
            display_order: request.display_order,
        })
        .await?;

    tracing::info!(
        target: TRACING_TARGET,
        step_id = %step.id,
        name = %step.name,
        display_order = step.display_order,
        subject_id = %auth_claims.subject_id,
        "service step created"
    );

    Ok((StatusCode::CREATED, Json(step.into())))
}

/// Request payload for updating a service step.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct UpdateServiceStepRequest {
    /// Display name of the step.
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    /// Longer patient-facing description.
    #[validate(length(max = 500))]
    pub description: Option<String>,
    /// Department responsible for the step.
    #[validate(length(min = 1, max = 120))]
    pub department: Option<String>,
    /// Ordering key within the catalog.
    #[validate(range(min = 0))]
    pub display_order: Option<i32>,
}

/// Applies partial updates to a service step. Administrators only.
#[tracing::instrument(skip_all, fields(step_id = %step_id))]
async fn update_step(
    State(pg_client): State<PgClient>,
    AuthState(auth_claims): AuthState,
    Path(step_id): Path<Uuid>,
    ValidateJson(request): ValidateJson<UpdateServiceStepRequest>,
) -> Result<Json<ServiceStepResponse>> {
    let mut conn = pg_client.get_connection().await?;
    let step = conn
        .update_step(
            step_id,
            UpdateServiceStep {
                name: request.name,
                description: request.description,
                department: request.department,
                display_order: request.display_order,
            },
        )
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_resource("step"))?;

    tracing::info!(
        target: TRACING_TARGET,
        step_id = %step.id,
        subject_id = %auth_claims.subject_id,
        "service step updated"
    );

    Ok(Json(step.into()))
}

/// Returns a [`Router`] with the catalog routes open to any authenticated
/// principal.
///
/// Step creation sits on the same path and enforces the admin role in the
/// handler.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/steps", get(list_steps).post(create_step))
}

/// Returns a [`Router`] with the admin-gated step management routes.
///
/// [`Router`]: axum::routing::Router
pub fn admin_routes() -> Router<ServiceState> {
    Router::new().route("/steps/{step_id}", patch(update_step))
}
