//! Patient-facing journey handlers.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use pathway_postgres::PgClient;
use pathway_postgres::query::{JourneyStepRepository, PatientVisitRepository};
use serde::{Deserialize, Serialize};

use crate::extract::{AuthState, Json};
use crate::handler::response::{JourneyStepResponse, VisitResponse};
use crate::handler::{ErrorKind, Result};
use crate::service::ServiceState;

/// Tracing target for journey handlers.
const TRACING_TARGET: &str = "pathway_server::handler::journeys";

/// Response returned for a patient's own journey.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyJourneyResponse {
    /// The authenticated visit.
    pub visit: VisitResponse,
    /// Every catalog step with the visit's recorded progress.
    pub steps: Vec<JourneyStepResponse>,
}

/// Returns the authenticated patient's journey.
///
/// Requires a patient token; the visit linkage in the token selects the
/// journey, so a patient can never read another visit's progress.
#[tracing::instrument(skip_all)]
async fn my_journey(
    State(pg_client): State<PgClient>,
    AuthState(auth_claims): AuthState,
) -> Result<Json<MyJourneyResponse>> {
    let visit_id = auth_claims.authorize_patient()?;

    let mut conn = pg_client.get_connection().await?;
    let visit = conn
        .find_visit_by_id(visit_id)
        .await?
        .ok_or_else(|| ErrorKind::NotFound.with_resource("visit"))?;

    let journey = conn.journey_for_visit(visit_id).await?;

    tracing::debug!(
        target: TRACING_TARGET,
        visit_id = %visit_id,
        steps = journey.len(),
        "journey fetched for patient"
    );

    Ok(Json(MyJourneyResponse {
        visit: visit.into(),
        steps: journey.into_iter().map(Into::into).collect(),
    }))
}

/// Returns a [`Router`] with all related routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/journeys/me", get(my_journey))
}
