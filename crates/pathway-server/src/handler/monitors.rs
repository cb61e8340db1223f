//! System health monitoring handlers.

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use jiff::Timestamp;
use pathway_postgres::PgClient;
use serde::{Deserialize, Serialize};

use crate::extract::Json;
use crate::handler::Result;
use crate::service::ServiceState;

/// Tracing target for monitor handlers.
const TRACING_TARGET: &str = "pathway_server::handler::monitors";

/// Response returned by the health check.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    /// Whether the service and its store are reachable.
    pub is_healthy: bool,
    /// Timestamp of this health evaluation.
    pub updated_at: Timestamp,
}

/// Reports liveness plus credential-store connectivity.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(pg_client): State<PgClient>,
) -> Result<(StatusCode, Json<HealthResponse>)> {
    let is_healthy = match pg_client.ping().await {
        Ok(()) => true,
        Err(error) => {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "health check failed: database unreachable"
            );
            false
        }
    };

    let status_code = if is_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        is_healthy,
        updated_at: Timestamp::now(),
    };

    Ok((status_code, Json(response)))
}

/// Returns a [`Router`] with all health monitoring routes.
///
/// [`Router`]: axum::routing::Router
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}
