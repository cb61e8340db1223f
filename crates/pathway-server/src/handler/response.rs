//! HTTP response types shared across handlers.

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use jiff::Timestamp;
use pathway_postgres::model::{JourneyStep, PatientVisit, ServiceStep};
use pathway_postgres::types::JourneyStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A service step as presented to clients.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceStepResponse {
    /// ID of the step.
    pub id: Uuid,
    /// Display name of the step.
    pub name: String,
    /// Longer patient-facing description.
    pub description: Option<String>,
    /// Department responsible for the step.
    pub department: Option<String>,
    /// Ordering key within the catalog.
    pub display_order: i32,
}

impl From<ServiceStep> for ServiceStepResponse {
    fn from(step: ServiceStep) -> Self {
        Self {
            id: step.id,
            name: step.name,
            description: step.description,
            department: step.department,
            display_order: step.display_order,
        }
    }
}

/// One entry of a visit's journey: a catalog step with its progress.
///
/// Steps with no recorded progress read as `pending` with empty
/// timestamps.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyStepResponse {
    /// The catalog step.
    pub step: ServiceStepResponse,
    /// Current progress status.
    pub status: JourneyStatus,
    /// Free-form staff note shown to the patient.
    pub note: Option<String>,
    /// Timestamp when the step was first started.
    pub started_at: Option<Timestamp>,
    /// Timestamp when the step was completed.
    pub completed_at: Option<Timestamp>,
}

impl From<(ServiceStep, Option<JourneyStep>)> for JourneyStepResponse {
    fn from((step, progress): (ServiceStep, Option<JourneyStep>)) -> Self {
        let step = ServiceStepResponse::from(step);

        match progress {
            Some(progress) => Self {
                step,
                status: progress.status,
                note: progress.note,
                started_at: progress.started_at.map(Into::into),
                completed_at: progress.completed_at.map(Into::into),
            },
            None => Self {
                step,
                status: JourneyStatus::Pending,
                note: None,
                started_at: None,
                completed_at: None,
            },
        }
    }
}

/// A patient visit as presented to staff clients.
///
/// The hashed login secret is never part of any response.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitResponse {
    /// ID of the visit.
    pub id: Uuid,
    /// Patient-facing visit number.
    pub visit_number: String,
    /// Display name of the patient.
    pub patient_name: String,
    /// Department the visit is registered under.
    pub department: Option<String>,
    /// Timestamp when the visit was registered.
    pub created_at: Timestamp,
    /// Timestamp when the visit was closed.
    pub closed_at: Option<Timestamp>,
}

impl From<PatientVisit> for VisitResponse {
    fn from(visit: PatientVisit) -> Self {
        Self {
            id: visit.id,
            visit_number: visit.visit_number,
            patient_name: visit.patient_name,
            department: visit.department,
            created_at: visit.created_at.into(),
            closed_at: visit.closed_at.map(Into::into),
        }
    }
}

/// HTTP error response representation.
///
/// This struct contains all the information needed to serialize an error
/// response: the error name, a user-facing message, and optional resource
/// and context details. Messages stay generic for authentication failures
/// so the response never reveals whether an identifier exists.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// The error name/type identifier
    pub name: Cow<'a, str>,
    /// User-facing error message safe for client display
    pub message: Cow<'a, str>,
    /// The resource that the error relates to (optional, set by handler)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Cow<'a, str>>,
    /// Additional detail about what went wrong (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "bad_request",
        "The request could not be processed due to invalid data",
        StatusCode::BAD_REQUEST,
    );
    pub const CONFLICT: Self = Self::new(
        "conflict",
        "The request conflicts with the current state of the resource",
        StatusCode::CONFLICT,
    );
    pub const FORBIDDEN: Self = Self::new(
        "forbidden",
        "You don't have permission to access this resource",
        StatusCode::FORBIDDEN,
    );
    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred. Please try again later",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const MALFORMED_AUTH_TOKEN: Self = Self::new(
        "malformed_auth_token",
        "The authentication token format is invalid",
        StatusCode::UNAUTHORIZED,
    );
    pub const MISSING_AUTH_TOKEN: Self = Self::new(
        "missing_auth_token",
        "Authentication is required to access this resource",
        StatusCode::UNAUTHORIZED,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "The requested resource was not found",
        StatusCode::NOT_FOUND,
    );
    pub const UNAUTHORIZED: Self = Self::new(
        "unauthorized",
        "Invalid or expired authentication credentials",
        StatusCode::UNAUTHORIZED,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            resource: None,
            context: None,
            status,
        }
    }

    /// Replaces the user-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the resource the error relates to.
    pub fn with_resource(mut self, resource: impl Into<Cow<'a, str>>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{existing}; {new_context}")),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_not_serialized() {
        let response = ErrorResponse::BAD_REQUEST
            .with_resource("request")
            .with_message("Field 'vn' is required")
            .with_context("body validation");

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("name"));
        assert!(json.contains("message"));
        assert!(json.contains("resource"));
        assert!(json.contains("context"));
        assert!(!json.contains("status"));
    }

    #[test]
    fn context_merging() {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("database unavailable")
            .with_context("retry later");

        assert_eq!(
            response.context.as_deref(),
            Some("database unavailable; retry later")
        );
    }

    #[test]
    fn auth_responses_are_generic() {
        // Unknown identifier and wrong secret must serialize identically.
        let unknown = serde_json::to_string(&ErrorResponse::UNAUTHORIZED).unwrap();
        let mismatch = serde_json::to_string(&ErrorResponse::UNAUTHORIZED).unwrap();
        assert_eq!(unknown, mismatch);
    }
}
