//! Journey step model: recorded progress of a visit through a service step.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::journey_steps;
use crate::types::JourneyStatus;

/// Recorded progress of one visit through one service step.
///
/// Rows exist only once staff record progress; a (visit, step) pair without
/// a row is implicitly [`JourneyStatus::Pending`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = journey_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JourneyStep {
    /// Unique journey step identifier.
    pub id: Uuid,
    /// Visit this progress record belongs to.
    pub visit_id: Uuid,
    /// Service step this progress record tracks.
    pub service_step_id: Uuid,
    /// Current progress status.
    pub status: JourneyStatus,
    /// Free-form staff note shown to the patient.
    pub note: Option<String>,
    /// Timestamp when the step was first started.
    pub started_at: Option<Timestamp>,
    /// Timestamp when the step was completed.
    pub completed_at: Option<Timestamp>,
    /// Timestamp when the record was created.
    pub created_at: Timestamp,
    /// Timestamp when the record was last updated.
    pub updated_at: Timestamp,
}

/// Data for inserting a new journey step record.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = journey_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewJourneyStep {
    /// Visit this progress record belongs to.
    pub visit_id: Uuid,
    /// Service step this progress record tracks.
    pub service_step_id: Uuid,
    /// Initial progress status.
    pub status: JourneyStatus,
    /// Free-form staff note shown to the patient.
    pub note: Option<String>,
    /// Timestamp when the step was first started.
    pub started_at: Option<Timestamp>,
    /// Timestamp when the step was completed.
    pub completed_at: Option<Timestamp>,
}

/// Data for updating an existing journey step record.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = journey_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateJourneyStep {
    /// New progress status.
    pub status: Option<JourneyStatus>,
    /// Free-form staff note shown to the patient.
    pub note: Option<String>,
    /// Timestamp when the step was first started.
    pub started_at: Option<Timestamp>,
    /// Timestamp when the step was completed.
    pub completed_at: Option<Timestamp>,
}

impl JourneyStep {
    /// Returns whether this record marks the step as completed.
    pub fn is_completed(&self) -> bool {
        self.status.is_completed()
    }
}
