//! Service step catalog model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::service_steps;

/// A clinical service step patients move through during a visit.
///
/// Steps form an ordered catalog (by `display_order`); the journey view
/// reports every catalog entry for a visit whether or not progress has
/// been recorded against it yet.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = service_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ServiceStep {
    /// Unique step identifier.
    pub id: Uuid,
    /// Display name of the step.
    pub name: String,
    /// Longer patient-facing description.
    pub description: Option<String>,
    /// Department responsible for the step.
    pub department: Option<String>,
    /// Ordering key within the catalog, unique across steps.
    pub display_order: i32,
    /// Timestamp when the step was created.
    pub created_at: Timestamp,
    /// Timestamp when the step was last updated.
    pub updated_at: Timestamp,
}

/// Data for creating a new service step.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = service_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewServiceStep {
    /// Display name of the step.
    pub name: String,
    /// Longer patient-facing description.
    pub description: Option<String>,
    /// Department responsible for the step.
    pub department: Option<String>,
    /// Ordering key within the catalog.
    pub display_order: i32,
}

/// Data for updating a service step.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = service_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateServiceStep {
    /// Display name of the step.
    pub name: Option<String>,
    /// Longer patient-facing description.
    pub description: Option<String>,
    /// Department responsible for the step.
    pub department: Option<String>,
    /// Ordering key within the catalog.
    pub display_order: Option<i32>,
}
