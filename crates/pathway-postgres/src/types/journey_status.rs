//! Journey step status enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Progress state of a single clinical service step within a patient visit.
///
/// This enumeration corresponds to the `JOURNEY_STATUS` PostgreSQL enum.
/// A step that has never been touched by staff has no database row at all;
/// such steps are reported as [`JourneyStatus::Pending`] by the journey view.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::JourneyStatus"]
#[strum(serialize_all = "snake_case")]
pub enum JourneyStatus {
    /// The step has not been started yet.
    #[default]
    #[db_rename = "pending"]
    #[serde(rename = "pending")]
    Pending,

    /// The patient is currently at this step.
    #[db_rename = "in_progress"]
    #[serde(rename = "in_progress")]
    InProgress,

    /// The step has been completed.
    #[db_rename = "completed"]
    #[serde(rename = "completed")]
    Completed,
}

impl JourneyStatus {
    /// Returns whether this status marks the step as started.
    #[inline]
    pub fn is_started(self) -> bool {
        matches!(self, Self::InProgress | Self::Completed)
    }

    /// Returns whether this status marks the step as finished.
    #[inline]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&JourneyStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn started_and_completed_flags() {
        assert!(!JourneyStatus::Pending.is_started());
        assert!(JourneyStatus::InProgress.is_started());
        assert!(!JourneyStatus::InProgress.is_completed());
        assert!(JourneyStatus::Completed.is_completed());
    }
}
