//! Staff role enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Role of a staff account, gating access to administrative routes.
///
/// This enumeration corresponds to the `STAFF_ROLE` PostgreSQL enum.
/// Patients are not staff; their role exists only inside issued tokens.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::StaffRole"]
#[strum(serialize_all = "snake_case")]
pub enum StaffRole {
    /// Regular clinical staff member.
    #[default]
    #[db_rename = "staff"]
    #[serde(rename = "staff")]
    Staff,

    /// Administrator with full step-management access.
    #[db_rename = "admin"]
    #[serde(rename = "admin")]
    Admin,
}

impl StaffRole {
    /// Returns whether this role carries administrative privileges.
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
