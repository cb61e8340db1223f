//! Staff account model for authentication and authorization.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::staff_accounts;
use crate::types::StaffRole;

/// A staff or administrator account.
///
/// The password is stored only as an Argon2id PHC hash. Accounts are
/// soft-deleted; deleted accounts cannot authenticate.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = staff_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StaffAccount {
    /// Unique account identifier.
    pub id: Uuid,
    /// Login username, unique across accounts.
    pub username: String,
    /// One-way hash of the account password.
    pub password_hash: String,
    /// Human-readable name for UI display.
    pub full_name: String,
    /// Role gating administrative routes.
    pub role: StaffRole,
    /// Department the account belongs to.
    pub department: Option<String>,
    /// Whether this account may register patient visits.
    pub can_add_patients: bool,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was last updated.
    pub updated_at: Timestamp,
    /// Timestamp when the account was soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

/// Data for creating a new staff account.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = staff_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewStaffAccount {
    /// Login username, unique across accounts.
    pub username: String,
    /// One-way hash of the account password.
    pub password_hash: String,
    /// Human-readable name for UI display.
    pub full_name: String,
    /// Role gating administrative routes.
    pub role: StaffRole,
    /// Department the account belongs to.
    pub department: Option<String>,
    /// Whether this account may register patient visits.
    pub can_add_patients: bool,
}

impl StaffAccount {
    /// Returns whether the account has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Returns whether the account can authenticate.
    pub fn can_login(&self) -> bool {
        !self.is_deleted()
    }

    /// Returns whether the account has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the account may register patient visits.
    ///
    /// Administrators always may; regular staff need the capability flag.
    pub fn may_add_patients(&self) -> bool {
        self.is_admin() || self.can_add_patients
    }
}
