//! Patient visit model.
//!
//! A patient visit is the unit of patient identity in the system: patients
//! authenticate with the visit number plus their hospital number, and all
//! journey progress hangs off the visit row.
//!
//! ## Models
//!
//! - [`PatientVisit`] - Visit record with the hashed login secret
//! - [`NewPatientVisit`] - Data structure for registering a new visit

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::patient_visits;

/// A single hospital visit, also serving as the patient credential record.
///
/// The hospital number is stored only as an Argon2id PHC hash; the plaintext
/// never reaches the database.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = patient_visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PatientVisit {
    /// Unique visit identifier.
    pub id: Uuid,
    /// Patient-facing visit number, unique per visit.
    pub visit_number: String,
    /// One-way hash of the patient's hospital number.
    pub hospital_number_hash: String,
    /// Display name of the patient.
    pub patient_name: String,
    /// Department the visit is registered under.
    pub department: Option<String>,
    /// Timestamp when the visit was registered.
    pub created_at: Timestamp,
    /// Timestamp when the visit was last updated.
    pub updated_at: Timestamp,
    /// Timestamp when the visit was closed; closed visits cannot log in.
    pub closed_at: Option<Timestamp>,
}

/// Data for registering a new patient visit.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = patient_visits)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewPatientVisit {
    /// Patient-facing visit number, unique per visit.
    pub visit_number: String,
    /// One-way hash of the patient's hospital number.
    pub hospital_number_hash: String,
    /// Display name of the patient.
    pub patient_name: String,
    /// Department the visit is registered under.
    pub department: Option<String>,
}

impl PatientVisit {
    /// Returns whether the visit has been closed.
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }

    /// Returns whether the visit can still authenticate.
    pub fn can_login(&self) -> bool {
        !self.is_closed()
    }
}
