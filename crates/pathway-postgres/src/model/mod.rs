//! Database models for all entities in the system.
//!
//! Each entity ships with a main `Queryable`/`Selectable` model, a `New*`
//! insertable companion, and (where partial updates exist) an `Update*`
//! changeset companion.

mod journey_step;
mod patient_visit;
mod service_step;
mod staff_account;

pub use journey_step::{JourneyStep, NewJourneyStep, UpdateJourneyStep};
pub use patient_visit::{NewPatientVisit, PatientVisit};
pub use service_step::{NewServiceStep, ServiceStep, UpdateServiceStep};
pub use staff_account::{NewStaffAccount, StaffAccount};
