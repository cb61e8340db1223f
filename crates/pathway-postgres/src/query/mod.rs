//! Database query repositories for all entities in the system.
//!
//! This module contains repository traits that provide high-level database
//! operations for all entities, implemented directly on the async
//! connection. Handlers obtain a [`PgConn`] from the client and call
//! repository methods through auto-deref.
//!
//! # Pagination
//!
//! Queries that may return large result sets use the [`Pagination`] struct
//! to provide consistent, bounded pagination across the system.
//!
//! [`PgConn`]: crate::PgConn
//! [`Pagination`]: crate::types::Pagination

pub mod journey_step;
pub mod patient_visit;
pub mod service_step;
pub mod staff_account;

pub use journey_step::JourneyStepRepository;
pub use patient_visit::PatientVisitRepository;
pub use service_step::ServiceStepRepository;
pub use staff_account::StaffAccountRepository;
