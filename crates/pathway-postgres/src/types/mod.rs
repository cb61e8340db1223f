//! Shared database types: Postgres enum mappings and pagination.

mod journey_status;
mod pagination;
mod staff_role;

pub use journey_status::JourneyStatus;
pub use pagination::Pagination;
pub use staff_role::StaffRole;
