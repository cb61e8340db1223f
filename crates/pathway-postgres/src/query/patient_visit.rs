//! Patient visit repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewPatientVisit, PatientVisit};
use crate::types::Pagination;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for patient visit database operations.
///
/// Handles visit registration, credential lookups for patient login, and
/// the staff-facing queue of open visits.
pub trait PatientVisitRepository {
    /// Registers a new patient visit.
    ///
    /// The visit number must be unique; a duplicate surfaces as a unique
    /// constraint violation.
    fn create_visit(
        &mut self,
        new_visit: NewPatientVisit,
    ) -> impl Future<Output = PgResult<PatientVisit>> + Send;

    /// Finds a visit by its unique identifier.
    fn find_visit_by_id(
        &mut self,
        visit_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<PatientVisit>>> + Send;

    /// Finds a visit by its visit number.
    ///
    /// Used during patient login. The supplied number is trimmed before the
    /// exact-match lookup.
    fn find_visit_by_number(
        &mut self,
        visit_number: &str,
    ) -> impl Future<Output = PgResult<Option<PatientVisit>>> + Send;

    /// Lists open visits ordered by registration time, oldest first.
    ///
    /// Optionally filtered to a single department. Closed visits are
    /// excluded.
    fn list_open_visits(
        &mut self,
        department: Option<&str>,
        pagination: Pagination,
    ) -> impl Future<Output = PgResult<Vec<PatientVisit>>> + Send;

    /// Closes a visit, ending its ability to authenticate.
    ///
    /// Returns `None` if the visit was not found.
    fn close_visit(
        &mut self,
        visit_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<PatientVisit>>> + Send;
}

impl PatientVisitRepository for PgConnection {
    async fn create_visit(&mut self, mut new_visit: NewPatientVisit) -> PgResult<PatientVisit> {
        use schema::patient_visits;

        // Normalize fields: trim whitespace
        new_visit.visit_number = new_visit.visit_number.trim().to_owned();
        new_visit.patient_name = new_visit.patient_name.trim().to_owned();
        if let Some(ref mut department) = new_visit.department {
            *department = department.trim().to_owned();
        }

        diesel::insert_into(patient_visits::table)
            .values(&new_visit)
            .returning(PatientVisit::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_visit_by_id(&mut self, visit_id: Uuid) -> PgResult<Option<PatientVisit>> {
        use schema::patient_visits::{self, dsl};

        patient_visits::table
            .filter(dsl::id.eq(visit_id))
            .select(PatientVisit::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_visit_by_number(&mut self, visit_number: &str) -> PgResult<Option<PatientVisit>> {
        use schema::patient_visits::{self, dsl};

        patient_visits::table
            .filter(dsl::visit_number.eq(visit_number.trim()))
            .select(PatientVisit::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_open_visits(
        &mut self,
        department: Option<&str>,
        pagination: Pagination,
    ) -> PgResult<Vec<PatientVisit>> {
        use schema::patient_visits::{self, dsl};

        let mut query = patient_visits::table
            .filter(dsl::closed_at.is_null())
            .select(PatientVisit::as_select())
            .into_boxed();

        if let Some(department) = department {
            query = query.filter(dsl::department.eq(department.trim().to_owned()));
        }

        query
            .order(dsl::created_at.asc())
            .limit(pagination.limit)
            .offset(pagination.offset)
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn close_visit(&mut self, visit_id: Uuid) -> PgResult<Option<PatientVisit>> {
        use schema::patient_visits::{self, dsl};

        let now = jiff_diesel::Timestamp::from(jiff::Timestamp::now());

        diesel::update(
            patient_visits::table
                .filter(dsl::id.eq(visit_id))
                .filter(dsl::closed_at.is_null()),
        )
        .set((dsl::closed_at.eq(Some(now)), dsl::updated_at.eq(now)))
        .returning(PatientVisit::as_returning())
        .get_result(self)
        .await
        .optional()
        .map_err(PgError::from)
    }
}
