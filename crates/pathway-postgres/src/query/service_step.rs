//! Service step repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewServiceStep, ServiceStep, UpdateServiceStep};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for service step catalog operations.
///
/// The catalog is small and bounded, so listings return every step in
/// display order without pagination.
pub trait ServiceStepRepository {
    /// Creates a new service step.
    ///
    /// The display order must be unique; a duplicate surfaces as a unique
    /// constraint violation.
    fn create_step(
        &mut self,
        new_step: NewServiceStep,
    ) -> impl Future<Output = PgResult<ServiceStep>> + Send;

    /// Finds a service step by its unique identifier.
    fn find_step_by_id(
        &mut self,
        step_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<ServiceStep>>> + Send;

    /// Lists the full step catalog ordered by display order.
    fn list_steps(&mut self) -> impl Future<Output = PgResult<Vec<ServiceStep>>> + Send;

    /// Applies partial updates to an existing service step.
    ///
    /// Only fields set to `Some(value)` will be modified. Returns `None` if
    /// the step was not found.
    fn update_step(
        &mut self,
        step_id: Uuid,
        updates: UpdateServiceStep,
    ) -> impl Future<Output = PgResult<Option<ServiceStep>>> + Send;
}

impl ServiceStepRepository for PgConnection {
    async fn create_step(&mut self, mut new_step: NewServiceStep) -> PgResult<ServiceStep> {
        use schema::service_steps;

        // Normalize fields: trim whitespace
        new_step.name = new_step.name.trim().to_owned();
        if let Some(ref mut department) = new_step.department {
            *department = department.trim().to_owned();
        }

        diesel::insert_into(service_steps::table)
            .values(&new_step)
            .returning(ServiceStep::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_step_by_id(&mut self, step_id: Uuid) -> PgResult<Option<ServiceStep>> {
        use schema::service_steps::{self, dsl};

        service_steps::table
            .filter(dsl::id.eq(step_id))
            .select(ServiceStep::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_steps(&mut self) -> PgResult<Vec<ServiceStep>> {
        use schema::service_steps::{self, dsl};

        service_steps::table
            .order(dsl::display_order.asc())
            .select(ServiceStep::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_step(
        &mut self,
        step_id: Uuid,
        mut updates: UpdateServiceStep,
    ) -> PgResult<Option<ServiceStep>> {
        use schema::service_steps::{self, dsl};

        // Normalize fields: trim whitespace
        if let Some(name) = updates.name.as_mut() {
            *name = name.trim().to_owned();
        }

        diesel::update(service_steps::table.filter(dsl::id.eq(step_id)))
            .set((
                &updates,
                dsl::updated_at.eq(jiff_diesel::Timestamp::from(jiff::Timestamp::now())),
            ))
            .returning(ServiceStep::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
