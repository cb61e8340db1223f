//! Journey step repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{JourneyStep, NewJourneyStep, ServiceStep};
use crate::types::JourneyStatus;
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for journey progress operations.
///
/// Progress rows are created lazily: the first time staff record progress
/// for a (visit, step) pair, a row is inserted; later recordings update it.
pub trait JourneyStepRepository {
    /// Finds the progress record for a (visit, step) pair.
    fn find_journey_step(
        &mut self,
        visit_id: Uuid,
        service_step_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<JourneyStep>>> + Send;

    /// Records progress for a (visit, step) pair, inserting or updating.
    ///
    /// `started_at` is stamped the first time the step leaves `pending` and
    /// preserved afterwards; `completed_at` is stamped when the status is
    /// `completed` and cleared when a completed step is reopened.
    fn record_progress(
        &mut self,
        visit_id: Uuid,
        service_step_id: Uuid,
        status: JourneyStatus,
        note: Option<String>,
    ) -> impl Future<Output = PgResult<JourneyStep>> + Send;

    /// Loads the journey view for a visit: every catalog step in display
    /// order, paired with its progress record when one exists.
    fn journey_for_visit(
        &mut self,
        visit_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<(ServiceStep, Option<JourneyStep>)>>> + Send;
}

impl JourneyStepRepository for PgConnection {
    async fn find_journey_step(
        &mut self,
        visit_id: Uuid,
        service_step_id: Uuid,
    ) -> PgResult<Option<JourneyStep>> {
        use schema::journey_steps::{self, dsl};

        journey_steps::table
            .filter(dsl::visit_id.eq(visit_id))
            .filter(dsl::service_step_id.eq(service_step_id))
            .select(JourneyStep::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn record_progress(
        &mut self,
        visit_id: Uuid,
        service_step_id: Uuid,
        status: JourneyStatus,
        note: Option<String>,
    ) -> PgResult<JourneyStep> {
        use schema::journey_steps::{self, dsl};

        let now = jiff_diesel::Timestamp::from(jiff::Timestamp::now());
        let existing = self.find_journey_step(visit_id, service_step_id).await?;

        let Some(existing) = existing else {
            let new_step = NewJourneyStep {
                visit_id,
                service_step_id,
                status,
                note,
                started_at: status.is_started().then_some(now),
                completed_at: status.is_completed().then_some(now),
            };

            return diesel::insert_into(journey_steps::table)
                .values(&new_step)
                .returning(JourneyStep::as_returning())
                .get_result(self)
                .await
                .map_err(PgError::from);
        };

        // Preserve the original start time; clear the completion time when a
        // completed step is reopened.
        let started_at = match existing.started_at {
            Some(started_at) => Some(started_at),
            None => status.is_started().then_some(now),
        };
        let completed_at = if status.is_completed() {
            Some(existing.completed_at.unwrap_or(now))
        } else {
            None
        };

        diesel::update(journey_steps::table.filter(dsl::id.eq(existing.id)))
            .set((
                dsl::status.eq(status),
                dsl::note.eq(note),
                dsl::started_at.eq(started_at),
                dsl::completed_at.eq(completed_at),
                dsl::updated_at.eq(now),
            ))
            .returning(JourneyStep::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn journey_for_visit(
        &mut self,
        visit_id: Uuid,
    ) -> PgResult<Vec<(ServiceStep, Option<JourneyStep>)>> {
        use schema::journey_steps::dsl as journey_dsl;
        use schema::service_steps::{self, dsl as step_dsl};

        service_steps::table
            .left_join(
                schema::journey_steps::table.on(journey_dsl::service_step_id
                    .eq(step_dsl::id)
                    .and(journey_dsl::visit_id.eq(visit_id))),
            )
            .order(step_dsl::display_order.asc())
            .select((
                ServiceStep::as_select(),
                Option::<JourneyStep>::as_select(),
            ))
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
