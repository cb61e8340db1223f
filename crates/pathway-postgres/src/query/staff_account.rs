//! Staff account repository.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::model::{NewStaffAccount, StaffAccount};
use crate::{PgConnection, PgError, PgResult, schema};

/// Repository for staff account database operations.
///
/// Accounts are provisioned administratively (CLI), never over HTTP. The
/// authenticator treats this repository as read-only.
pub trait StaffAccountRepository {
    /// Creates a new staff account.
    ///
    /// The username must be unique; a duplicate surfaces as a unique
    /// constraint violation.
    fn create_account(
        &mut self,
        new_account: NewStaffAccount,
    ) -> impl Future<Output = PgResult<StaffAccount>> + Send;

    /// Finds an account by its unique identifier.
    ///
    /// Soft-deleted accounts are excluded.
    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<StaffAccount>>> + Send;

    /// Finds an account by username.
    ///
    /// Used during staff login. The supplied username is trimmed before the
    /// exact-match lookup. Soft-deleted accounts are excluded.
    fn find_account_by_username(
        &mut self,
        username: &str,
    ) -> impl Future<Output = PgResult<Option<StaffAccount>>> + Send;
}

impl StaffAccountRepository for PgConnection {
    async fn create_account(&mut self, mut new_account: NewStaffAccount) -> PgResult<StaffAccount> {
        use schema::staff_accounts;

        // Normalize fields: trim whitespace
        new_account.username = new_account.username.trim().to_owned();
        new_account.full_name = new_account.full_name.trim().to_owned();
        if let Some(ref mut department) = new_account.department {
            *department = department.trim().to_owned();
        }

        diesel::insert_into(staff_accounts::table)
            .values(&new_account)
            .returning(StaffAccount::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<StaffAccount>> {
        use schema::staff_accounts::{self, dsl};

        staff_accounts::table
            .filter(dsl::id.eq(account_id))
            .filter(dsl::deleted_at.is_null())
            .select(StaffAccount::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_username(
        &mut self,
        username: &str,
    ) -> PgResult<Option<StaffAccount>> {
        use schema::staff_accounts::{self, dsl};

        staff_accounts::table
            .filter(dsl::username.eq(username.trim()))
            .filter(dsl::deleted_at.is_null())
            .select(StaffAccount::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }
}
