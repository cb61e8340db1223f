//! Credential verification against the credential store.
//!
//! The authenticator validates patient credentials (visit number plus
//! hospital number) and staff credentials (username plus password). Both
//! paths return the identical generic failure whether the identifier was
//! unknown or the secret mismatched, and perform a dummy hash
//! verification for unknown identifiers so response timing does not
//! reveal which identifiers exist.

use pathway_postgres::PgClient;
use pathway_postgres::model::StaffAccount;
use pathway_postgres::query::{PatientVisitRepository, StaffAccountRepository};

use crate::TRACING_TARGET_AUTHENTICATION;
use crate::extract::Identity;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::PasswordHasher;

/// Credential verifier over the externally owned credential store.
///
/// Read-only towards the store; holds no mutable state and is safe to
/// share across requests.
#[derive(Debug, Clone)]
pub struct Authenticator {
    pg_client: PgClient,
    password_hasher: PasswordHasher,
}

impl Authenticator {
    /// Creates a new authenticator over the given store handle.
    pub fn new(pg_client: PgClient, password_hasher: PasswordHasher) -> Self {
        Self {
            pg_client,
            password_hasher,
        }
    }

    /// Authenticates a patient by visit number and hospital number.
    ///
    /// Inputs are trimmed of surrounding whitespace before lookup. On
    /// success returns an [`Identity`] with the `patient` role and the
    /// visit linkage.
    ///
    /// # Errors
    ///
    /// Returns the same generic `Unauthorized` error for an unknown visit
    /// number, a mismatched hospital number, or a closed visit.
    pub async fn authenticate_patient(
        &self,
        visit_number: &str,
        hospital_number: &str,
    ) -> Result<Identity> {
        let visit_number = visit_number.trim();
        let hospital_number = hospital_number.trim();

        let mut conn = self.pg_client.get_connection().await?;
        let visit = conn.find_visit_by_number(visit_number).await?;

        // Always perform a hash verification so unknown visit numbers take
        // the same time as mismatched hospital numbers.
        let secret_valid = match &visit {
            Some(visit) => self
                .password_hasher
                .verify_secret(hospital_number, &visit.hospital_number_hash)
                .is_ok(),
            None => self.password_hasher.verify_dummy_secret(hospital_number),
        };

        let login_allowed = matches!(&visit, Some(visit) if secret_valid && visit.can_login());

        let Some(visit) = visit.filter(|_| login_allowed) else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                visit_number = %visit_number,
                "patient login failed"
            );
            return Err(Self::authentication_failed());
        };

        tracing::info!(
            target: TRACING_TARGET_AUTHENTICATION,
            visit_id = %visit.id,
            visit_number = %visit.visit_number,
            "patient login successful"
        );

        Ok(Identity::patient(&visit))
    }

    /// Authenticates a staff account by username and password.
    ///
    /// Inputs are trimmed of surrounding whitespace before lookup. On
    /// success returns the [`Identity`] with the stored role and
    /// department, plus the account row for response assembly.
    ///
    /// # Errors
    ///
    /// Returns the same generic `Unauthorized` error for an unknown
    /// username, a mismatched password, or a deleted account.
    pub async fn authenticate_staff(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(Identity, StaffAccount)> {
        let username = username.trim();
        let password = password.trim();

        let mut conn = self.pg_client.get_connection().await?;
        let account = conn.find_account_by_username(username).await?;

        // Always perform a hash verification so unknown usernames take the
        // same time as mismatched passwords.
        let secret_valid = match &account {
            Some(account) => self
                .password_hasher
                .verify_secret(password, &account.password_hash)
                .is_ok(),
            None => self.password_hasher.verify_dummy_secret(password),
        };

        let login_allowed =
            matches!(&account, Some(account) if secret_valid && account.can_login());

        let Some(account) = account.filter(|_| login_allowed) else {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                username = %username,
                "staff login failed"
            );
            return Err(Self::authentication_failed());
        };

        tracing::info!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = %account.id,
            username = %account.username,
            role = %account.role,
            "staff login successful"
        );

        Ok((Identity::staff(&account), account))
    }

    /// The single failure value for every credential failure.
    ///
    /// Identical for "identifier not found" and "secret mismatch" so the
    /// API cannot be used to enumerate visit numbers or usernames.
    fn authentication_failed() -> Error<'static> {
        ErrorKind::Unauthorized.into_error()
    }
}
