//! Secure secret hashing and verification using Argon2id.
//!
//! Both stored secrets in the system (patient hospital numbers and staff
//! passwords) go through this service. Verification returns the same
//! generic error for every failure mode so responses never reveal whether
//! an identifier exists.

use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};
use rand::rngs::OsRng;

use crate::handler::{ErrorKind, Result};

/// Tracing target for secret hashing operations.
const TRACING_TARGET: &str = "pathway_server::service::password_hasher";

/// Secret hashing and verification service using Argon2id.
///
/// Uses the default Argon2id parameters of the `argon2` crate, which follow
/// the current OWASP recommendation. The plaintext secret is never logged
/// and never stored.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new instance of the [`PasswordHasher`] service.
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hashes a secret with a fresh cryptographically secure random salt.
    ///
    /// Returns a PHC string that includes the algorithm, parameters, salt,
    /// and hash value, suitable for direct storage.
    ///
    /// # Errors
    ///
    /// Returns `InternalServerError` if salt generation or the hashing
    /// operation fails.
    pub fn hash_secret(&self, secret: &str) -> Result<String> {
        let salt = SaltString::try_from_rng(&mut OsRng).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "failed to generate cryptographically secure salt"
            );

            ErrorKind::InternalServerError
                .with_message("Secret processing failed")
                .with_resource("authentication")
        })?;

        let secret_hash = self
            .argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "secret hashing operation failed"
                );

                ErrorKind::InternalServerError
                    .with_message("Secret processing failed")
                    .with_resource("authentication")
            })?;

        Ok(secret_hash.to_string())
    }

    /// Verifies a secret against a stored PHC hash.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` with a generic message for a mismatched
    /// secret, and `InternalServerError` for an unparseable stored hash or
    /// a verifier fault. The response body is identical for every
    /// authentication failure.
    pub fn verify_secret(&self, secret: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %e,
                "stored hash has invalid format"
            );

            ErrorKind::InternalServerError
                .with_message("Authentication temporarily unavailable")
                .with_resource("authentication")
        })?;

        match self.argon2.verify_password(secret.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "secret verification failed: mismatch"
                );

                Err(ErrorKind::Unauthorized.into_error())
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "secret verification system error"
                );

                Err(ErrorKind::InternalServerError
                    .with_message("Authentication temporarily unavailable")
                    .with_resource("authentication"))
            }
        }
    }

    /// Performs a dummy verification to keep timing uniform.
    ///
    /// Called when the looked-up identifier does not exist, so an unknown
    /// visit number or username takes approximately the same time as a
    /// wrong secret. Always returns `false`.
    pub fn verify_dummy_secret(&self, secret: &str) -> bool {
        use rand::Rng;

        let dummy_len = rand::random_range(16..32);
        let dummy_secret: String = (0..dummy_len)
            .map(|_| rand::rng().sample(rand::distr::Alphanumeric) as char)
            .collect();

        if let Ok(dummy_hash) = self.hash_secret(&dummy_secret) {
            let _ = self.verify_secret(secret, &dummy_hash);
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_secret() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let secret = "1234567";
        let hash = hasher.hash_secret(secret)?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_secret(secret, &hash).is_ok());
        assert!(hasher.verify_secret("0000000", &hash).is_err());

        Ok(())
    }

    #[test]
    fn hash_produces_unique_salts() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let secret = "hospital-number";

        let hash1 = hasher.hash_secret(secret)?;
        let hash2 = hasher.hash_secret(secret)?;

        assert_ne!(hash1, hash2);
        assert!(hasher.verify_secret(secret, &hash1).is_ok());
        assert!(hasher.verify_secret(secret, &hash2).is_ok());

        Ok(())
    }

    #[test]
    fn mismatch_is_unauthorized() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_secret("correct-secret")?;

        let error = hasher.verify_secret("wrong-secret", &hash).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unauthorized);

        Ok(())
    }

    #[test]
    fn invalid_stored_hash_is_internal_error() {
        let hasher = PasswordHasher::new();

        let error = hasher
            .verify_secret("secret", "not-a-phc-string")
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn dummy_verification_always_fails() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_dummy_secret("anything"));
    }
}
