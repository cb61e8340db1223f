//! JWT claims and the resolved request identity.
//!
//! [`AuthClaims`] carries both RFC 7519 registered claims and the
//! Pathway-specific claims (role, department, visit linkage). An
//! [`Identity`] is the claim payload seen from the application's side:
//! it is rebuilt fresh from the verified token on every request and never
//! persisted server-side.

use std::borrow::Cow;
use std::time::Duration;

use jiff::Timestamp;
use pathway_postgres::model::{PatientVisit, StaffAccount};
use pathway_postgres::types::StaffRole;
use serde::{Deserialize, Serialize};
use strum::Display;
use uuid::Uuid;

use crate::handler::{ErrorKind, Result};

/// Role of an authenticated principal.
///
/// Unlike [`StaffRole`], this includes patients, whose identity exists only
/// inside issued tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PrincipalRole {
    /// Patient authenticated for a single visit.
    Patient,
    /// Regular clinical staff member.
    Staff,
    /// Administrator.
    Admin,
}

impl PrincipalRole {
    /// Returns whether this role belongs to hospital personnel.
    #[inline]
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Staff | Self::Admin)
    }

    /// Returns whether this role carries administrative privileges.
    #[inline]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<StaffRole> for PrincipalRole {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::Staff => Self::Staff,
            StaffRole::Admin => Self::Admin,
        }
    }
}

/// Intended use of a token.
///
/// A refresh token never grants resource access; it can only be exchanged
/// for a new access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TokenUse {
    /// Short-lived bearer credential granting resource access.
    Access,
    /// Longer-lived credential exchanged for new access tokens.
    Refresh,
}

/// A resolved principal after authentication.
///
/// Immutable once encoded into a token; reconstructed per request from the
/// verified token contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Unique identifier of the principal (visit id or staff account id).
    pub subject_id: Uuid,
    /// Role gating route access.
    pub role: PrincipalRole,
    /// Department of a staff principal.
    pub department: Option<String>,
    /// Visit linkage of a patient principal.
    pub visit_id: Option<Uuid>,
}

impl Identity {
    /// Creates the identity for a patient authenticated against a visit.
    pub fn patient(visit: &PatientVisit) -> Self {
        Self {
            subject_id: visit.id,
            role: PrincipalRole::Patient,
            department: None,
            visit_id: Some(visit.id),
        }
    }

    /// Creates the identity for an authenticated staff account.
    pub fn staff(account: &StaffAccount) -> Self {
        Self {
            subject_id: account.id,
            role: account.role.into(),
            department: account.department.clone(),
            visit_id: None,
        }
    }
}

/// JWT claims for authentication tokens.
///
/// Contains both RFC 7519 registered claims and Pathway-specific claims.
/// Timestamps are numeric UNIX seconds so standard `exp` validation
/// applies.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AuthClaims {
    // Standard (or registered) claims.
    /// Issuer (who created the token).
    #[serde(rename = "iss")]
    issued_by: Cow<'static, str>,
    /// Audience (who the token is intended for).
    #[serde(rename = "aud")]
    audience: Cow<'static, str>,
    /// JWT ID (unique identifier for this token).
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Subject ID (visit id or staff account id).
    #[serde(rename = "sub")]
    pub subject_id: Uuid,
    /// Issued at (UNIX seconds).
    #[serde(rename = "iat")]
    issued_at: i64,
    /// Expiration time (UNIX seconds).
    #[serde(rename = "exp")]
    expires_at: i64,

    // Private (or custom) claims.
    /// Intended use of the token.
    #[serde(rename = "use")]
    pub token_use: TokenUse,
    /// Role of the principal.
    #[serde(rename = "rol")]
    pub role: PrincipalRole,
    /// Department of a staff principal.
    #[serde(rename = "dep", skip_serializing_if = "Option::is_none", default)]
    pub department: Option<String>,
    /// Visit linkage of a patient principal.
    #[serde(rename = "vis", skip_serializing_if = "Option::is_none", default)]
    pub visit_id: Option<Uuid>,
}

impl AuthClaims {
    /// JWT audience identifier for authentication tokens.
    pub const JWT_AUDIENCE: &'static str = "pathway:server";
    /// JWT issuer identifier for authentication tokens.
    pub const JWT_ISSUER: &'static str = "pathway";

    /// Creates a new claims structure for an identity.
    ///
    /// The token id is freshly generated; the expiry is `ttl` from now.
    pub fn new(identity: &Identity, token_use: TokenUse, ttl: Duration) -> Self {
        let issued_at = Timestamp::now().as_second();

        Self {
            issued_by: Cow::Borrowed(Self::JWT_ISSUER),
            audience: Cow::Borrowed(Self::JWT_AUDIENCE),
            token_id: Uuid::new_v4(),
            subject_id: identity.subject_id,
            issued_at,
            expires_at: issued_at + ttl.as_secs() as i64,
            token_use,
            role: identity.role,
            department: identity.department.clone(),
            visit_id: identity.visit_id,
        }
    }

    /// Reconstructs the identity encoded in these claims.
    pub fn identity(&self) -> Identity {
        Identity {
            subject_id: self.subject_id,
            role: self.role,
            department: self.department.clone(),
            visit_id: self.visit_id,
        }
    }

    /// Returns when the token was issued.
    #[inline]
    #[must_use]
    pub fn issued_at(&self) -> Timestamp {
        Timestamp::from_second(self.issued_at).unwrap_or_default()
    }

    /// Returns when the token expires.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        Timestamp::from_second(self.expires_at).unwrap_or_default()
    }

    /// Checks if the token has expired based on current UTC time.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now().as_second()
    }

    /// Authorizes hospital personnel access.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the principal is not staff or admin.
    pub fn authorize_staff(&self) -> Result<()> {
        if self.role.is_staff() {
            return Ok(());
        }

        tracing::warn!(
            target: crate::TRACING_TARGET_AUTHENTICATION,
            subject_id = %self.subject_id,
            role = %self.role,
            "access denied: staff role required"
        );
        Err(ErrorKind::Forbidden.with_message("Staff role required"))
    }

    /// Authorizes administrator access.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the principal is not an admin.
    pub fn authorize_admin(&self) -> Result<()> {
        if self.role.is_admin() {
            return Ok(());
        }

        tracing::warn!(
            target: crate::TRACING_TARGET_AUTHENTICATION,
            subject_id = %self.subject_id,
            role = %self.role,
            "access denied: administrator role required"
        );
        Err(ErrorKind::Forbidden.with_message("Administrator role required"))
    }

    /// Authorizes patient access and returns the linked visit id.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` if the principal is not a patient or the token
    /// carries no visit linkage.
    pub fn authorize_patient(&self) -> Result<Uuid> {
        if self.role == PrincipalRole::Patient
            && let Some(visit_id) = self.visit_id
        {
            return Ok(visit_id);
        }

        tracing::warn!(
            target: crate::TRACING_TARGET_AUTHENTICATION,
            subject_id = %self.subject_id,
            role = %self.role,
            "access denied: patient token required"
        );
        Err(ErrorKind::Forbidden.with_message("Patient token required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient_identity() -> Identity {
        let visit_id = Uuid::new_v4();
        Identity {
            subject_id: visit_id,
            role: PrincipalRole::Patient,
            department: None,
            visit_id: Some(visit_id),
        }
    }

    fn staff_identity(role: PrincipalRole) -> Identity {
        Identity {
            subject_id: Uuid::new_v4(),
            role,
            department: Some("radiology".to_string()),
            visit_id: None,
        }
    }

    #[test]
    fn identity_round_trip() {
        let identity = staff_identity(PrincipalRole::Staff);
        let claims = AuthClaims::new(&identity, TokenUse::Access, Duration::from_secs(1800));
        assert_eq!(claims.identity(), identity);
        assert!(!claims.is_expired());
    }

    #[test]
    fn role_authorization() {
        let patient = AuthClaims::new(
            &patient_identity(),
            TokenUse::Access,
            Duration::from_secs(60),
        );
        assert!(patient.authorize_patient().is_ok());
        assert!(patient.authorize_staff().is_err());
        assert!(patient.authorize_admin().is_err());

        let staff = AuthClaims::new(
            &staff_identity(PrincipalRole::Staff),
            TokenUse::Access,
            Duration::from_secs(60),
        );
        assert!(staff.authorize_staff().is_ok());
        assert!(staff.authorize_admin().is_err());

        let admin = AuthClaims::new(
            &staff_identity(PrincipalRole::Admin),
            TokenUse::Access,
            Duration::from_secs(60),
        );
        assert!(admin.authorize_staff().is_ok());
        assert!(admin.authorize_admin().is_ok());
    }

    #[test]
    fn staff_role_forbidden_maps_to_403() {
        let staff = AuthClaims::new(
            &staff_identity(PrincipalRole::Staff),
            TokenUse::Access,
            Duration::from_secs(60),
        );
        let error = staff.authorize_admin().unwrap_err();
        assert_eq!(error.kind().status_code().as_u16(), 403);
    }

    #[test]
    fn claims_serialize_with_short_names() {
        let claims = AuthClaims::new(
            &patient_identity(),
            TokenUse::Access,
            Duration::from_secs(60),
        );
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(json["iss"], "pathway");
        assert_eq!(json["aud"], "pathway:server");
        assert_eq!(json["use"], "access");
        assert_eq!(json["rol"], "patient");
        assert!(json["exp"].is_i64());
        // Staff-only claims are omitted for patients.
        assert!(json.get("dep").is_none());
    }
}
