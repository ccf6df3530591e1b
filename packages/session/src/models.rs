//! # Data models shared by the session layer and its backends
//!
//! ## Identity and sessions
//!
//! - [`Identity`]: the external user reference (`id`, `email`) issued by the identity
//!   provider.
//! - [`AuthSession`]: an identity plus its access/refresh token pair and expiry. The
//!   provider persists it; the session layer only reads [`AuthSession::is_live`].
//! - [`AuthEvent`]: a session-change notification (sign-in, sign-out, refresh, ...).
//!
//! ## Roles
//!
//! [`Role`] is the backend enum (`user` | `lawyer` | `admin`, where `user` is a client).
//! [`RoleAssignment`] is what the session holds: a role, or `Unresolved` while the
//! lookup is pending, failed, or the backend has not materialised the row yet.
//!
//! ## Rows
//!
//! [`Profile`], [`ProfileUpdate`], [`RoleRow`] and [`ConsultationRecord`] mirror the
//! `profiles`, `user_roles` and `consultation_requests` tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = Uuid;

/// Authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
}

impl Identity {
    /// The part of the email before `@`, used when no profile name exists.
    pub fn email_local_part(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// A provider session: identity plus tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp (seconds) after which the access token is rejected.
    pub expires_at: i64,
    pub user: Identity,
}

impl AuthSession {
    pub fn is_live(&self, now: i64) -> bool {
        self.expires_at > now
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEventKind {
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
    PasswordRecovery,
}

/// Session-change notification emitted by an [`IdentityProvider`](crate::IdentityProvider).
#[derive(Debug, Clone, PartialEq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<AuthSession>,
}

impl AuthEvent {
    pub fn new(kind: AuthEventKind, session: Option<AuthSession>) -> Self {
        Self { kind, session }
    }
}

/// Role enum as stored in `user_roles.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[serde(rename = "user")]
    Client,
    Lawyer,
    Admin,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Client => "Client",
            Role::Lawyer => "Lawyer",
            Role::Admin => "Admin",
        }
    }

    /// Backend enum value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "user",
            Role::Lawyer => "lawyer",
            Role::Admin => "admin",
        }
    }
}

/// Role held by the session. `Unresolved` is kept distinct from `Client` in the data
/// layer; only routing treats them alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleAssignment {
    #[default]
    Unresolved,
    Client,
    Lawyer,
    Admin,
}

impl RoleAssignment {
    pub fn role(&self) -> Option<Role> {
        match self {
            RoleAssignment::Unresolved => None,
            RoleAssignment::Client => Some(Role::Client),
            RoleAssignment::Lawyer => Some(Role::Lawyer),
            RoleAssignment::Admin => Some(Role::Admin),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, RoleAssignment::Unresolved)
    }
}

impl From<Role> for RoleAssignment {
    fn from(role: Role) -> Self {
        match role {
            Role::Client => RoleAssignment::Client,
            Role::Lawyer => RoleAssignment::Lawyer,
            Role::Admin => RoleAssignment::Admin,
        }
    }
}

impl From<Option<Role>> for RoleAssignment {
    fn from(role: Option<Role>) -> Self {
        role.map(RoleAssignment::from).unwrap_or_default()
    }
}

/// Sign-up metadata the backend materialises into `user_roles` and `profiles` once the
/// account is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub metadata: UserMetadata,
    /// Where the confirmation email sends the user back to.
    pub redirect_to: Option<String>,
}

/// One row of `user_roles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleRow {
    pub user_id: UserId,
    pub role: Role,
}

/// One row of `profiles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub id: Option<Uuid>,
    pub user_id: UserId,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub father_husband_name: Option<String>,
    pub nationality: Option<String>,
    pub enrollment_number: Option<String>,
    pub enrollment_date: Option<NaiveDate>,
    pub law_degree_university: Option<String>,
    pub years_of_experience: Option<i32>,
    pub practice_areas: Option<Vec<String>>,
    pub office_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub linkedin_url: Option<String>,
}

impl Profile {
    /// Apply an update in place, as the backend would on `UPDATE ... SET`.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        self.full_name = Some(update.full_name.clone());
        self.phone = update.phone.clone();
        self.bio = update.bio.clone();
        self.date_of_birth = update.date_of_birth;
        self.father_husband_name = update.father_husband_name.clone();
        self.nationality = update.nationality.clone();
        self.enrollment_number = Some(update.enrollment_number.clone());
        self.enrollment_date = update.enrollment_date;
        self.law_degree_university = Some(update.law_degree_university.clone());
        self.years_of_experience = update.years_of_experience;
        self.practice_areas = Some(update.practice_areas.clone());
        self.office_address = update.office_address.clone();
        self.city = update.city.clone();
        self.state = update.state.clone();
        self.linkedin_url = update.linkedin_url.clone();
    }
}

/// Column set written by the lawyer profile form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub father_husband_name: Option<String>,
    pub nationality: Option<String>,
    pub enrollment_number: String,
    pub enrollment_date: Option<NaiveDate>,
    pub law_degree_university: String,
    pub years_of_experience: Option<i32>,
    pub practice_areas: Vec<String>,
    pub office_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Contact form payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}

impl ConsultationRequest {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

/// How a consultation request was paid for.
///
/// `Unverified` means the checkout widget reported success in the browser. Nothing in
/// this workspace confirms settlement with the payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Free,
    Unverified,
}

/// One row of `consultation_requests`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    #[serde(flatten)]
    pub request: ConsultationRequest,
    pub payment_status: PaymentStatus,
    pub payment_id: Option<String>,
    pub amount_paise: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_backend_names() {
        assert_eq!(serde_json::to_string(&Role::Client).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Lawyer).unwrap(), "\"lawyer\"");
        let row: RoleRow = serde_json::from_str(
            r#"{"user_id":"6f1c1c44-7b5e-4d8e-9d7e-1b7b3c2e2a10","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(row.role, Role::Admin);
    }

    #[test]
    fn test_profile_tolerates_missing_and_null_columns() {
        let profile: Profile = serde_json::from_str(
            r#"{"user_id":"6f1c1c44-7b5e-4d8e-9d7e-1b7b3c2e2a10","full_name":null,"practice_areas":null}"#,
        )
        .unwrap();
        assert!(profile.full_name.is_none());
        assert!(profile.practice_areas.is_none());
        assert!(profile.city.is_none());
    }

    #[test]
    fn test_email_local_part() {
        let identity = Identity {
            id: Uuid::nil(),
            email: "asha.rao@example.in".to_string(),
        };
        assert_eq!(identity.email_local_part(), "asha.rao");
    }

    #[test]
    fn test_unresolved_is_not_client() {
        assert_ne!(RoleAssignment::Unresolved, RoleAssignment::Client);
        assert_eq!(RoleAssignment::from(None), RoleAssignment::Unresolved);
        assert_eq!(RoleAssignment::from(Some(Role::Lawyer)), RoleAssignment::Lawyer);
    }

    #[test]
    fn test_consultation_record_flattens_request() {
        let record = ConsultationRecord {
            request: ConsultationRequest {
                first_name: "B".into(),
                email: "b@x.com".into(),
                ..Default::default()
            },
            payment_status: PaymentStatus::Unverified,
            payment_id: Some("pay_1".into()),
            amount_paise: Some(9900),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["email"], "b@x.com");
        assert_eq!(json["payment_status"], "unverified");
    }
}
