//! Backend seams.
//!
//! The session layer talks to two collaborators: an identity provider (sign-in, tokens,
//! session-change events) and a relational store (role, profile and consultation rows).
//! Futures are not required to be `Send`; in the browser everything runs on one thread.

use std::future::Future;

use tokio::sync::broadcast;

use crate::error::SessionError;
use crate::models::{
    AuthEvent, AuthSession, ConsultationRecord, Profile, ProfileUpdate, Role, RoleRow,
    SignUpRequest, UserId,
};

/// Async interface to the hosted identity provider.
pub trait IdentityProvider {
    fn sign_up(
        &self,
        request: SignUpRequest,
    ) -> impl Future<Output = Result<(), SessionError>>;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<AuthSession, SessionError>>;

    /// Revoke the current session. Succeeds when there is none.
    fn sign_out(&self) -> impl Future<Output = Result<(), SessionError>>;

    /// Session-change events. Registering happens when this is called, not on first poll.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;

    /// The persisted session, refreshed if its access token has expired.
    fn get_session(&self) -> impl Future<Output = Result<Option<AuthSession>, SessionError>>;

    /// Install a session from a token pair (password-recovery links).
    fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> impl Future<Output = Result<AuthSession, SessionError>>;

    fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> impl Future<Output = Result<(), SessionError>>;

    fn update_password(&self, new_password: &str)
        -> impl Future<Output = Result<(), SessionError>>;
}

/// Async interface to the relational store.
pub trait DataStore {
    /// Every `user_roles` row for the user. More than one row is an invariant violation
    /// the caller reports.
    fn roles_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Role>, SessionError>>;

    fn profile_for_user(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Profile>, SessionError>>;

    fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<Profile, SessionError>>;

    fn insert_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> impl Future<Output = Result<Profile, SessionError>>;

    fn list_profiles(&self) -> impl Future<Output = Result<Vec<Profile>, SessionError>>;

    fn list_role_rows(&self) -> impl Future<Output = Result<Vec<RoleRow>, SessionError>>;

    fn count_profiles_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<u64, SessionError>>;

    fn count_consultations_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<u64, SessionError>>;

    fn insert_consultation(
        &self,
        record: &ConsultationRecord,
    ) -> impl Future<Output = Result<(), SessionError>>;
}
