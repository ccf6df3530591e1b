//! # Session store: who is logged in, and as what
//!
//! [`SessionStore`] is constructed once per application and shared by every view. It
//! owns:
//!
//! - the current [`SessionState`] snapshot, published on a `tokio::sync::watch`
//!   channel so every consumer reads the same value;
//! - the identity provider and data store it resolves identities against;
//! - a shutdown flag that ends the background listener started by
//!   [`initialize`](SessionStore::initialize).
//!
//! ## Convergence
//!
//! Provider events (sign-in, sign-out, token refresh, other tabs) and the persisted
//! session check on start-up all funnel into one routine, `converge`. It compares the
//! incoming identity with the held one:
//!
//! - a **different** identity (account switch, sign-out) bumps the epoch, clears role
//!   and profile, and starts a fresh role/profile lookup;
//! - the **same** identity only refreshes token expiry and never regresses an already
//!   resolved role or name.
//!
//! Lookups are tagged with the epoch they were started for. A response that arrives
//! after the identity changed is dropped.
//!
//! ## Loading
//!
//! `loading` starts `true` and flips to `false` exactly once: when the first identity
//! resolution completes (no identity, or an identity whose role/profile lookup
//! finished). Routing waits on it.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;

use crate::error::SessionError;
use crate::models::{AuthSession, Identity, Role, RoleAssignment, SignUpRequest, UserId, UserMetadata};
use crate::provider::{DataStore, IdentityProvider};

/// Read-only snapshot of the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// Access token expiry of the held session (unix seconds).
    pub expires_at: Option<i64>,
    pub role: RoleAssignment,
    pub full_name: Option<String>,
    pub loading: bool,
    pub(crate) epoch: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            identity: None,
            expires_at: None,
            role: RoleAssignment::Unresolved,
            full_name: None,
            loading: true,
            epoch: 0,
        }
    }
}

impl SessionState {
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.identity.as_ref().map(|identity| identity.id)
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.email.as_str())
    }

    /// Whether the held access token is still accepted at `now`.
    pub fn credentials_valid(&self, now: i64) -> bool {
        self.identity.is_some() && self.expires_at.is_some_and(|expires_at| expires_at > now)
    }

    /// Profile name, or the local part of the email when no name is stored.
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.identity.as_ref().map(Identity::email_local_part))
    }

    fn clear_identity(&mut self) {
        self.identity = None;
        self.expires_at = None;
        self.role = RoleAssignment::Unresolved;
        self.full_name = None;
        self.epoch += 1;
    }
}

/// Map the `user_roles` rows of one user to an assignment.
pub fn assignment_from_roles(
    user_id: UserId,
    roles: &[Role],
) -> Result<RoleAssignment, SessionError> {
    match roles {
        [] => Ok(RoleAssignment::Unresolved),
        [role] => Ok(RoleAssignment::from(*role)),
        rows => Err(SessionError::AmbiguousRole {
            user_id,
            rows: rows.len(),
        }),
    }
}

#[derive(Debug, Default)]
struct Lookups {
    in_flight: Option<u64>,
    resolved: Option<u64>,
}

struct Inner<P, D> {
    provider: P,
    data: D,
    state: watch::Sender<SessionState>,
    shutdown: watch::Sender<bool>,
    lookups: Mutex<Lookups>,
}

/// Shared session container. Cloning is cheap and every clone sees the same state.
pub struct SessionStore<P, D> {
    inner: Arc<Inner<P, D>>,
    site_url: Arc<str>,
}

impl<P, D> Clone for SessionStore<P, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            site_url: Arc::clone(&self.site_url),
        }
    }
}

impl<P, D> SessionStore<P, D>
where
    P: IdentityProvider + 'static,
    D: DataStore + 'static,
{
    pub fn new(provider: P, data: D) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        let (shutdown, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                provider,
                data,
                state,
                shutdown,
                lookups: Mutex::new(Lookups::default()),
            }),
            site_url: Arc::from(""),
        }
    }

    /// Builder method to set the public origin used in email redirect links.
    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = Arc::from(site_url.into().trim_end_matches('/'));
        self
    }

    pub fn provider(&self) -> &P {
        &self.inner.provider
    }

    pub fn data(&self) -> &D {
        &self.inner.data
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Resolves once `loading` is false.
    pub async fn wait_until_loaded(&self) -> SessionState {
        let mut rx = self.subscribe();
        let loaded = match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.snapshot(),
        };
        loaded
    }

    /// Start listening for session changes and recover the persisted session.
    ///
    /// The event subscription is registered before this returns. The returned future
    /// drives both producers and completes after [`teardown`](Self::teardown).
    pub fn initialize(&self) -> impl Future<Output = ()> + 'static {
        let mut events = self.inner.provider.subscribe();
        let mut shutdown = self.inner.shutdown.subscribe();
        let store = self.clone();

        async move {
            let listener = async {
                loop {
                    tokio::select! {
                        biased;
                        _ = shutdown.wait_for(|stop| *stop) => break,
                        event = events.recv() => match event {
                            Ok(event) => {
                                tracing::debug!(kind = ?event.kind, "session change event");
                                store.converge(event.session).await;
                            }
                            Err(RecvError::Lagged(skipped)) => {
                                tracing::warn!(skipped, "missed session events, re-reading session");
                                store.recover().await;
                            }
                            Err(RecvError::Closed) => break,
                        },
                    }
                }
            };

            tokio::join!(listener, store.recover());
            tracing::debug!("session listener stopped");
        }
    }

    /// Stop the background listener started by [`initialize`](Self::initialize).
    pub fn teardown(&self) {
        self.inner.shutdown.send_replace(true);
    }

    /// Check credentials with the provider. The provider's message is returned verbatim.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), SessionError> {
        let session = self
            .inner
            .provider
            .sign_in_with_password(email.trim(), password)
            .await?;
        tracing::info!(user_id = %session.user.id, "signed in");
        self.converge(Some(session)).await;
        Ok(())
    }

    /// Register an account. Role and profile rows only appear once the backend
    /// materialises them after email confirmation.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        role: Role,
        phone: Option<String>,
    ) -> Result<(), SessionError> {
        let request = SignUpRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            metadata: UserMetadata {
                full_name: full_name.trim().to_string(),
                role,
                phone: phone.filter(|phone| !phone.is_empty()),
            },
            redirect_to: (!self.site_url.is_empty()).then(|| self.site_url.to_string()),
        };
        self.inner.provider.sign_up(request).await?;
        tracing::info!(role = role.as_str(), "account registered, awaiting confirmation");
        Ok(())
    }

    /// Revoke the session and clear local state. Safe to call when signed out.
    pub async fn sign_out(&self) {
        if let Err(e) = self.inner.provider.sign_out().await {
            tracing::warn!("provider sign-out failed, clearing local session anyway: {}", e);
        }
        let cleared = self.inner.state.send_if_modified(|state| {
            if state.identity.is_none() {
                return false;
            }
            state.clear_identity();
            state.loading = false;
            true
        });
        if cleared {
            tracing::info!("signed out");
        }
    }

    /// Send a password reset link that lands on `/reset-password`.
    pub async fn reset_password_for_email(&self, email: &str) -> Result<(), SessionError> {
        let redirect_to = format!("{}/reset-password", self.site_url);
        self.inner
            .provider
            .reset_password_for_email(email.trim(), &redirect_to)
            .await
    }

    /// Install the session carried by a recovery link.
    pub async fn recover_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), SessionError> {
        let session = self
            .inner
            .provider
            .set_session(access_token, refresh_token)
            .await?;
        self.converge(Some(session)).await;
        Ok(())
    }

    pub async fn update_password(&self, new_password: &str) -> Result<(), SessionError> {
        self.inner.provider.update_password(new_password).await
    }

    /// Re-run the role/profile lookup for the current identity, e.g. after a profile
    /// edit. Failed lookups keep the values already held.
    pub async fn refresh_profile(&self) {
        let current = {
            let state = self.inner.state.borrow();
            state.user_id().map(|user_id| (user_id, state.epoch))
        };
        if let Some((user_id, epoch)) = current {
            self.lookups().in_flight = Some(epoch);
            self.fetch_role_and_profile(user_id, epoch).await;
        }
    }

    async fn recover(&self) {
        match self.inner.provider.get_session().await {
            Ok(session) => self.converge(session).await,
            Err(e) => {
                tracing::warn!("could not read persisted session: {}", e);
                // A failed read is not a sign-out; only settle the initial load.
                self.inner.state.send_if_modified(|state| {
                    std::mem::replace(&mut state.loading, false)
                });
            }
        }
    }

    /// Single update routine for every session source.
    async fn converge(&self, session: Option<AuthSession>) {
        let now = Utc::now().timestamp();
        let session = session.filter(|session| {
            let live = session.is_live(now);
            if !live {
                tracing::debug!(user_id = %session.user.id, "ignoring expired session");
            }
            live
        });

        let mut fetch = None;
        self.inner.state.send_if_modified(|state| match session {
            None => {
                let changed = state.identity.is_some() || state.loading;
                if state.identity.is_some() {
                    state.clear_identity();
                }
                state.loading = false;
                changed
            }
            Some(session) if state.user_id() == Some(session.user.id) => {
                let mut lookups = self.lookups();
                if lookups.in_flight != Some(state.epoch) && lookups.resolved != Some(state.epoch) {
                    lookups.in_flight = Some(state.epoch);
                    fetch = Some((session.user.id, state.epoch));
                }
                let changed = state.expires_at != Some(session.expires_at)
                    || state.identity.as_ref() != Some(&session.user);
                state.expires_at = Some(session.expires_at);
                state.identity = Some(session.user);
                changed
            }
            Some(session) => {
                state.clear_identity();
                let user_id = session.user.id;
                state.expires_at = Some(session.expires_at);
                state.identity = Some(session.user);
                self.lookups().in_flight = Some(state.epoch);
                fetch = Some((user_id, state.epoch));
                tracing::debug!(%user_id, epoch = state.epoch, "identity changed");
                true
            }
        });

        if let Some((user_id, epoch)) = fetch {
            self.fetch_role_and_profile(user_id, epoch).await;
        }
    }

    /// Two independent lookups; either may fail without affecting the other. The
    /// epoch only counts as resolved once both succeed, so the next event for the
    /// same identity retries after a failure.
    async fn fetch_role_and_profile(&self, user_id: UserId, epoch: u64) {
        let (role, full_name) = tokio::join!(self.lookup_role(user_id), self.lookup_full_name(user_id));

        {
            let mut lookups = self.lookups();
            if lookups.in_flight == Some(epoch) {
                lookups.in_flight = None;
                if role.is_some() && full_name.is_some() {
                    lookups.resolved = Some(epoch);
                }
            }
        }

        let applied = self.inner.state.send_if_modified(|state| {
            if state.epoch != epoch {
                return false;
            }
            if let Some(role) = role {
                state.role = role;
            }
            if let Some(full_name) = full_name {
                state.full_name = full_name;
            }
            state.loading = false;
            true
        });

        if !applied {
            tracing::debug!(%user_id, epoch, "dropping role/profile for a superseded identity");
        }
    }

    /// `None` when the lookup failed and the held value should be kept.
    async fn lookup_role(&self, user_id: UserId) -> Option<RoleAssignment> {
        let roles = match self.inner.data.roles_for_user(user_id).await {
            Ok(roles) => roles,
            Err(e) => {
                tracing::warn!(%user_id, "role lookup failed: {}", e);
                return None;
            }
        };
        match assignment_from_roles(user_id, &roles) {
            Ok(role) => Some(role),
            Err(e) => {
                tracing::error!("{}", e);
                Some(RoleAssignment::Unresolved)
            }
        }
    }

    async fn lookup_full_name(&self, user_id: UserId) -> Option<Option<String>> {
        match self.inner.data.profile_for_user(user_id).await {
            Ok(profile) => Some(profile.and_then(|profile| profile.full_name)),
            Err(e) => {
                tracing::warn!(%user_id, "profile lookup failed: {}", e);
                None
            }
        }
    }

    fn lookups(&self) -> MutexGuard<'_, Lookups> {
        self.inner
            .lookups
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBackend;
    use crate::models::{AuthEvent, AuthEventKind, ConsultationRecord, Profile, ProfileUpdate, RoleRow};
    use crate::router::{resolve_root, Dashboard, RootView};
    use std::sync::Arc;
    use tokio::sync::Notify;

    type Store = SessionStore<MemoryBackend, MemoryBackend>;

    fn store_for(backend: &MemoryBackend) -> Store {
        SessionStore::new(backend.clone(), backend.clone()).with_site_url("https://unseenlawyers.in/")
    }

    /// Collect every published snapshot until the store is torn down. The first
    /// snapshot is taken on the call, before any other future in a `join!` runs.
    fn record(
        mut rx: watch::Receiver<SessionState>,
        mut stop: watch::Receiver<bool>,
    ) -> impl Future<Output = Vec<SessionState>> {
        let first = rx.borrow_and_update().clone();
        async move {
            let mut seen = vec![first];
            loop {
                tokio::select! {
                    biased;
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        seen.push(rx.borrow_and_update().clone());
                    }
                    _ = stop.wait_for(|stop| *stop) => break,
                }
            }
            seen
        }
    }

    #[tokio::test]
    async fn test_restores_persisted_session_with_role() {
        let backend = MemoryBackend::new();
        let user_id = backend.seed_user("lawyer@x.com", "secret1", Some(Role::Lawyer), Some("Asha Rao"));
        backend.sign_in_with_password("lawyer@x.com", "secret1").await.unwrap();

        let store = store_for(&backend);
        let recorder = record(store.subscribe(), store.inner.shutdown.subscribe());
        let ((), seen, loaded) = tokio::join!(store.initialize(), recorder, async {
            let loaded = store.wait_until_loaded().await;
            store.teardown();
            loaded
        });

        assert_eq!(loaded.user_id(), Some(user_id));
        assert_eq!(loaded.role, RoleAssignment::Lawyer);
        assert_eq!(loaded.display_name(), Some("Asha Rao"));
        assert!(loaded.credentials_valid(Utc::now().timestamp()));

        // Never a resolved-looking state with a missing role.
        assert!(seen.iter().filter(|s| !s.loading).all(|s| s.role == RoleAssignment::Lawyer));
        assert!(seen[0].loading);
        let flips = seen.windows(2).filter(|w| w[0].loading && !w[1].loading).count();
        assert_eq!(flips, 1);
    }

    #[tokio::test]
    async fn test_no_persisted_session_loads_anonymous() {
        let backend = MemoryBackend::new();
        let store = store_for(&backend);
        let ((), loaded) = tokio::join!(store.initialize(), async {
            let loaded = store.wait_until_loaded().await;
            store.teardown();
            loaded
        });
        assert!(loaded.identity.is_none());
        assert!(!loaded.loading);
        assert_eq!(resolve_root(&loaded, false), RootView::Landing);
    }

    #[tokio::test]
    async fn test_sign_in_resolves_identity_role_and_loading_once() {
        let backend = MemoryBackend::new();
        backend.seed_user("client@x.com", "secret1", Some(Role::Client), None);
        let store = store_for(&backend);

        let recorder = record(store.subscribe(), store.inner.shutdown.subscribe());
        let ((), seen, result) = tokio::join!(store.initialize(), recorder, async {
            store.wait_until_loaded().await;
            let result = store.sign_in("client@x.com", "secret1").await;
            store.teardown();
            result
        });

        assert!(result.is_ok());
        let state = store.snapshot();
        assert_eq!(state.email(), Some("client@x.com"));
        assert_eq!(state.role, RoleAssignment::Client);
        assert_eq!(state.display_name(), Some("client"));
        assert!(seen[0].loading);
        let flips = seen.windows(2).filter(|w| w[0].loading && !w[1].loading).count();
        assert_eq!(flips, 1);
        assert!(seen
            .iter()
            .all(|s| !matches!(resolve_root(s, false), RootView::Redirect(_))));
    }

    #[tokio::test]
    async fn test_invalid_credentials_keep_identity_absent() {
        let backend = MemoryBackend::new();
        backend.seed_user("client@x.com", "secret1", Some(Role::Client), None);
        let store = store_for(&backend);

        let err = store.sign_in("client@x.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert!(store.snapshot().identity.is_none());
    }

    #[tokio::test]
    async fn test_sign_out_when_signed_out_is_a_no_op() {
        let backend = MemoryBackend::new();
        let store = store_for(&backend);
        let ((), ()) = tokio::join!(store.initialize(), async {
            store.wait_until_loaded().await;
            store.teardown();
        });

        let before = store.snapshot();
        store.sign_out().await;
        store.sign_out().await;
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_sign_out_clears_identity_role_and_name() {
        let backend = MemoryBackend::new();
        backend.seed_user("admin@x.com", "secret1", Some(Role::Admin), Some("Root"));
        let store = store_for(&backend);

        store.sign_in("admin@x.com", "secret1").await.unwrap();
        assert_eq!(store.snapshot().role, RoleAssignment::Admin);

        store.sign_out().await;
        let state = store.snapshot();
        assert!(state.identity.is_none());
        assert_eq!(state.role, RoleAssignment::Unresolved);
        assert!(state.full_name.is_none());
        assert!(backend.current_session().is_none());
    }

    #[tokio::test]
    async fn test_lookup_failures_degrade_to_unresolved() {
        let backend = MemoryBackend::new();
        backend.seed_user("lawyer@x.com", "secret1", Some(Role::Lawyer), Some("Asha"));
        backend.fail_role_lookups(true);
        let store = store_for(&backend);

        store.sign_in("lawyer@x.com", "secret1").await.unwrap();
        let state = store.snapshot();
        assert!(state.is_signed_in());
        assert!(!state.loading);
        assert_eq!(state.role, RoleAssignment::Unresolved);
        // The profile lookup is independent of the failed role lookup.
        assert_eq!(state.full_name.as_deref(), Some("Asha"));
        assert_eq!(resolve_root(&state, false), RootView::Home);
    }

    #[tokio::test]
    async fn test_failed_role_lookup_is_retried_on_next_event() {
        let backend = MemoryBackend::new();
        backend.seed_user("lawyer@x.com", "secret1", Some(Role::Lawyer), Some("Asha"));
        backend.fail_role_lookups(true);
        let store = store_for(&backend);

        store.sign_in("lawyer@x.com", "secret1").await.unwrap();
        assert_eq!(store.snapshot().role, RoleAssignment::Unresolved);

        backend.fail_role_lookups(false);
        store.converge(backend.current_session()).await;
        assert_eq!(store.snapshot().role, RoleAssignment::Lawyer);
        assert_eq!(backend.role_lookups(), 2);

        // Once resolved, further events for the same identity stay quiet.
        store.converge(backend.current_session()).await;
        assert_eq!(backend.role_lookups(), 2);
    }

    #[tokio::test]
    async fn test_unreadable_session_storage_keeps_signed_in_user() {
        let backend = MemoryBackend::new();
        let user_id = backend.seed_user("client@x.com", "secret1", Some(Role::Client), Some("Ravi"));
        let store = store_for(&backend);
        store.sign_in("client@x.com", "secret1").await.unwrap();

        backend.fail_session_reads(true);
        store.recover().await;

        let state = store.snapshot();
        assert_eq!(state.user_id(), Some(user_id));
        assert_eq!(state.role, RoleAssignment::Client);
        assert_eq!(state.display_name(), Some("Ravi"));
    }

    #[tokio::test]
    async fn test_unreadable_session_storage_still_finishes_loading() {
        let backend = MemoryBackend::new();
        backend.fail_session_reads(true);
        let store = store_for(&backend);

        let ((), loaded) = tokio::join!(store.initialize(), async {
            let loaded = store.wait_until_loaded().await;
            store.teardown();
            loaded
        });
        assert!(!loaded.loading);
        assert!(loaded.identity.is_none());
    }

    #[tokio::test]
    async fn test_multiple_role_rows_are_not_silently_picked() {
        let backend = MemoryBackend::new();
        let user_id = backend.seed_user("two@x.com", "secret1", Some(Role::Lawyer), None);
        backend.add_role_row(user_id, Role::Admin);
        let store = store_for(&backend);

        store.sign_in("two@x.com", "secret1").await.unwrap();
        assert_eq!(store.snapshot().role, RoleAssignment::Unresolved);
        assert_eq!(
            assignment_from_roles(user_id, &[Role::Lawyer, Role::Admin]),
            Err(SessionError::AmbiguousRole { user_id, rows: 2 })
        );
    }

    #[tokio::test]
    async fn test_lawyer_sign_up_before_confirmation_routes_as_client() {
        let backend = MemoryBackend::new();
        let store = store_for(&backend);

        store
            .sign_up("a@x.com", "secret1", "Asha", Role::Lawyer, Some("9876543210".into()))
            .await
            .unwrap();
        assert_eq!(backend.last_redirect().as_deref(), Some("https://unseenlawyers.in"));

        store.sign_in("a@x.com", "secret1").await.unwrap();
        let state = store.snapshot();
        assert!(state.is_signed_in());
        assert_eq!(state.role, RoleAssignment::Unresolved);
        assert_eq!(resolve_root(&state, false), RootView::Home);

        backend.confirm_email("a@x.com");
        store.refresh_profile().await;
        let state = store.snapshot();
        assert_eq!(state.role, RoleAssignment::Lawyer);
        assert_eq!(state.display_name(), Some("Asha"));
        assert_eq!(resolve_root(&state, false), RootView::Redirect(Dashboard::Lawyer));
    }

    #[tokio::test]
    async fn test_listener_and_recovery_resolve_the_same_identity_once() {
        let backend = MemoryBackend::new();
        backend.seed_user("lawyer@x.com", "secret1", Some(Role::Lawyer), None);
        let session = backend.sign_in_with_password("lawyer@x.com", "secret1").await.unwrap();
        let store = store_for(&backend);

        let ((), ()) = tokio::join!(store.initialize(), async {
            backend.emit(AuthEvent::new(AuthEventKind::SignedIn, Some(session.clone())));
            store.wait_until_loaded().await;
            backend.emit(AuthEvent::new(AuthEventKind::TokenRefreshed, Some(session.clone())));
            tokio::task::yield_now().await;
            store.teardown();
        });

        assert_eq!(store.snapshot().role, RoleAssignment::Lawyer);
        assert_eq!(backend.role_lookups(), 1);
    }

    #[tokio::test]
    async fn test_same_identity_never_regresses_resolved_role() {
        let backend = MemoryBackend::new();
        backend.seed_user("lawyer@x.com", "secret1", Some(Role::Lawyer), Some("Asha"));
        let store = store_for(&backend);
        store.sign_in("lawyer@x.com", "secret1").await.unwrap();

        backend.fail_role_lookups(true);
        backend.fail_profile_lookups(true);
        store.refresh_profile().await;
        let session = backend.current_session().unwrap();
        store.converge(Some(session)).await;

        let state = store.snapshot();
        assert_eq!(state.role, RoleAssignment::Lawyer);
        assert_eq!(state.full_name.as_deref(), Some("Asha"));
    }

    #[tokio::test]
    async fn test_sign_out_in_another_tab_clears_state() {
        let backend = MemoryBackend::new();
        backend.seed_user("client@x.com", "secret1", Some(Role::Client), None);
        let store = store_for(&backend);

        let ((), ()) = tokio::join!(store.initialize(), async {
            store.wait_until_loaded().await;
            store.sign_in("client@x.com", "secret1").await.unwrap();
            backend.emit(AuthEvent::new(AuthEventKind::SignedOut, None));
            let mut rx = store.subscribe();
            rx.wait_for(|s| s.identity.is_none()).await.unwrap();
            store.teardown();
        });

        assert!(store.snapshot().identity.is_none());
    }

    #[tokio::test]
    async fn test_expired_persisted_session_is_treated_as_signed_out() {
        let backend = MemoryBackend::new();
        backend.seed_user("client@x.com", "secret1", Some(Role::Client), None);
        let mut session = backend.sign_in_with_password("client@x.com", "secret1").await.unwrap();
        session.expires_at = Utc::now().timestamp() - 10;

        let store = store_for(&backend);
        store.converge(Some(session)).await;
        let state = store.snapshot();
        assert!(state.identity.is_none());
        assert!(!state.loading);
    }

    /// Data store whose role lookup for one user blocks until released.
    #[derive(Clone)]
    struct HeldRoles {
        backend: MemoryBackend,
        held: UserId,
        release: Arc<Notify>,
    }

    impl DataStore for HeldRoles {
        async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, SessionError> {
            if user_id == self.held {
                self.release.notified().await;
            }
            self.backend.roles_for_user(user_id).await
        }

        async fn profile_for_user(&self, user_id: UserId) -> Result<Option<Profile>, SessionError> {
            self.backend.profile_for_user(user_id).await
        }

        async fn update_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<Profile, SessionError> {
            self.backend.update_profile(user_id, update).await
        }

        async fn insert_profile(&self, user_id: UserId, update: &ProfileUpdate) -> Result<Profile, SessionError> {
            self.backend.insert_profile(user_id, update).await
        }

        async fn list_profiles(&self) -> Result<Vec<Profile>, SessionError> {
            self.backend.list_profiles().await
        }

        async fn list_role_rows(&self) -> Result<Vec<RoleRow>, SessionError> {
            self.backend.list_role_rows().await
        }

        async fn count_profiles_by_email(&self, email: &str) -> Result<u64, SessionError> {
            self.backend.count_profiles_by_email(email).await
        }

        async fn count_consultations_by_email(&self, email: &str) -> Result<u64, SessionError> {
            self.backend.count_consultations_by_email(email).await
        }

        async fn insert_consultation(&self, record: &ConsultationRecord) -> Result<(), SessionError> {
            self.backend.insert_consultation(record).await
        }
    }

    #[tokio::test]
    async fn test_late_role_response_does_not_leak_into_next_account() {
        let backend = MemoryBackend::new();
        let lawyer = backend.seed_user("a@x.com", "secret1", Some(Role::Lawyer), Some("A"));
        let client = backend.seed_user("b@x.com", "secret1", Some(Role::Client), Some("B"));
        let release = Arc::new(Notify::new());
        let data = HeldRoles {
            backend: backend.clone(),
            held: lawyer,
            release: release.clone(),
        };
        let store = SessionStore::new(backend.clone(), data);

        let (first, ()) = tokio::join!(store.sign_in("a@x.com", "secret1"), async {
            let mut rx = store.subscribe();
            rx.wait_for(|s| s.user_id() == Some(lawyer)).await.unwrap();
            store.sign_out().await;
            store.sign_in("b@x.com", "secret1").await.unwrap();
            release.notify_one();
        });

        assert!(first.is_ok());
        let state = store.snapshot();
        assert_eq!(state.user_id(), Some(client));
        assert_eq!(state.role, RoleAssignment::Client);
        assert_eq!(state.full_name.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_reset_link_points_at_reset_page() {
        let backend = MemoryBackend::new();
        backend.seed_user("client@x.com", "secret1", Some(Role::Client), None);
        let store = store_for(&backend);

        store.reset_password_for_email(" client@x.com ").await.unwrap();
        assert_eq!(
            backend.last_redirect().as_deref(),
            Some("https://unseenlawyers.in/reset-password")
        );
    }

    #[tokio::test]
    async fn test_recovery_link_signs_the_user_in() {
        let backend = MemoryBackend::new();
        backend.seed_user("client@x.com", "secret1", Some(Role::Client), None);
        let session = backend.sign_in_with_password("client@x.com", "secret1").await.unwrap();
        backend.sign_out().await.unwrap();

        let store = store_for(&backend);
        store
            .recover_session(&session.access_token, &session.refresh_token)
            .await
            .unwrap();
        assert_eq!(store.snapshot().email(), Some("client@x.com"));

        store.update_password("newsecret").await.unwrap();
        store.sign_out().await;
        assert!(store.sign_in("client@x.com", "newsecret").await.is_ok());
    }
}
