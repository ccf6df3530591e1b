use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::SessionError;
use crate::models::{
    AuthEvent, AuthEventKind, AuthSession, ConsultationRecord, Identity, Profile, ProfileUpdate,
    Role, RoleRow, SignUpRequest, UserId, UserMetadata,
};
use crate::provider::{DataStore, IdentityProvider};

const SESSION_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    email: String,
    password: String,
    metadata: Option<UserMetadata>,
}

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<String, Account>,
    tokens: HashMap<String, UserId>,
    current: Option<AuthSession>,
    roles: Vec<RoleRow>,
    profiles: Vec<Profile>,
    consultations: Vec<ConsultationRecord>,
    last_redirect: Option<String>,
    fail_roles: bool,
    fail_profiles: bool,
    fail_consultations: bool,
    fail_session_reads: bool,
}

/// In-memory identity provider and data store for tests and the offline demo.
///
/// Accounts can sign in before their email is confirmed; role and profile rows only
/// appear on [`confirm_email`](MemoryBackend::confirm_email), the way the hosted
/// backend materialises them.
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    events: broadcast::Sender<AuthEvent>,
    role_lookups: Arc<AtomicUsize>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            state: Arc::new(Mutex::new(State::default())),
            events,
            role_lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a confirmed account with optional role and profile name.
    pub fn seed_user(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
        full_name: Option<&str>,
    ) -> UserId {
        let id = Uuid::new_v4();
        let mut state = self.lock();
        state.accounts.insert(
            email.to_lowercase(),
            Account {
                id,
                email: email.to_lowercase(),
                password: password.to_string(),
                metadata: None,
            },
        );
        if let Some(role) = role {
            state.roles.push(RoleRow { user_id: id, role });
        }
        state.profiles.push(Profile {
            id: Some(Uuid::new_v4()),
            user_id: id,
            email: Some(email.to_lowercase()),
            full_name: full_name.map(str::to_string),
            ..Default::default()
        });
        id
    }

    pub fn add_role_row(&self, user_id: UserId, role: Role) {
        self.lock().roles.push(RoleRow { user_id, role });
    }

    /// Materialise the role and profile rows recorded at sign-up.
    pub fn confirm_email(&self, email: &str) {
        let mut state = self.lock();
        let Some(account) = state.accounts.get_mut(&email.to_lowercase()) else {
            return;
        };
        let Some(metadata) = account.metadata.take() else {
            return;
        };
        let (id, email) = (account.id, account.email.clone());
        state.roles.push(RoleRow {
            user_id: id,
            role: metadata.role,
        });
        state.profiles.push(Profile {
            id: Some(Uuid::new_v4()),
            user_id: id,
            email: Some(email),
            full_name: Some(metadata.full_name),
            phone: metadata.phone,
            ..Default::default()
        });
    }

    /// Broadcast an event as if another tab changed the session.
    pub fn emit(&self, event: AuthEvent) {
        let _ = self.events.send(event);
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.lock().current.clone()
    }

    pub fn consultations(&self) -> Vec<ConsultationRecord> {
        self.lock().consultations.clone()
    }

    /// Redirect URL passed with the last sign-up or reset request.
    pub fn last_redirect(&self) -> Option<String> {
        self.lock().last_redirect.clone()
    }

    pub fn role_lookups(&self) -> usize {
        self.role_lookups.load(Ordering::SeqCst)
    }

    pub fn fail_role_lookups(&self, fail: bool) {
        self.lock().fail_roles = fail;
    }

    pub fn fail_profile_lookups(&self, fail: bool) {
        self.lock().fail_profiles = fail;
    }

    pub fn fail_consultation_lookups(&self, fail: bool) {
        self.lock().fail_consultations = fail;
    }

    /// Make reads of the persisted session fail, as an unavailable storage would.
    pub fn fail_session_reads(&self, fail: bool) {
        self.lock().fail_session_reads = fail;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn issue(state: &mut State, account: &Account) -> AuthSession {
        let serial = state.tokens.len();
        let access_token = format!("access-{}-{}", account.id, serial);
        let refresh_token = format!("refresh-{}-{}", account.id, serial);
        state.tokens.insert(access_token.clone(), account.id);
        state.tokens.insert(refresh_token.clone(), account.id);
        let session = AuthSession {
            access_token,
            refresh_token,
            expires_at: Utc::now().timestamp() + SESSION_TTL_SECS,
            user: Identity {
                id: account.id,
                email: account.email.clone(),
            },
        };
        state.current = Some(session.clone());
        session
    }
}

impl IdentityProvider for MemoryBackend {
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), SessionError> {
        let email = request.email.to_lowercase();
        let mut state = self.lock();
        if state.accounts.contains_key(&email) {
            return Err(SessionError::provider("User already registered"));
        }
        if request.password.len() < 6 {
            return Err(SessionError::provider(
                "Password should be at least 6 characters.",
            ));
        }
        state.accounts.insert(
            email.clone(),
            Account {
                id: Uuid::new_v4(),
                email,
                password: request.password,
                metadata: Some(request.metadata),
            },
        );
        state.last_redirect = request.redirect_to;
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SessionError> {
        let session = {
            let mut state = self.lock();
            let account = state
                .accounts
                .get(&email.to_lowercase())
                .filter(|account| account.password == password)
                .cloned()
                .ok_or_else(|| SessionError::provider("Invalid login credentials"))?;
            Self::issue(&mut state, &account)
        };
        self.emit(AuthEvent::new(AuthEventKind::SignedIn, Some(session.clone())));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        let previous = self.lock().current.take();
        if previous.is_some() {
            self.emit(AuthEvent::new(AuthEventKind::SignedOut, None));
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }

    async fn get_session(&self) -> Result<Option<AuthSession>, SessionError> {
        let state = self.lock();
        if state.fail_session_reads {
            return Err(SessionError::provider("session storage unavailable"));
        }
        Ok(state.current.clone())
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthSession, SessionError> {
        let session = {
            let mut state = self.lock();
            let user_id = state
                .tokens
                .get(access_token)
                .filter(|id| state.tokens.get(refresh_token) == Some(id))
                .copied()
                .ok_or_else(|| SessionError::provider("Invalid Refresh Token"))?;
            let account = state
                .accounts
                .values()
                .find(|account| account.id == user_id)
                .cloned()
                .ok_or_else(|| SessionError::provider("User not found"))?;
            Self::issue(&mut state, &account)
        };
        self.emit(AuthEvent::new(
            AuthEventKind::PasswordRecovery,
            Some(session.clone()),
        ));
        Ok(session)
    }

    async fn reset_password_for_email(
        &self,
        _email: &str,
        redirect_to: &str,
    ) -> Result<(), SessionError> {
        self.lock().last_redirect = Some(redirect_to.to_string());
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<(), SessionError> {
        let session = {
            let mut state = self.lock();
            let user_id = state
                .current
                .as_ref()
                .map(|session| session.user.id)
                .ok_or_else(|| SessionError::provider("Auth session missing!"))?;
            if let Some(account) = state.accounts.values_mut().find(|a| a.id == user_id) {
                account.password = new_password.to_string();
            }
            state.current.clone()
        };
        self.emit(AuthEvent::new(AuthEventKind::UserUpdated, session));
        Ok(())
    }
}

impl DataStore for MemoryBackend {
    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, SessionError> {
        self.role_lookups.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        if state.fail_roles {
            return Err(SessionError::store("permission denied for table user_roles"));
        }
        Ok(state
            .roles
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| row.role)
            .collect())
    }

    async fn profile_for_user(&self, user_id: UserId) -> Result<Option<Profile>, SessionError> {
        let state = self.lock();
        if state.fail_profiles {
            return Err(SessionError::store("permission denied for table profiles"));
        }
        Ok(state
            .profiles
            .iter()
            .find(|profile| profile.user_id == user_id)
            .cloned())
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, SessionError> {
        let mut state = self.lock();
        let profile = state
            .profiles
            .iter_mut()
            .find(|profile| profile.user_id == user_id)
            .ok_or_else(|| SessionError::store("JSON object requested, multiple (or no) rows returned"))?;
        profile.apply(update);
        Ok(profile.clone())
    }

    async fn insert_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, SessionError> {
        let mut state = self.lock();
        let mut profile = Profile {
            id: Some(Uuid::new_v4()),
            user_id,
            ..Default::default()
        };
        profile.apply(update);
        state.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, SessionError> {
        let state = self.lock();
        if state.fail_profiles {
            return Err(SessionError::store("permission denied for table profiles"));
        }
        Ok(state.profiles.clone())
    }

    async fn list_role_rows(&self) -> Result<Vec<RoleRow>, SessionError> {
        let state = self.lock();
        if state.fail_roles {
            return Err(SessionError::store("permission denied for table user_roles"));
        }
        Ok(state.roles.clone())
    }

    async fn count_profiles_by_email(&self, email: &str) -> Result<u64, SessionError> {
        let state = self.lock();
        if state.fail_profiles {
            return Err(SessionError::store("permission denied for table profiles"));
        }
        Ok(state
            .profiles
            .iter()
            .filter(|profile| profile.email.as_deref() == Some(email))
            .count() as u64)
    }

    async fn count_consultations_by_email(&self, email: &str) -> Result<u64, SessionError> {
        let state = self.lock();
        if state.fail_consultations {
            return Err(SessionError::store("relation \"consultation_requests\" does not exist"));
        }
        Ok(state
            .consultations
            .iter()
            .filter(|record| record.request.email == email)
            .count() as u64)
    }

    async fn insert_consultation(&self, record: &ConsultationRecord) -> Result<(), SessionError> {
        let mut state = self.lock();
        if state.fail_consultations {
            return Err(SessionError::store("relation \"consultation_requests\" does not exist"));
        }
        state.consultations.push(record.clone());
        Ok(())
    }
}
