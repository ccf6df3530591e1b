//! Backend selection: the hosted project when it is configured, the in-memory demo
//! backend otherwise.

use session::{
    AuthEvent, AuthSession, ConsultationRecord, DataStore, IdentityProvider, MemoryBackend,
    Profile, ProfileUpdate, Role, RoleRow, SessionError, SignUpRequest, UserId,
};
use tokio::sync::broadcast;

use crate::auth::SupabaseAuth;
use crate::db::SupabaseRest;
use crate::settings::Settings;

#[derive(Clone)]
pub enum AuthBackend {
    Supabase(SupabaseAuth),
    Memory(MemoryBackend),
}

#[derive(Clone)]
pub enum DataBackend {
    Supabase(SupabaseRest),
    Memory(MemoryBackend),
}

/// Build both halves of the backend from settings.
pub fn connect(settings: &Settings) -> (AuthBackend, DataBackend) {
    if !settings.supabase_configured() {
        tracing::warn!("SUPABASE_URL / SUPABASE_ANON_KEY not set, using the in-memory demo backend");
        let memory = demo_backend();
        return (AuthBackend::Memory(memory.clone()), DataBackend::Memory(memory));
    }

    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    let persistence = crate::auth::LocalStoragePersistence::for_project(settings.supabase_url());
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    let persistence = crate::auth::MemoryPersistence::default();

    let auth = SupabaseAuth::new(settings.supabase_url(), &settings.supabase.anon_key, persistence);
    let rest = SupabaseRest::new(settings.supabase_url(), &settings.supabase.anon_key, auth.clone());
    tracing::info!("using hosted backend at {}", settings.supabase_url());
    (AuthBackend::Supabase(auth), DataBackend::Supabase(rest))
}

/// One account per role so every dashboard can be tried offline.
pub fn demo_backend() -> MemoryBackend {
    let backend = MemoryBackend::new();
    backend.seed_user("client@demo.in", "demo123", Some(Role::Client), Some("Demo Client"));
    backend.seed_user("lawyer@demo.in", "demo123", Some(Role::Lawyer), Some("Demo Lawyer"));
    backend.seed_user("admin@demo.in", "demo123", Some(Role::Admin), Some("Demo Admin"));
    backend
}

impl IdentityProvider for AuthBackend {
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), SessionError> {
        match self {
            AuthBackend::Supabase(b) => b.sign_up(request).await,
            AuthBackend::Memory(b) => b.sign_up(request).await,
        }
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SessionError> {
        match self {
            AuthBackend::Supabase(b) => b.sign_in_with_password(email, password).await,
            AuthBackend::Memory(b) => b.sign_in_with_password(email, password).await,
        }
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        match self {
            AuthBackend::Supabase(b) => b.sign_out().await,
            AuthBackend::Memory(b) => b.sign_out().await,
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        match self {
            AuthBackend::Supabase(b) => b.subscribe(),
            AuthBackend::Memory(b) => b.subscribe(),
        }
    }

    async fn get_session(&self) -> Result<Option<AuthSession>, SessionError> {
        match self {
            AuthBackend::Supabase(b) => b.get_session().await,
            AuthBackend::Memory(b) => b.get_session().await,
        }
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthSession, SessionError> {
        match self {
            AuthBackend::Supabase(b) => b.set_session(access_token, refresh_token).await,
            AuthBackend::Memory(b) => b.set_session(access_token, refresh_token).await,
        }
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), SessionError> {
        match self {
            AuthBackend::Supabase(b) => b.reset_password_for_email(email, redirect_to).await,
            AuthBackend::Memory(b) => b.reset_password_for_email(email, redirect_to).await,
        }
    }

    async fn update_password(&self, new_password: &str) -> Result<(), SessionError> {
        match self {
            AuthBackend::Supabase(b) => b.update_password(new_password).await,
            AuthBackend::Memory(b) => b.update_password(new_password).await,
        }
    }
}

impl DataStore for DataBackend {
    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, SessionError> {
        match self {
            DataBackend::Supabase(b) => b.roles_for_user(user_id).await,
            DataBackend::Memory(b) => b.roles_for_user(user_id).await,
        }
    }

    async fn profile_for_user(&self, user_id: UserId) -> Result<Option<Profile>, SessionError> {
        match self {
            DataBackend::Supabase(b) => b.profile_for_user(user_id).await,
            DataBackend::Memory(b) => b.profile_for_user(user_id).await,
        }
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, SessionError> {
        match self {
            DataBackend::Supabase(b) => b.update_profile(user_id, update).await,
            DataBackend::Memory(b) => b.update_profile(user_id, update).await,
        }
    }

    async fn insert_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, SessionError> {
        match self {
            DataBackend::Supabase(b) => b.insert_profile(user_id, update).await,
            DataBackend::Memory(b) => b.insert_profile(user_id, update).await,
        }
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, SessionError> {
        match self {
            DataBackend::Supabase(b) => b.list_profiles().await,
            DataBackend::Memory(b) => b.list_profiles().await,
        }
    }

    async fn list_role_rows(&self) -> Result<Vec<RoleRow>, SessionError> {
        match self {
            DataBackend::Supabase(b) => b.list_role_rows().await,
            DataBackend::Memory(b) => b.list_role_rows().await,
        }
    }

    async fn count_profiles_by_email(&self, email: &str) -> Result<u64, SessionError> {
        match self {
            DataBackend::Supabase(b) => b.count_profiles_by_email(email).await,
            DataBackend::Memory(b) => b.count_profiles_by_email(email).await,
        }
    }

    async fn count_consultations_by_email(&self, email: &str) -> Result<u64, SessionError> {
        match self {
            DataBackend::Supabase(b) => b.count_consultations_by_email(email).await,
            DataBackend::Memory(b) => b.count_consultations_by_email(email).await,
        }
    }

    async fn insert_consultation(&self, record: &ConsultationRecord) -> Result<(), SessionError> {
        match self {
            DataBackend::Supabase(b) => b.insert_consultation(record).await,
            DataBackend::Memory(b) => b.insert_consultation(record).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session::{RoleAssignment, SessionStore};

    #[tokio::test]
    async fn test_unconfigured_settings_use_demo_backend() {
        let (auth, data) = connect(&Settings::default());
        assert!(matches!(auth, AuthBackend::Memory(_)));

        let store = SessionStore::new(auth, data);
        let run = store.initialize();
        let check = async {
            store.wait_until_loaded().await;
            store.sign_in("lawyer@demo.in", "demo123").await.unwrap();
            let state = store.snapshot();
            store.teardown();
            state
        };
        let ((), state) = tokio::join!(run, check);
        assert_eq!(state.role, RoleAssignment::Lawyer);
        assert_eq!(state.full_name.as_deref(), Some("Demo Lawyer"));
    }
}
