//! Token responses and where the current session is kept between page loads.

use std::sync::Mutex;

use serde::Deserialize;
use session::{AuthSession, Identity};

use crate::error::ApiError;

/// Body of `/token`, and of `/signup` when confirmation is disabled.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: Identity,
}

impl TokenResponse {
    pub fn into_session(self, now: i64) -> AuthSession {
        let expires_at = self
            .expires_at
            .unwrap_or_else(|| now + self.expires_in.unwrap_or(3600));
        AuthSession {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

/// Storage for the one session a browser profile holds.
pub trait SessionPersistence {
    fn load(&self) -> Result<Option<AuthSession>, ApiError>;
    fn save(&self, session: &AuthSession) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// Process-local persistence, for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    session: Mutex<Option<AuthSession>>,
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self) -> Result<Option<AuthSession>, ApiError> {
        Ok(self
            .session
            .lock()
            .map_err(|e| ApiError::Storage(e.to_string()))?
            .clone())
    }

    fn save(&self, session: &AuthSession) -> Result<(), ApiError> {
        *self
            .session
            .lock()
            .map_err(|e| ApiError::Storage(e.to_string()))? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self
            .session
            .lock()
            .map_err(|e| ApiError::Storage(e.to_string()))? = None;
        Ok(())
    }
}

/// `window.localStorage`, shared by every tab of the origin.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub struct LocalStoragePersistence {
    key: String,
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl LocalStoragePersistence {
    /// Key derived from the project host, e.g. `sb-abc-auth-token`.
    pub fn for_project(supabase_url: &str) -> Self {
        let project = supabase_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .split('.')
            .next()
            .unwrap_or("local");
        Self {
            key: format!("sb-{project}-auth-token"),
        }
    }

    fn storage(&self) -> Result<web_sys::Storage, ApiError> {
        web_sys::window()
            .ok_or_else(|| ApiError::Storage("no window".into()))?
            .local_storage()
            .map_err(|_| ApiError::Storage("localStorage unavailable".into()))?
            .ok_or_else(|| ApiError::Storage("localStorage unavailable".into()))
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
impl SessionPersistence for LocalStoragePersistence {
    fn load(&self) -> Result<Option<AuthSession>, ApiError> {
        let raw = self
            .storage()?
            .get_item(&self.key)
            .map_err(|_| ApiError::Storage("read failed".into()))?;
        match raw {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(session) => Ok(Some(session)),
                Err(e) => {
                    tracing::warn!("discarding unreadable stored session: {}", e);
                    self.clear()?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    fn save(&self, session: &AuthSession) -> Result<(), ApiError> {
        let raw = serde_json::to_string(session)?;
        self.storage()?
            .set_item(&self.key, &raw)
            .map_err(|_| ApiError::Storage("write failed".into()))
    }

    fn clear(&self) -> Result<(), ApiError> {
        self.storage()?
            .remove_item(&self.key)
            .map_err(|_| ApiError::Storage("remove failed".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_expiry() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "r1",
            "user": {"id": "6f1c1c44-7b5e-4d8e-9d7e-1b7b3c2e2a10", "email": "a@x.com", "aud": "authenticated"}
        }"#;
        let session = serde_json::from_str::<TokenResponse>(body)
            .unwrap()
            .into_session(1_000);
        assert_eq!(session.expires_at, 4_600);
        assert_eq!(session.user.email, "a@x.com");
    }

    #[test]
    fn test_memory_persistence() {
        let store = MemoryPersistence::default();
        assert!(store.load().unwrap().is_none());
        let session = AuthSession {
            access_token: "a".into(),
            refresh_token: "r".into(),
            expires_at: 10,
            user: Identity {
                id: uuid::Uuid::nil(),
                email: String::new(),
            },
        };
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
