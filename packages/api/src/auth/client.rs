//! # Hosted identity provider client
//!
//! [`SupabaseAuth`] speaks the GoTrue REST API under `<project>/auth/v1` and implements
//! [`IdentityProvider`]. The current session lives in a [`SessionPersistence`]; every
//! change to it is announced on a broadcast channel so the session store can converge.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | sign up | `POST /signup?redirect_to=...` with the role metadata under `data` |
//! | sign in | `POST /token?grant_type=password` |
//! | refresh | `POST /token?grant_type=refresh_token` |
//! | sign out | `POST /logout` with the user's bearer token |
//! | reset link | `POST /recover?redirect_to=...` |
//! | current user | `GET /user` |
//! | new password | `PUT /user` |

use std::sync::Arc;

use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use session::{
    AuthEvent, AuthEventKind, AuthSession, Identity, IdentityProvider, SessionError,
    SignUpRequest,
};
use tokio::sync::broadcast;

use super::session::{SessionPersistence, TokenResponse};
use crate::error::ApiError;

/// Sessions this close to expiry are refreshed before being handed out.
const EXPIRY_MARGIN_SECS: i64 = 10;

struct Inner {
    http: Client,
    base_url: String,
    anon_key: String,
    persistence: Box<dyn SessionPersistence + Send + Sync>,
    events: broadcast::Sender<AuthEvent>,
}

#[derive(Clone)]
pub struct SupabaseAuth {
    inner: Arc<Inner>,
}

impl SupabaseAuth {
    pub fn new(
        supabase_url: &str,
        anon_key: &str,
        persistence: impl SessionPersistence + Send + Sync + 'static,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            inner: Arc::new(Inner {
                http: Client::new(),
                base_url: format!("{}/auth/v1", supabase_url.trim_end_matches('/')),
                anon_key: anon_key.to_string(),
                persistence: Box::new(persistence),
                events,
            }),
        }
    }

    /// Access token of the stored session, used by the REST client for row-level
    /// security. Does not refresh.
    pub fn access_token(&self) -> Option<String> {
        self.stored().map(|session| session.access_token)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn stored(&self) -> Option<AuthSession> {
        self.inner.persistence.load().unwrap_or_else(|e| {
            tracing::warn!("could not read stored session: {}", e);
            None
        })
    }

    fn store(&self, session: &AuthSession) {
        if let Err(e) = self.inner.persistence.save(session) {
            tracing::warn!("could not persist session: {}", e);
        }
    }

    fn forget(&self) {
        if let Err(e) = self.inner.persistence.clear() {
            tracing::warn!("could not clear stored session: {}", e);
        }
    }

    fn emit(&self, kind: AuthEventKind, session: Option<AuthSession>) {
        // No receivers is fine.
        let _ = self.inner.events.send(AuthEvent::new(kind, session));
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .header("apikey", &self.inner.anon_key)
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), &body))
    }

    async fn token(&self, grant_type: &str, body: serde_json::Value) -> Result<AuthSession, ApiError> {
        let response = self
            .send(
                self.inner
                    .http
                    .post(self.url("/token"))
                    .query(&[("grant_type", grant_type)])
                    .json(&body),
            )
            .await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.into_session(Utc::now().timestamp()))
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, ApiError> {
        self.token("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }
}

impl IdentityProvider for SupabaseAuth {
    async fn sign_up(&self, request: SignUpRequest) -> Result<(), SessionError> {
        let mut builder = self.inner.http.post(self.url("/signup")).json(&json!({
            "email": request.email,
            "password": request.password,
            "data": request.metadata,
        }));
        if let Some(redirect_to) = &request.redirect_to {
            builder = builder.query(&[("redirect_to", redirect_to)]);
        }
        let response = self.send(builder).await.map_err(ApiError::into_provider)?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ApiError::from(e).into_provider())?;

        // With confirmation disabled the backend signs the user in right away.
        if let Ok(token) = serde_json::from_value::<TokenResponse>(body) {
            let session = token.into_session(Utc::now().timestamp());
            self.store(&session);
            self.emit(AuthEventKind::SignedIn, Some(session));
        }
        Ok(())
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SessionError> {
        let session = self
            .token("password", json!({ "email": email, "password": password }))
            .await
            .map_err(ApiError::into_provider)?;
        self.store(&session);
        self.emit(AuthEventKind::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), SessionError> {
        let Some(stored) = self.stored() else {
            return Ok(());
        };
        let result = self
            .send(
                self.inner
                    .http
                    .post(self.url("/logout"))
                    .bearer_auth(&stored.access_token),
            )
            .await;

        // The local session goes regardless; an already-revoked token is not an error.
        self.forget();
        self.emit(AuthEventKind::SignedOut, None);
        match result {
            Ok(_) | Err(ApiError::Status { status: 401 | 403 | 404, .. }) => Ok(()),
            Err(e) => Err(e.into_provider()),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.inner.events.subscribe()
    }

    async fn get_session(&self) -> Result<Option<AuthSession>, SessionError> {
        let Some(stored) = self.stored() else {
            return Ok(None);
        };
        if stored.is_live(Utc::now().timestamp() + EXPIRY_MARGIN_SECS) {
            return Ok(Some(stored));
        }

        match self.refresh(&stored.refresh_token).await {
            Ok(session) => {
                self.store(&session);
                self.emit(AuthEventKind::TokenRefreshed, Some(session.clone()));
                Ok(Some(session))
            }
            Err(ApiError::Status { message, .. }) => {
                tracing::info!("stored session rejected: {}", message);
                self.forget();
                Ok(None)
            }
            Err(e) => Err(e.into_provider()),
        }
    }

    async fn set_session(
        &self,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<AuthSession, SessionError> {
        let session = if refresh_token.is_empty() {
            let response = self
                .send(self.inner.http.get(self.url("/user")).bearer_auth(access_token))
                .await
                .map_err(ApiError::into_provider)?;
            let user: Identity = response
                .json()
                .await
                .map_err(|e| ApiError::from(e).into_provider())?;
            AuthSession {
                access_token: access_token.to_string(),
                refresh_token: String::new(),
                expires_at: Utc::now().timestamp() + 3600,
                user,
            }
        } else {
            self.refresh(refresh_token)
                .await
                .map_err(ApiError::into_provider)?
        };
        self.store(&session);
        self.emit(AuthEventKind::PasswordRecovery, Some(session.clone()));
        Ok(session)
    }

    async fn reset_password_for_email(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), SessionError> {
        self.send(
            self.inner
                .http
                .post(self.url("/recover"))
                .query(&[("redirect_to", redirect_to)])
                .json(&json!({ "email": email })),
        )
        .await
        .map_err(ApiError::into_provider)?;
        Ok(())
    }

    async fn update_password(&self, new_password: &str) -> Result<(), SessionError> {
        let stored = self
            .get_session()
            .await?
            .ok_or_else(|| SessionError::provider("Auth session missing!"))?;
        self.send(
            self.inner
                .http
                .put(self.url("/user"))
                .bearer_auth(&stored.access_token)
                .json(&json!({ "password": new_password })),
        )
        .await
        .map_err(ApiError::into_provider)?;
        self.emit(AuthEventKind::UserUpdated, Some(stored));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryPersistence;

    fn session(expires_at: i64) -> AuthSession {
        AuthSession {
            access_token: "jwt".into(),
            refresh_token: "r".into(),
            expires_at,
            user: Identity {
                id: uuid::Uuid::new_v4(),
                email: "a@x.com".into(),
            },
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let auth = SupabaseAuth::new("https://abc.supabase.co/", "anon", MemoryPersistence::default());
        assert_eq!(auth.url("/token"), "https://abc.supabase.co/auth/v1/token");
    }

    #[tokio::test]
    async fn test_live_stored_session_is_returned_without_network() {
        let persistence = MemoryPersistence::default();
        let live = session(Utc::now().timestamp() + 600);
        persistence.save(&live).unwrap();
        let auth = SupabaseAuth::new("http://127.0.0.1:9", "anon", persistence);

        assert_eq!(auth.get_session().await.unwrap(), Some(live));
        assert_eq!(auth.access_token().as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_a_no_op() {
        let auth = SupabaseAuth::new("http://127.0.0.1:9", "anon", MemoryPersistence::default());
        let mut events = auth.subscribe();
        auth.sign_out().await.unwrap();
        assert!(events.try_recv().is_err());
    }
}
