//! Table access through the hosted REST gateway (`<project>/rest/v1`).
//!
//! Requests carry the signed-in user's access token when there is one so row-level
//! security applies; anonymous requests use the public key.

use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use session::{
    ConsultationRecord, DataStore, Profile, ProfileUpdate, Role, RoleRow, SessionError, UserId,
};

use crate::auth::SupabaseAuth;
use crate::error::ApiError;

#[derive(Clone)]
pub struct SupabaseRest {
    http: Client,
    base_url: String,
    anon_key: String,
    auth: SupabaseAuth,
}

#[derive(Deserialize)]
struct RoleOnly {
    role: Role,
}

#[derive(Serialize)]
struct NewProfile<'a> {
    user_id: UserId,
    #[serde(flatten)]
    update: &'a ProfileUpdate,
}

impl SupabaseRest {
    pub fn new(supabase_url: &str, anon_key: &str, auth: SupabaseAuth) -> Self {
        Self {
            http: Client::new(),
            base_url: format!("{}/rest/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
            auth,
        }
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        let bearer = self
            .auth
            .access_token()
            .unwrap_or_else(|| self.anon_key.clone());
        self.http
            .request(method, format!("{}/{}", self.base_url, table))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_body(status.as_u16(), &body))
    }

    async fn rows<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> Result<Vec<T>, ApiError> {
        Ok(self.send(request).await?.json().await?)
    }

    /// Exact row count for `column = value` without fetching rows.
    async fn count(&self, table: &str, column: &str, value: &str) -> Result<u64, ApiError> {
        let filter = format!("eq.{value}");
        let response = self
            .send(
                self.request(Method::HEAD, table)
                    .query(&[("select", "*"), (column, filter.as_str())])
                    .header("Prefer", "count=exact"),
            )
            .await?;
        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| ApiError::Status {
                status: response.status().as_u16(),
                message: "missing row count in response".into(),
            })
    }
}

/// Total from a `Content-Range` header such as `0-4/5` or `*/0`.
pub fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

impl DataStore for SupabaseRest {
    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<Role>, SessionError> {
        let rows: Vec<RoleOnly> = self
            .rows(
                self.request(Method::GET, "user_roles")
                    .query(&[("select", "role".to_string()), ("user_id", format!("eq.{user_id}"))]),
            )
            .await
            .map_err(ApiError::into_store)?;
        Ok(rows.into_iter().map(|row| row.role).collect())
    }

    async fn profile_for_user(&self, user_id: UserId) -> Result<Option<Profile>, SessionError> {
        let rows: Vec<Profile> = self
            .rows(
                self.request(Method::GET, "profiles")
                    .query(&[("select", "*".to_string()), ("user_id", format!("eq.{user_id}"))]),
            )
            .await
            .map_err(ApiError::into_store)?;
        Ok(rows.into_iter().next())
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, SessionError> {
        let rows: Vec<Profile> = self
            .rows(
                self.request(Method::PATCH, "profiles")
                    .query(&[("user_id", format!("eq.{user_id}"))])
                    .header("Prefer", "return=representation")
                    .json(update),
            )
            .await
            .map_err(ApiError::into_store)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SessionError::store("profile not found"))
    }

    async fn insert_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Profile, SessionError> {
        let rows: Vec<Profile> = self
            .rows(
                self.request(Method::POST, "profiles")
                    .header("Prefer", "return=representation")
                    .json(&NewProfile { user_id, update }),
            )
            .await
            .map_err(ApiError::into_store)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| SessionError::store("profile insert returned no row"))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, SessionError> {
        self.rows(
            self.request(Method::GET, "profiles")
                .query(&[("select", "*"), ("order", "created_at.desc")]),
        )
        .await
        .map_err(ApiError::into_store)
    }

    async fn list_role_rows(&self) -> Result<Vec<RoleRow>, SessionError> {
        self.rows(
            self.request(Method::GET, "user_roles")
                .query(&[("select", "user_id,role")]),
        )
        .await
        .map_err(ApiError::into_store)
    }

    async fn count_profiles_by_email(&self, email: &str) -> Result<u64, SessionError> {
        self.count("profiles", "email", email)
            .await
            .map_err(ApiError::into_store)
    }

    async fn count_consultations_by_email(&self, email: &str) -> Result<u64, SessionError> {
        self.count("consultation_requests", "email", email)
            .await
            .map_err(ApiError::into_store)
    }

    async fn insert_consultation(&self, record: &ConsultationRecord) -> Result<(), SessionError> {
        self.send(
            self.request(Method::POST, "consultation_requests")
                .header("Prefer", "return=minimal")
                .json(record),
        )
        .await
        .map_err(ApiError::into_store)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_range_total() {
        assert_eq!(parse_content_range_total("0-4/5"), Some(5));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-4/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn test_new_profile_body_is_flat() {
        let update = ProfileUpdate {
            full_name: "Asha".into(),
            enrollment_number: "E1".into(),
            law_degree_university: "U".into(),
            ..Default::default()
        };
        let body = serde_json::to_value(NewProfile {
            user_id: uuid::Uuid::nil(),
            update: &update,
        })
        .unwrap();
        assert_eq!(body["full_name"], "Asha");
        assert_eq!(body["user_id"], "00000000-0000-0000-0000-000000000000");
    }
}
