use serde::Deserialize;
use session::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, with the message the backend put in the body.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("session storage: {0}")]
    Storage(String),
}

impl ApiError {
    /// Build a status error from a response body. Auth and REST endpoints each use
    /// their own field for the human-readable message.
    pub fn from_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Body {
            error_description: Option<String>,
            msg: Option<String>,
            message: Option<String>,
            error: Option<String>,
        }

        let message = serde_json::from_str::<Body>(body)
            .ok()
            .and_then(|b| b.error_description.or(b.msg).or(b.message).or(b.error))
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));
        ApiError::Status { status, message }
    }

    pub fn into_provider(self) -> SessionError {
        SessionError::Provider(self.to_string())
    }

    pub fn into_store(self) -> SessionError {
        SessionError::Store(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_field_precedence() {
        let err = ApiError::from_body(
            400,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(err.to_string(), "Invalid login credentials");

        let err = ApiError::from_body(422, r#"{"code":422,"msg":"User already registered"}"#);
        assert_eq!(err.to_string(), "User already registered");

        let err = ApiError::from_body(
            401,
            r#"{"code":"42501","message":"permission denied for table user_roles"}"#,
        );
        assert_eq!(err.to_string(), "permission denied for table user_roles");
    }

    #[test]
    fn test_unparseable_body_falls_back_to_status() {
        let err = ApiError::from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(err.to_string(), "request failed with status 502");
        assert!(matches!(
            ApiError::from_body(500, "").into_store(),
            SessionError::Store(_)
        ));
    }
}
