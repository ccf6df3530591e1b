use thiserror::Error;

use crate::models::UserId;

/// Errors surfaced by the session layer.
///
/// `Provider` and `Store` carry the backend's human-readable message unchanged so the UI
/// can show it verbatim.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("{0}")]
    Provider(String),

    #[error("{0}")]
    Store(String),

    #[error("user {user_id} has {rows} role rows, expected at most one")]
    AmbiguousRole { user_id: UserId, rows: usize },

    #[error("{0}")]
    Validation(String),

    #[error("Payment failed: {0}")]
    Payment(String),
}

impl SessionError {
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
