//! # Session State
//!
//! The logged-in account, shared by every command that acts for a user.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};

/// The logged-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub uid: String,
    pub email: String,
}

/// Current session, if any.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the session, returning the one it displaced.
    pub async fn set(&self, session: Session) -> Option<Session> {
        self.current.write().await.replace(session)
    }

    /// Clears the session, returning the one that was active.
    pub async fn clear(&self) -> Option<Session> {
        self.current.write().await.take()
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// The current session, or `NotLoggedIn`.
    pub async fn require(&self) -> ApiResult<Session> {
        self.current().await.ok_or_else(ApiError::not_logged_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_session_lifecycle() {
        let state = SessionState::new();
        assert_eq!(
            state.require().await.unwrap_err().code,
            ErrorCode::NotLoggedIn
        );

        let session = Session {
            uid: "uid-1".into(),
            email: "a@b.co".into(),
        };
        state.set(session.clone()).await;
        assert_eq!(state.require().await.unwrap(), session);

        assert_eq!(state.clear().await, Some(session));
        assert_eq!(state.current().await, None);
    }
}
