use crate::error::ApiError;
use crate::models::{Session, SessionId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for participant session storage
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store or refresh a session, returning the current record
    async fn upsert(&self, session_id: SessionId) -> Result<Session, ApiError>;

    /// Find a session by participant identifier
    async fn find(&self, session_id: &SessionId) -> Result<Option<Session>, ApiError>;

    /// Bump the edit counter for a participant, creating the record if needed
    async fn record_edit(&self, session_id: SessionId) -> Result<Session, ApiError>;
}

/// In-memory session storage
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn upsert(&self, session_id: SessionId) -> Result<Session, ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.clone())
            .or_insert_with(|| Session::new(session_id));
        session.last_seen = chrono::Utc::now();
        Ok(session.clone())
    }

    async fn find(&self, session_id: &SessionId) -> Result<Option<Session>, ApiError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn record_edit(&self, session_id: SessionId) -> Result<Session, ApiError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(session_id.clone())
            .or_insert_with(|| Session::new(session_id));
        session.edit_count += 1;
        session.last_seen = chrono::Utc::now();
        Ok(session.clone())
    }
}
