//! In-memory session repository.
//!
//! Sessions are dropped once they go unused for longer than the configured
//! time-to-live, or when the store is full and a new session arrives (least
//! recently updated first). Used by the server and by tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use crate::api::{SessionId, SessionPayload};
use crate::db::models::StoredSession;
use crate::db::repository::{
    ErrorContext, RepositoryError, RepositoryResult, SessionRepository,
};

#[derive(Default)]
struct LocalData {
    sessions: HashMap<SessionId, StoredSession>,
    by_checksum: HashMap<String, SessionId>,
}

impl LocalData {
    fn remove(&mut self, id: &SessionId) -> Option<StoredSession> {
        let removed = self.sessions.remove(id)?;
        if self.by_checksum.get(&removed.checksum) == Some(id) {
            self.by_checksum.remove(&removed.checksum);
        }
        Some(removed)
    }

    fn least_recently_updated(&self) -> Option<SessionId> {
        self.sessions
            .values()
            .min_by_key(|session| session.updated_at)
            .map(|session| session.id.clone())
    }
}

/// Retention bounds of a [`LocalRepository`]. `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_sessions: Option<usize>,
    pub ttl: Option<Duration>,
}

/// Session store backed by a `HashMap` behind a `RwLock`.
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
    limits: SessionLimits,
}

impl LocalRepository {
    /// Unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: SessionLimits) -> Self {
        Self {
            data: Arc::default(),
            limits,
        }
    }

    fn is_expired(&self, session: &StoredSession, now: DateTime<Utc>) -> bool {
        match self.limits.ttl {
            Some(ttl) => now - session.updated_at > ttl,
            None => false,
        }
    }

    /// Drop expired sessions, then the least recently updated ones until
    /// there is room for one more.
    fn make_room(&self, data: &mut LocalData, now: DateTime<Utc>) {
        let expired: Vec<SessionId> = data
            .sessions
            .values()
            .filter(|session| self.is_expired(session, now))
            .map(|session| session.id.clone())
            .collect();
        for id in &expired {
            data.remove(id);
            debug!(session_id = %id, "Evicted expired session");
        }

        if let Some(max) = self.limits.max_sessions {
            while data.sessions.len() >= max.max(1) {
                let Some(oldest) = data.least_recently_updated() else {
                    break;
                };
                data.remove(&oldest);
                debug!(session_id = %oldest, "Evicted session to stay within capacity");
            }
        }
    }

    fn missing(operation: &str, id: &SessionId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Session {} not found", id),
            ErrorContext::new(operation)
                .with_entity("session")
                .with_entity_id(id),
        )
    }
}

#[async_trait]
impl SessionRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }

    async fn store_session(
        &self,
        checksum: &str,
        payload: SessionPayload,
    ) -> RepositoryResult<StoredSession> {
        let stored = StoredSession::new(SessionId::generate(), checksum, payload);
        let mut data = self.data.write();
        self.make_room(&mut data, stored.created_at);
        data.by_checksum
            .insert(checksum.to_string(), stored.id.clone());
        data.sessions.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn find_by_checksum(&self, checksum: &str) -> RepositoryResult<Option<SessionId>> {
        let data = self.data.read();
        let now = Utc::now();
        Ok(data
            .by_checksum
            .get(checksum)
            .filter(|id| {
                data.sessions
                    .get(*id)
                    .is_some_and(|session| !self.is_expired(session, now))
            })
            .cloned())
    }

    async fn get_session(&self, id: &SessionId) -> RepositoryResult<StoredSession> {
        let now = Utc::now();
        self.data
            .read()
            .sessions
            .get(id)
            .filter(|session| !self.is_expired(session, now))
            .cloned()
            .ok_or_else(|| Self::missing("get_session", id))
    }

    async fn update_insight(
        &self,
        id: &SessionId,
        insight: Option<Value>,
    ) -> RepositoryResult<()> {
        let mut data = self.data.write();
        let session = data
            .sessions
            .get_mut(id)
            .ok_or_else(|| Self::missing("update_insight", id))?;
        session.payload.insight = insight;
        session.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_session(&self, id: &SessionId) -> RepositoryResult<()> {
        self.data
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| Self::missing("delete_session", id))
    }

    async fn session_count(&self) -> RepositoryResult<usize> {
        let now = Utc::now();
        Ok(self
            .data
            .read()
            .sessions
            .values()
            .filter(|session| !self.is_expired(session, now))
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_store_and_get_session() {
        let repo = LocalRepository::new();
        let stored = repo
            .store_session("abc", SessionPayload::default())
            .await
            .unwrap();

        let fetched = repo.get_session(&stored.id).await.unwrap();
        assert_eq!(fetched.checksum, "abc");
        assert_eq!(
            repo.find_by_checksum("abc").await.unwrap(),
            Some(stored.id.clone())
        );
        assert_eq!(repo.session_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_insight_replaces_payload() {
        let repo = LocalRepository::new();
        let stored = repo
            .store_session("abc", SessionPayload::default())
            .await
            .unwrap();

        repo.update_insight(&stored.id, Some(json!({ "overall_health": "ok" })))
            .await
            .unwrap();
        let fetched = repo.get_session(&stored.id).await.unwrap();
        assert_eq!(
            fetched.payload.insight,
            Some(json!({ "overall_health": "ok" }))
        );
        assert!(fetched.updated_at >= fetched.created_at);
    }

    #[tokio::test]
    async fn test_delete_clears_checksum_index() {
        let repo = LocalRepository::new();
        let stored = repo
            .store_session("abc", SessionPayload::default())
            .await
            .unwrap();

        repo.delete_session(&stored.id).await.unwrap();
        assert!(repo.find_by_checksum("abc").await.unwrap().is_none());

        let err = repo.delete_session(&stored.id).await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().operation.as_deref(), Some("delete_session"));
    }

    #[tokio::test]
    async fn test_full_store_evicts_least_recently_updated() {
        let repo = LocalRepository::with_limits(SessionLimits {
            max_sessions: Some(2),
            ttl: None,
        });
        let pause = std::time::Duration::from_millis(2);
        let first = repo.store_session("a", SessionPayload::default()).await.unwrap();
        tokio::time::sleep(pause).await;
        let second = repo.store_session("b", SessionPayload::default()).await.unwrap();
        tokio::time::sleep(pause).await;
        repo.update_insight(&first.id, Some(json!({}))).await.unwrap();

        let third = repo.store_session("c", SessionPayload::default()).await.unwrap();
        assert_eq!(repo.session_count().await.unwrap(), 2);
        assert!(repo.get_session(&second.id).await.unwrap_err().is_not_found());
        assert!(repo.find_by_checksum("b").await.unwrap().is_none());
        assert!(repo.get_session(&first.id).await.is_ok());
        assert!(repo.get_session(&third.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_hidden_and_evicted() {
        let repo = LocalRepository::with_limits(SessionLimits {
            max_sessions: None,
            ttl: Some(Duration::milliseconds(20)),
        });
        let old = repo.store_session("a", SessionPayload::default()).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(40)).await;

        assert!(repo.get_session(&old.id).await.unwrap_err().is_not_found());
        assert!(repo.find_by_checksum("a").await.unwrap().is_none());
        assert_eq!(repo.session_count().await.unwrap(), 0);

        repo.store_session("b", SessionPayload::default()).await.unwrap();
        assert_eq!(repo.data.read().sessions.len(), 1);
        assert!(!repo.data.read().by_checksum.contains_key("a"));
    }

    #[tokio::test]
    async fn test_missing_session_is_not_found() {
        let repo = LocalRepository::new();
        let err = repo
            .get_session(&SessionId::new("nope"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.context().entity_id.as_deref(), Some("nope"));
    }
}
