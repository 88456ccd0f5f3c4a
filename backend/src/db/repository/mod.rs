//! Repository trait for session hand-off storage.

pub mod error;

use async_trait::async_trait;
use serde_json::Value;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use super::models::StoredSession;
use crate::api::{SessionId, SessionPayload};

/// Storage of session hand-off payloads.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Check that the storage backend is usable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a payload under a fresh identifier.
    ///
    /// # Arguments
    /// * `checksum` - Identity of the dataset in `payload`
    /// * `payload` - Records and optional raw insight
    async fn store_session(
        &self,
        checksum: &str,
        payload: SessionPayload,
    ) -> RepositoryResult<StoredSession>;

    /// Identifier of the session holding the dataset with `checksum`, if any.
    async fn find_by_checksum(&self, checksum: &str) -> RepositoryResult<Option<SessionId>>;

    /// Fetch a stored session.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no session has this identifier
    async fn get_session(&self, id: &SessionId) -> RepositoryResult<StoredSession>;

    /// Replace the raw insight of a stored session.
    async fn update_insight(&self, id: &SessionId, insight: Option<Value>)
        -> RepositoryResult<()>;

    /// Remove a session. Removing an unknown session is a `NotFound` error.
    async fn delete_session(&self, id: &SessionId) -> RepositoryResult<()>;

    /// Number of stored sessions.
    async fn session_count(&self) -> RepositoryResult<usize>;
}
