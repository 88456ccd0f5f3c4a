//! High-level session operations shared by the HTTP handlers.
//!
//! These functions work with any [`SessionRepository`] implementation.

use serde_json::Value;
use tracing::{debug, info};

use super::checksum::dataset_checksum;
use super::repository::{ErrorContext, RepositoryError, RepositoryResult, SessionRepository};
use crate::api::{
    RankRecord, ResultsView, SessionCreated, SessionId, SessionPayload, SessionView,
};
use crate::services::insight::normalize_value;
use crate::services::search::distinct_keywords;

/// Check that the repository is usable.
pub async fn health_check(repo: &dyn SessionRepository) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Store a hand-off payload.
///
/// Identical datasets map to the same session. When the payload of a reused
/// session carries an insight, the stored insight is replaced.
pub async fn store_session(
    repo: &dyn SessionRepository,
    payload: SessionPayload,
) -> RepositoryResult<SessionCreated> {
    if payload.is_empty() {
        return Err(RepositoryError::validation_with_context(
            "Session payload has no records",
            ErrorContext::new("store_session").with_entity("session"),
        ));
    }

    let checksum = dataset_checksum(&payload.raw_data)?;
    let record_count = payload.raw_data.len();

    if let Some(existing) = repo.find_by_checksum(&checksum).await? {
        debug!(session_id = %existing, "Reusing session for identical dataset");
        if payload.insight.is_some() {
            repo.update_insight(&existing, payload.insight).await?;
        }
        return Ok(SessionCreated {
            session_id: existing,
            record_count,
            reused: true,
        });
    }

    let stored = repo.store_session(&checksum, payload).await?;
    info!(
        session_id = %stored.id,
        records = record_count,
        "Stored session"
    );
    Ok(SessionCreated {
        session_id: stored.id,
        record_count,
        reused: false,
    })
}

/// Resolve the results view for a session.
///
/// A missing session, or one without records, sends the caller back to the
/// upload step.
pub async fn load_results_view(
    repo: &dyn SessionRepository,
    id: &SessionId,
) -> RepositoryResult<ResultsView> {
    let stored = match repo.get_session(id).await {
        Ok(stored) => stored,
        Err(err) if err.is_not_found() => {
            debug!(session_id = %id, "Session missing, redirecting to upload");
            return Ok(ResultsView::redirect_to_upload());
        }
        Err(err) => return Err(err),
    };

    if stored.payload.is_empty() {
        return Ok(ResultsView::redirect_to_upload());
    }

    let insight = normalize_value(&stored.payload.insight);
    let keywords = distinct_keywords(&stored.payload.raw_data);
    Ok(ResultsView::Ready(Box::new(SessionView {
        session_id: stored.id,
        records: stored.payload.raw_data,
        insight,
        keywords,
    })))
}

/// Records and raw insight of a stored session.
pub async fn get_session_data(
    repo: &dyn SessionRepository,
    id: &SessionId,
) -> RepositoryResult<(Vec<RankRecord>, Option<Value>)> {
    let stored = repo.get_session(id).await?;
    Ok((stored.payload.raw_data, stored.payload.insight))
}

/// Replace the insight attached to a session.
pub async fn attach_insight(
    repo: &dyn SessionRepository,
    id: &SessionId,
    insight: Value,
) -> RepositoryResult<()> {
    repo.update_insight(id, Some(insight)).await
}

/// Remove a session and its checksum entry.
pub async fn delete_session(repo: &dyn SessionRepository, id: &SessionId) -> RepositoryResult<()> {
    repo.delete_session(id).await?;
    info!(session_id = %id, "Deleted session");
    Ok(())
}
