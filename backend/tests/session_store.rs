//! Session store behaviour through the service layer.

mod support;

use std::sync::Arc;

use rank_insight::api::{DeviceClass, ResultsView, SessionId, SessionPayload};
use rank_insight::db::repositories::{LocalRepository, SessionLimits};
use rank_insight::db::repository::SessionRepository;
use rank_insight::db::{dataset_checksum, services};
use serde_json::json;

use support::{record, sample_dataset};

#[tokio::test]
async fn test_different_datasets_get_different_sessions() {
    let repo = LocalRepository::new();
    let first = services::store_session(&repo, SessionPayload::new(sample_dataset(), None))
        .await
        .unwrap();
    let other = vec![record("모자", DeviceClass::Mobile, "Z", &[(4, 1.0)])];
    let second = services::store_session(&repo, SessionPayload::new(other, None))
        .await
        .unwrap();

    assert_ne!(first.session_id, second.session_id);
    assert_eq!(repo.session_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_checksum_index_matches_dataset() {
    let repo = LocalRepository::new();
    let records = sample_dataset();
    let created = services::store_session(&repo, SessionPayload::new(records.clone(), None))
        .await
        .unwrap();

    let checksum = dataset_checksum(&records).unwrap();
    assert_eq!(
        repo.find_by_checksum(&checksum).await.unwrap(),
        Some(created.session_id)
    );
}

#[tokio::test]
async fn test_deleted_session_redirects() {
    let repo = LocalRepository::new();
    let created = services::store_session(&repo, SessionPayload::new(sample_dataset(), None))
        .await
        .unwrap();
    repo.delete_session(&created.session_id).await.unwrap();

    let view = services::load_results_view(&repo, &created.session_id)
        .await
        .unwrap();
    assert!(view.is_redirect());
}

#[tokio::test]
async fn test_store_at_capacity_sends_evicted_session_back_to_upload() {
    let repo = LocalRepository::with_limits(SessionLimits {
        max_sessions: Some(1),
        ttl: None,
    });
    let first = services::store_session(&repo, SessionPayload::new(sample_dataset(), None))
        .await
        .unwrap();
    let other = vec![record("모자", DeviceClass::Mobile, "Z", &[(4, 1.0)])];
    let second = services::store_session(&repo, SessionPayload::new(other, None))
        .await
        .unwrap();

    assert_eq!(repo.session_count().await.unwrap(), 1);
    let view = services::load_results_view(&repo, &first.session_id)
        .await
        .unwrap();
    assert!(view.is_redirect());
    let view = services::load_results_view(&repo, &second.session_id)
        .await
        .unwrap();
    assert!(!view.is_redirect());

    // The evicted dataset is stored afresh rather than reused.
    let again = services::store_session(&repo, SessionPayload::new(sample_dataset(), None))
        .await
        .unwrap();
    assert!(!again.reused);
}

#[tokio::test]
async fn test_concurrent_stores_of_distinct_datasets() {
    let repo = Arc::new(LocalRepository::new());
    let mut handles = Vec::new();
    for i in 0..8 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            let records = vec![record(
                &format!("kw{}", i),
                DeviceClass::Desktop,
                "A",
                &[(i, 1.0)],
            )];
            services::store_session(repo.as_ref(), SessionPayload::new(records, None))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        assert!(!handle.await.unwrap().reused);
    }
    assert_eq!(repo.session_count().await.unwrap(), 8);
}

#[tokio::test]
async fn test_results_view_with_unusable_insight_is_empty() {
    let repo = LocalRepository::new();
    let created = services::store_session(
        &repo,
        SessionPayload::new(sample_dataset(), Some(json!("not an object"))),
    )
    .await
    .unwrap();

    match services::load_results_view(&repo, &created.session_id)
        .await
        .unwrap()
    {
        ResultsView::Ready(view) => {
            assert!(view.insight.is_empty());
            assert_eq!(view.records.len(), sample_dataset().len());
        }
        ResultsView::Redirect { .. } => panic!("expected a ready view"),
    }
}

#[tokio::test]
async fn test_unknown_session_data_is_not_found() {
    let repo = LocalRepository::new();
    let err = services::get_session_data(&repo, &SessionId::new("nope"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
