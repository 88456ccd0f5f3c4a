//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::dto::{
    AnalyzeRequest, AnalyzeResponse, HealthResponse, RankScheduleRequest, ReportDocument,
    ResultsView, SearchResult, SessionCreated, SessionPayload, SessionRankScheduleRequest,
    SessionSearchRequest, UploadResult,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{RankRecord, RankScheduleRecommendation, SessionId};
use crate::db::dataset_checksum;
use crate::db::services as db_services;
use crate::models::decode_upload;
use crate::services::analysis::{recommend_rank_schedule, request_narrative};
use crate::services::insight::{normalize, normalize_value};
use crate::services::search::{
    csv_file_name, distinct_entities, distinct_keywords, schedule_request_rows, to_csv,
    without_entity,
};
use crate::services::{
    analyze_records, build_chart, report, search, AnalysisError, AnalysisPermit, HighlightState,
    NarrativeModel,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn model(state: &AppState) -> Result<&dyn NarrativeModel, AppError> {
    state
        .model
        .as_deref()
        .ok_or(AppError::Analysis(AnalysisError::MissingCredential))
}

fn acquire(state: &AppState, action: &str, id: &SessionId) -> Result<AnalysisPermit, AppError> {
    let key = format!("{}:{}", action, id);
    state.gate.try_acquire(&key).ok_or_else(|| {
        warn!(session_id = %id, action, "Analysis already in flight");
        AppError::Conflict(format!("An analysis is already running for session {}", id))
    })
}

async fn session_records(state: &AppState, id: &SessionId) -> Result<Vec<RankRecord>, AppError> {
    let (records, _) = db_services::get_session_data(state.repository.as_ref(), id).await?;
    Ok(records)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let storage = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "ok".to_string(),
        Ok(false) => "unavailable".to_string(),
        Err(e) => format!("error: {}", e),
    };
    let sessions = match state.repository.session_count().await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(error = %e, "Failed to count sessions");
            None
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        storage,
        ai_configured: state.model.is_some(),
        sessions,
        analyses_in_flight: state.gate.in_flight_count(),
    }))
}

// =============================================================================
// Upload and stateless analysis
// =============================================================================

/// POST /v1/upload
///
/// Decode spreadsheet rows into records, with per-record analysis.
pub async fn upload(Json(rows): Json<Value>) -> HandlerResult<UploadResult> {
    let records = decode_upload(&rows)?;
    let analysis = analyze_records(&records);
    info!("Decoded {} uploaded rows", records.len());
    Ok(Json(UploadResult { records, analysis }))
}

/// POST /v1/analyze
///
/// Narrative analysis of the submitted records.
pub async fn analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> HandlerResult<AnalyzeResponse> {
    let model = model(&state)?;
    let raw = request_narrative(model, &request.data).await?;
    Ok(Json(AnalyzeResponse {
        insight: normalize(Some(&raw)),
        raw,
    }))
}

/// POST /v1/rank-schedule
pub async fn rank_schedule(
    State(state): State<AppState>,
    Json(request): Json<RankScheduleRequest>,
) -> HandlerResult<RankScheduleRecommendation> {
    let model = model(&state)?;
    let rows = without_entity(&request.data, request.exclude.as_deref());
    let recommendation = recommend_rank_schedule(model, &rows).await?;
    Ok(Json(recommendation))
}

// =============================================================================
// Sessions
// =============================================================================

/// POST /v1/sessions
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<SessionPayload>,
) -> Result<(StatusCode, Json<SessionCreated>), AppError> {
    let created = db_services::store_session(state.repository.as_ref(), payload).await?;
    let status = if created.reused {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(created)))
}

/// GET /v1/sessions/{session_id}
///
/// A missing or empty session yields a redirect to the upload step.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<ResultsView> {
    let id = SessionId::new(session_id);
    let view = db_services::load_results_view(state.repository.as_ref(), &id).await?;
    Ok(Json(view))
}

/// DELETE /v1/sessions/{session_id}
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = SessionId::new(session_id);
    db_services::delete_session(state.repository.as_ref(), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/sessions/{session_id}/search
pub async fn search_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SessionSearchRequest>,
) -> HandlerResult<SearchResult> {
    let id = SessionId::new(session_id);
    let records = session_records(&state, &id).await?;
    let rows = search(&records, &request.criteria)?;
    let dataset = dataset_checksum(&rows)?;

    let mut highlight = HighlightState::new();
    highlight.sync(request.highlight_dataset.as_deref().unwrap_or(&dataset));
    if let Some(index) = request.highlighted {
        highlight.toggle(index);
    }
    highlight.sync(&dataset);
    let chart = build_chart(
        &rows,
        request.chart_device,
        request.container_width,
        request.target_ranks.as_ref(),
        &highlight,
    );

    Ok(Json(SearchResult {
        keywords: distinct_keywords(&records),
        entities: distinct_entities(&rows, request.chart_device),
        rows,
        chart,
        dataset,
    }))
}

/// POST /v1/sessions/{session_id}/analyze
///
/// Narrative analysis of a stored session; the raw result replaces the
/// session's insight.
pub async fn analyze_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<AnalyzeResponse> {
    let id = SessionId::new(session_id);
    let model = model(&state)?;
    let records = session_records(&state, &id).await?;
    let _permit = acquire(&state, "narrative", &id)?;

    let raw = request_narrative(model, &records).await?;
    db_services::attach_insight(state.repository.as_ref(), &id, raw.clone()).await?;
    Ok(Json(AnalyzeResponse {
        insight: normalize(Some(&raw)),
        raw,
    }))
}

/// POST /v1/sessions/{session_id}/rank-schedule
///
/// Only one recommendation per session may be in flight.
pub async fn session_rank_schedule(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(request): Json<SessionRankScheduleRequest>,
) -> HandlerResult<RankScheduleRecommendation> {
    let id = SessionId::new(session_id);
    let model = model(&state)?;
    let records = session_records(&state, &id).await?;
    let filtered = search(&records, &request.criteria)?;
    let rows = schedule_request_rows(&filtered, request.device, request.exclude.as_deref());
    let _permit = acquire(&state, "rank_schedule", &id)?;

    let recommendation = recommend_rank_schedule(model, &rows).await?;
    Ok(Json(recommendation))
}

/// GET /v1/sessions/{session_id}/report
pub async fn get_report(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> HandlerResult<ReportDocument> {
    let id = SessionId::new(session_id);
    let (records, insight) =
        db_services::get_session_data(state.repository.as_ref(), &id).await?;
    let insight = normalize_value(&insight);
    let document = report::build_document(&records, &insight, Utc::now().date_naive());
    Ok(Json(document))
}

/// GET /v1/sessions/{session_id}/export.csv
pub async fn export_csv(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = SessionId::new(session_id);
    let records = session_records(&state, &id).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        csv_file_name(Utc::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        to_csv(&records)?,
    ))
}
