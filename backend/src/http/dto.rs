//! Data Transfer Objects for the HTTP API.
//!
//! Response bodies are mostly re-exported from the routes module since they
//! already derive Serialize/Deserialize. Request bodies live here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use crate::api::{
    // Analysis
    NormalizedInsight, RankScheduleRecommendation,
    // Records
    DeviceClass, RankRecord, HOURS_PER_DAY,
    // Report
    ReportDocument,
    // Results
    UploadResult,
    // Sessions
    ResultsView, SearchResult, SessionCreated, SessionPayload,
};
use crate::services::overlay::DEFAULT_CONTAINER_WIDTH;
use crate::services::SearchCriteria;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Session store status
    pub storage: String,
    /// Whether a language model credential is configured
    pub ai_configured: bool,
    /// Live sessions, absent when the store cannot be counted
    pub sessions: Option<usize>,
    pub analyses_in_flight: usize,
}

/// Request body for the narrative analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub data: Vec<RankRecord>,
}

/// Narrative analysis: normalized for rendering, raw for the session hand-off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub insight: NormalizedInsight,
    pub raw: Value,
}

/// Request body for a rank-schedule recommendation over explicit rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankScheduleRequest {
    #[serde(default)]
    pub data: Vec<RankRecord>,
    /// Advertiser left out of the request; `없음` means nobody.
    #[serde(default)]
    pub exclude: Option<String>,
}

fn default_container_width() -> f64 {
    DEFAULT_CONTAINER_WIDTH
}

/// Search over a stored session plus the chart of the active device tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSearchRequest {
    #[serde(flatten)]
    pub criteria: SearchCriteria,
    /// Device tab the chart is drawn for
    #[serde(default)]
    pub chart_device: DeviceClass,
    #[serde(default = "default_container_width")]
    pub container_width: f64,
    /// Series index highlighted from the legend
    #[serde(default)]
    pub highlighted: Option<usize>,
    /// `dataset` of the search result the selection was made on
    #[serde(default)]
    pub highlight_dataset: Option<String>,
    /// Recommendation overlay to draw on the chart
    #[serde(default)]
    pub target_ranks: Option<[u32; HOURS_PER_DAY]>,
}

impl Default for SessionSearchRequest {
    fn default() -> Self {
        Self {
            criteria: SearchCriteria::default(),
            chart_device: DeviceClass::default(),
            container_width: DEFAULT_CONTAINER_WIDTH,
            highlighted: None,
            highlight_dataset: None,
            target_ranks: None,
        }
    }
}

/// Rank-schedule recommendation over the rows of a stored session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionRankScheduleRequest {
    #[serde(flatten)]
    pub criteria: SearchCriteria,
    /// Device tab whose rows are submitted
    #[serde(default)]
    pub device: DeviceClass,
    #[serde(default)]
    pub exclude: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_defaults() {
        let request: SessionSearchRequest = serde_json::from_value(json!({})).unwrap();
        assert!(request.criteria.include_desktop);
        assert!(request.criteria.include_mobile);
        assert_eq!(request.chart_device, DeviceClass::Desktop);
        assert_eq!(request.container_width, DEFAULT_CONTAINER_WIDTH);
        assert!(request.target_ranks.is_none());
    }

    #[test]
    fn test_search_request_flattens_criteria() {
        let request: SessionSearchRequest = serde_json::from_value(json!({
            "keywords": ["신발"],
            "include_mobile": false,
            "chart_device": "Mobile",
            "highlighted": 2
        }))
        .unwrap();
        assert_eq!(request.criteria.keywords, vec!["신발".to_string()]);
        assert!(!request.criteria.include_mobile);
        assert_eq!(request.chart_device, DeviceClass::Mobile);
        assert_eq!(request.highlighted, Some(2));
    }

    #[test]
    fn test_rank_schedule_request_exclude_is_optional() {
        let request: RankScheduleRequest = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert!(request.exclude.is_none());
        assert!(request.data.is_empty());
    }
}
