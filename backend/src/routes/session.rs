use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::chart::RankChart;
use super::insight::NormalizedInsight;
use crate::api::SessionId;
use crate::models::RankRecord;

/// Hand-off object between the upload step and the results view.
///
/// `insight` is kept as the raw AI payload; it is normalized whenever the
/// session is read back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(rename = "rawData", default)]
    pub raw_data: Vec<RankRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insight: Option<Value>,
}

impl SessionPayload {
    pub fn new(raw_data: Vec<RankRecord>, insight: Option<Value>) -> Self {
        Self { raw_data, insight }
    }

    pub fn is_empty(&self) -> bool {
        self.raw_data.is_empty()
    }
}

/// Returned after a session has been stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: SessionId,
    pub record_count: usize,
    /// `true` when an identical dataset was already stored.
    pub reused: bool,
}

/// Everything the results view renders from a stored session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub records: Vec<RankRecord>,
    pub insight: NormalizedInsight,
    /// Distinct keywords in first-seen order.
    pub keywords: Vec<String>,
}

/// Results-view guard outcome: the session, or a redirect to the upload step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultsView {
    Ready(Box<SessionView>),
    Redirect { redirect: String },
}

impl ResultsView {
    pub const UPLOAD_PATH: &'static str = "/upload";

    pub fn redirect_to_upload() -> Self {
        ResultsView::Redirect {
            redirect: Self::UPLOAD_PATH.to_string(),
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, ResultsView::Redirect { .. })
    }
}

/// Filtered rows plus the chart of the active device tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub rows: Vec<RankRecord>,
    pub keywords: Vec<String>,
    /// Advertisers shown in the chart, in first-seen order.
    pub entities: Vec<String>,
    pub chart: RankChart,
    /// Checksum of `rows`. Sent back as `highlight_dataset` so a legend
    /// selection made on other rows is dropped.
    pub dataset: String,
}

pub const POST_SESSION: &str = "store_session";
pub const GET_SESSION: &str = "get_session";
pub const DELETE_SESSION: &str = "delete_session";
pub const POST_SEARCH: &str = "post_search";
pub const GET_EXPORT_CSV: &str = "get_export_csv";

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_uses_raw_data_key() {
        let payload: SessionPayload = serde_json::from_value(json!({
            "rawData": [{ "keyword": "k", "ad_area": "PC", "advertiser": "A" }]
        }))
        .unwrap();
        assert_eq!(payload.raw_data.len(), 1);
        assert!(payload.insight.is_none());

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("rawData").is_some());
        assert!(value.get("insight").is_none());
    }

    #[test]
    fn test_missing_raw_data_is_empty() {
        let payload: SessionPayload = serde_json::from_value(json!({})).unwrap();
        assert!(payload.is_empty());
    }

    #[test]
    fn test_redirect_serialization() {
        let view = ResultsView::redirect_to_upload();
        assert!(view.is_redirect());
        assert_eq!(
            serde_json::to_value(&view).unwrap(),
            json!({ "redirect": "/upload" })
        );
    }
}
