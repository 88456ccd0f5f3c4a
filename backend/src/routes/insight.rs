use serde::{Deserialize, Serialize};

use crate::models::HOURS_PER_DAY;

// =========================================================
// AI narrative and rank-schedule types
// =========================================================

/// Labelled group of competitor observations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorGroup {
    pub label: String,
    pub items: Vec<String>,
}

/// Time window flagged as favourable for bidding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenWindow {
    pub label: String,
    /// Multi-line descriptions are joined with `\n`.
    pub value: String,
}

/// AI narrative normalized into a fixed shape. Every field is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInsight {
    pub overall: Vec<String>,
    pub media_asymmetry: Vec<String>,
    pub competitor_groups: Vec<CompetitorGroup>,
    pub golden_windows: Vec<GoldenWindow>,
    pub action_items: Vec<String>,
}

impl NormalizedInsight {
    pub fn is_empty(&self) -> bool {
        self.overall.is_empty()
            && self.media_asymmetry.is_empty()
            && self.competitor_groups.is_empty()
            && self.golden_windows.is_empty()
            && self.action_items.is_empty()
    }
}

/// Hour-by-hour target ranks suggested by the AI collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankScheduleRecommendation {
    /// Positive target rank per hour, `1` where the model gave nothing usable.
    pub target_rank_by_hour: [u32; HOURS_PER_DAY],
    pub rationale: Vec<String>,
}

impl Default for RankScheduleRecommendation {
    fn default() -> Self {
        Self {
            target_rank_by_hour: [1; HOURS_PER_DAY],
            rationale: Vec::new(),
        }
    }
}

/// Route function name constant for the narrative analysis
pub const POST_ANALYZE: &str = "post_analyze";

/// Route function name constant for the rank-schedule recommendation
pub const POST_RANK_SCHEDULE: &str = "post_rank_schedule";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_insight_default_is_empty() {
        let insight = NormalizedInsight::default();
        assert!(insight.is_empty());
        let value = serde_json::to_value(&insight).unwrap();
        assert!(value["competitorGroups"].as_array().unwrap().is_empty());
        assert!(value["actionItems"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_recommendation_default_targets_rank_one() {
        let rec = RankScheduleRecommendation::default();
        assert!(rec.target_rank_by_hour.iter().all(|&r| r == 1));
        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["targetRankByHour"].as_array().unwrap().len(), 24);
    }
}
