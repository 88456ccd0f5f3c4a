//! Service layer for business logic.
//!
//! Pure computations (metrics, normalization, chart and report layout) live
//! next to the AI collaborator contract and the request gate used by the
//! HTTP handlers.

pub mod analysis;
pub mod gate;
pub mod insight;
pub mod metrics;
pub mod overlay;
pub mod prompts;
pub mod report;
pub mod schedule;
pub mod search;

pub use analysis::{
    analyze_narrative, recommend_rank_schedule, AnalysisError, AnthropicClient, NarrativeModel,
};
pub use gate::{AnalysisGate, AnalysisPermit};
pub use insight::normalize;
pub use metrics::{
    analyze_records, compute_group_average, compute_record_metrics, compute_two_stage_average,
};
pub use overlay::{build_chart, map_to_plot, HighlightState};
pub use report::{assemble, to_sheets};
pub use schedule::parse_recommendation;
pub use search::{search, SearchCriteria, SearchError};
