//! Public API surface for the rank-insight backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::routes::chart::AxisTick;
pub use crate::routes::chart::EntitySeries;
pub use crate::routes::chart::LegendEntry;
pub use crate::routes::chart::Margins;
pub use crate::routes::chart::OverlaySeries;
pub use crate::routes::chart::PlotArea;
pub use crate::routes::chart::PlotPoint;
pub use crate::routes::chart::RankChart;
pub use crate::routes::chart::SeriesPoint;
pub use crate::routes::insight::CompetitorGroup;
pub use crate::routes::insight::GoldenWindow;
pub use crate::routes::insight::NormalizedInsight;
pub use crate::routes::insight::RankScheduleRecommendation;
pub use crate::routes::report::Cell;
pub use crate::routes::report::DetailBlock;
pub use crate::routes::report::DetailRow;
pub use crate::routes::report::DeviceComparison;
pub use crate::routes::report::EntityComparisonRow;
pub use crate::routes::report::NarrativeSection;
pub use crate::routes::report::ReportDocument;
pub use crate::routes::report::Sheet;
pub use crate::routes::report::TabularReport;
pub use crate::routes::results::DeviceSummary;
pub use crate::routes::results::HourValue;
pub use crate::routes::results::RecordAnalysis;
pub use crate::routes::results::RecordMetrics;
pub use crate::routes::results::UploadResult;
pub use crate::routes::session::ResultsView;
pub use crate::routes::session::SearchResult;
pub use crate::routes::session::SessionCreated;
pub use crate::routes::session::SessionPayload;
pub use crate::routes::session::SessionView;

pub use crate::models::{DeviceClass, HourlyRanks, RankRecord, HOURS_PER_DAY};

use serde::{Deserialize, Serialize};

/// Session identifier handed back to the results view.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        SessionId(value.into())
    }

    /// Fresh random identifier.
    pub fn generate() -> Self {
        SessionId(uuid::Uuid::new_v4().to_string())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}
