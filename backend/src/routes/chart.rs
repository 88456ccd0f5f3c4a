use serde::{Deserialize, Serialize};

use crate::models::DeviceClass;

// =========================================================
// Rank chart types
// =========================================================

/// Drawable area inside the chart margins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Position inside the plot area; `y = 0` is the top edge (rank 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
}

/// Observed or recommended rank at one hour, with its plot position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub hour: usize,
    pub rank: f64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub label: String,
    /// Pixel offset along the axis.
    pub position: f64,
}

/// One advertiser's observed line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySeries {
    pub entity_name: String,
    pub color: String,
    pub points: Vec<SeriesPoint>,
    /// SVG path; `None` when fewer than two hours were observed.
    pub path: Option<String>,
    pub opacity: f64,
    pub stroke_width: f64,
    pub marker_radius: f64,
}

/// Recommended-schedule line drawn over all 24 hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySeries {
    pub label: String,
    pub points: Vec<SeriesPoint>,
    pub path: String,
    pub color: String,
    pub dash_array: String,
    pub stroke_width: f64,
    pub marker_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub entity_name: String,
    pub color: String,
    pub opacity: f64,
}

/// Everything a renderer needs to draw the hourly rank chart of one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankChart {
    pub device: DeviceClass,
    pub width: f64,
    pub height: f64,
    pub margin: Margins,
    pub plot: PlotArea,
    pub domain_max: u32,
    pub y_ticks: Vec<AxisTick>,
    pub x_ticks: Vec<AxisTick>,
    /// Vertical grid line positions.
    pub x_grid: Vec<f64>,
    pub series: Vec<EntitySeries>,
    pub legend: Vec<LegendEntry>,
    pub overlay: Option<OverlaySeries>,
    pub highlighted: Option<usize>,
}

impl RankChart {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
