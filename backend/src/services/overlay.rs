//! Schedule overlay mapper: hour/rank to plot coordinates and chart layout.
//!
//! Rank 1 sits on the top edge and the device's rank domain maximum on the
//! bottom edge. Ranks beyond the domain are clamped to the bottom edge.

use crate::models::{DeviceClass, RankRecord, HOURS_PER_DAY};
use crate::routes::chart::{
    AxisTick, EntitySeries, LegendEntry, Margins, OverlaySeries, PlotArea, PlotPoint, RankChart,
    SeriesPoint,
};

pub const MARGINS: Margins = Margins {
    top: 20.0,
    right: 24.0,
    bottom: 44.0,
    left: 48.0,
};
pub const SVG_HEIGHT: f64 = 340.0;
pub const MIN_PLOT_WIDTH: f64 = 100.0;
pub const DEFAULT_CONTAINER_WIDTH: f64 = 800.0;

/// Hours that get a vertical grid line.
pub const X_GRID_HOURS: [usize; 5] = [0, 6, 12, 18, 23];

pub const PALETTE: [&str; 10] = [
    "#3b82f6", "#f59e0b", "#10b981", "#ef4444", "#8b5cf6", "#f97316", "#06b6d4", "#84cc16",
    "#ec4899", "#64748b",
];

pub const OVERLAY_LABEL: &str = "AI 추천 순위";
pub const OVERLAY_COLOR: &str = "#18181b";
pub const OVERLAY_DASH: &str = "8 4";
pub const OVERLAY_STROKE_WIDTH: f64 = 2.5;
pub const OVERLAY_MARKER_RADIUS: f64 = 3.5;

pub const DIMMED_SERIES_OPACITY: f64 = 0.2;
pub const DIMMED_LEGEND_OPACITY: f64 = 0.35;
const STROKE_WIDTH: f64 = 2.0;
const HIGHLIGHT_STROKE_WIDTH: f64 = 3.0;
const MARKER_RADIUS: f64 = 4.0;
const HIGHLIGHT_MARKER_RADIUS: f64 = 5.5;

/// Plot area left inside a container of the given pixel width.
pub fn plot_area(container_width: f64) -> PlotArea {
    let width = if container_width.is_finite() {
        container_width - MARGINS.left - MARGINS.right
    } else {
        DEFAULT_CONTAINER_WIDTH - MARGINS.left - MARGINS.right
    };
    PlotArea {
        width: width.max(MIN_PLOT_WIDTH),
        height: SVG_HEIGHT - MARGINS.top - MARGINS.bottom,
    }
}

/// Map an hour and a rank onto the plot area of `device`.
pub fn map_to_plot(hour: usize, rank: f64, device: DeviceClass, plot: PlotArea) -> PlotPoint {
    let domain_max = f64::from(device.rank_domain_max());
    let hour = hour.min(HOURS_PER_DAY - 1) as f64;
    let clamped = rank.clamp(1.0, domain_max);
    PlotPoint {
        x: hour / (HOURS_PER_DAY - 1) as f64 * plot.width,
        y: (clamped - 1.0) / (domain_max - 1.0) * plot.height,
    }
}

fn series_point(hour: usize, rank: f64, device: DeviceClass, plot: PlotArea) -> SeriesPoint {
    let PlotPoint { x, y } = map_to_plot(hour, rank, device, plot);
    SeriesPoint { hour, rank, x, y }
}

/// SVG path through `points` in order, `None` for fewer than two points.
pub fn series_path(points: &[SeriesPoint]) -> Option<String> {
    if points.len() < 2 {
        return None;
    }
    let segments: Vec<String> = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let command = if i == 0 { "M" } else { "L" };
            format!("{} {} {}", command, p.x, p.y)
        })
        .collect();
    Some(segments.join(" "))
}

/// Recommended-schedule line over all 24 hours.
pub fn build_overlay(
    targets: &[u32; HOURS_PER_DAY],
    device: DeviceClass,
    plot: PlotArea,
) -> OverlaySeries {
    let points: Vec<SeriesPoint> = targets
        .iter()
        .enumerate()
        .map(|(hour, &rank)| series_point(hour, f64::from(rank), device, plot))
        .collect();
    OverlaySeries {
        label: OVERLAY_LABEL.to_string(),
        path: series_path(&points).unwrap_or_default(),
        points,
        color: OVERLAY_COLOR.to_string(),
        dash_array: OVERLAY_DASH.to_string(),
        stroke_width: OVERLAY_STROKE_WIDTH,
        marker_radius: OVERLAY_MARKER_RADIUS,
    }
}

/// Ephemeral legend selection. Cleared whenever the dataset changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    selected: Option<usize>,
    dataset: Option<String>,
}

impl HighlightState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select `index`, or clear the selection if it is already selected.
    pub fn toggle(&mut self, index: usize) {
        self.selected = if self.selected == Some(index) {
            None
        } else {
            Some(index)
        };
    }

    /// Record the identity of the data being shown; a different identity
    /// drops the selection.
    pub fn sync(&mut self, dataset: &str) {
        if self.dataset.as_deref() != Some(dataset) {
            self.dataset = Some(dataset.to_string());
            self.selected = None;
        }
    }

    pub fn is_dimmed(&self, index: usize) -> bool {
        matches!(self.selected, Some(selected) if selected != index)
    }

    pub fn series_opacity(&self, index: usize) -> f64 {
        if self.is_dimmed(index) {
            DIMMED_SERIES_OPACITY
        } else {
            1.0
        }
    }

    pub fn legend_opacity(&self, index: usize) -> f64 {
        if self.is_dimmed(index) {
            DIMMED_LEGEND_OPACITY
        } else {
            1.0
        }
    }
}

fn axis_ticks(device: DeviceClass, plot: PlotArea) -> (Vec<AxisTick>, Vec<AxisTick>) {
    let y_ticks = (1..=device.rank_domain_max())
        .map(|rank| AxisTick {
            label: rank.to_string(),
            position: map_to_plot(0, f64::from(rank), device, plot).y,
        })
        .collect();
    let x_ticks = (0..HOURS_PER_DAY)
        .map(|hour| AxisTick {
            label: format!("{:02}", hour),
            position: map_to_plot(hour, 1.0, device, plot).x,
        })
        .collect();
    (y_ticks, x_ticks)
}

/// Chart of the `device` records: one series per record, colours cycling
/// through [`PALETTE`], optional recommendation overlay.
pub fn build_chart(
    records: &[RankRecord],
    device: DeviceClass,
    container_width: f64,
    targets: Option<&[u32; HOURS_PER_DAY]>,
    highlight: &HighlightState,
) -> RankChart {
    let plot = plot_area(container_width);
    let (y_ticks, x_ticks) = axis_ticks(device, plot);
    let rows: Vec<&RankRecord> = records.iter().filter(|r| r.device == device).collect();
    let highlighted = highlight.selected().filter(|&idx| idx < rows.len());

    let mut series = Vec::with_capacity(rows.len());
    let mut legend = Vec::with_capacity(rows.len());
    for (idx, record) in rows.iter().enumerate() {
        let color = PALETTE[idx % PALETTE.len()].to_string();
        let points: Vec<SeriesPoint> = record
            .hourly
            .observed()
            .map(|(hour, rank)| series_point(hour, rank, device, plot))
            .collect();
        let is_highlighted = highlighted == Some(idx);
        let (series_opacity, legend_opacity) = match highlighted {
            Some(_) => (highlight.series_opacity(idx), highlight.legend_opacity(idx)),
            None => (1.0, 1.0),
        };

        legend.push(LegendEntry {
            entity_name: record.entity_name.clone(),
            color: color.clone(),
            opacity: legend_opacity,
        });
        series.push(EntitySeries {
            entity_name: record.entity_name.clone(),
            color,
            path: series_path(&points),
            points,
            opacity: series_opacity,
            stroke_width: if is_highlighted {
                HIGHLIGHT_STROKE_WIDTH
            } else {
                STROKE_WIDTH
            },
            marker_radius: if is_highlighted {
                HIGHLIGHT_MARKER_RADIUS
            } else {
                MARKER_RADIUS
            },
        });
    }

    RankChart {
        device,
        width: plot.width + MARGINS.left + MARGINS.right,
        height: SVG_HEIGHT,
        margin: MARGINS,
        plot,
        domain_max: device.rank_domain_max(),
        y_ticks,
        x_ticks,
        x_grid: X_GRID_HOURS
            .iter()
            .map(|&hour| map_to_plot(hour, 1.0, device, plot).x)
            .collect(),
        series,
        legend,
        overlay: targets.map(|t| build_overlay(t, device, plot)),
        highlighted,
    }
}
