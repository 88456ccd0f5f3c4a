use serde::{Deserialize, Serialize};

use super::results::DeviceSummary;
use crate::models::HOURS_PER_DAY;

// =========================================================
// Tabular report types
// =========================================================

/// A single cell handed to the spreadsheet writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Integer(i64),
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }
}

/// Device-vs-device summary block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceComparison {
    pub desktop: DeviceSummary,
    pub mobile: DeviceSummary,
    pub advertiser_count_diff: usize,
    pub average_rank_diff: f64,
    pub intensity_diff: u8,
}

/// One advertiser compared across device classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityComparisonRow {
    pub entity_name: String,
    pub reference_url: String,
    pub desktop_average: f64,
    pub mobile_average: f64,
    pub difference: f64,
}

/// Titled block of narrative lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeSection {
    pub title: String,
    pub lines: Vec<String>,
}

/// One row of a per-device raw detail block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub position: usize,
    pub entity_name: String,
    pub reference_url: String,
    pub average: f64,
    /// Raw hourly values, `0` where nothing was observed.
    pub hours: [f64; HOURS_PER_DAY],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailBlock {
    pub device: crate::models::DeviceClass,
    pub rows: Vec<DetailRow>,
}

/// Complete export content: comparison, narrative and raw detail blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularReport {
    pub device_comparison: DeviceComparison,
    pub entity_comparison: Vec<EntityComparisonRow>,
    pub narrative: Vec<NarrativeSection>,
    pub desktop_detail: DetailBlock,
    pub mobile_detail: DetailBlock,
}

/// A named grid of cells, one per output worksheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

/// Report plus its worksheet layout, as returned to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub file_name: String,
    pub report: TabularReport,
    pub sheets: Vec<Sheet>,
}

/// Route function name constant for report assembly
pub const GET_REPORT: &str = "get_report";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_serialization_is_untagged() {
        let row = vec![
            Cell::text("PC"),
            Cell::Integer(3),
            Cell::Number(2.5),
            Cell::Empty,
        ];
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value, serde_json::json!(["PC", 3, 2.5, null]));
    }

    #[test]
    fn test_cell_accessors() {
        assert_eq!(Cell::text("a").as_text(), Some("a"));
        assert_eq!(Cell::Integer(4).as_number(), Some(4.0));
        assert_eq!(Cell::Empty.as_number(), None);
    }
}
