//! Results-view filtering and the raw-data CSV download.

use std::collections::HashSet;

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::row::hour_label;
use crate::models::{DeviceClass, RankRecord, HOURS_PER_DAY};

/// Advertiser choice meaning "exclude nobody".
pub const NO_EXCLUSION: &str = "없음";

const BOM: &str = "\u{feff}";
const MISSING_CELL: &str = "-";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("At least one device class must be selected")]
    NoDeviceSelected,

    #[error("Failed to write CSV: {0}")]
    Csv(String),
}

fn default_true() -> bool {
    true
}

/// Keyword and device-class filter of the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Empty means every keyword.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_true")]
    pub include_desktop: bool,
    #[serde(default = "default_true")]
    pub include_mobile: bool,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            include_desktop: true,
            include_mobile: true,
        }
    }
}

impl SearchCriteria {
    pub fn includes_device(&self, device: DeviceClass) -> bool {
        match device {
            DeviceClass::Desktop => self.include_desktop,
            DeviceClass::Mobile => self.include_mobile,
        }
    }

    pub fn matches(&self, record: &RankRecord) -> bool {
        let keyword_ok = self.keywords.is_empty() || self.keywords.contains(&record.keyword);
        keyword_ok && self.includes_device(record.device)
    }
}

/// Records matching `criteria`, in their original order.
pub fn search(
    records: &[RankRecord],
    criteria: &SearchCriteria,
) -> Result<Vec<RankRecord>, SearchError> {
    if !criteria.include_desktop && !criteria.include_mobile {
        return Err(SearchError::NoDeviceSelected);
    }
    Ok(records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect())
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// Distinct keywords in first-seen order.
pub fn distinct_keywords(records: &[RankRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.keyword.as_str()))
}

/// Distinct advertisers of `device` in first-seen order.
pub fn distinct_entities(records: &[RankRecord], device: DeviceClass) -> Vec<String> {
    distinct(
        records
            .iter()
            .filter(|r| r.device == device)
            .map(|r| r.entity_name.as_str()),
    )
}

/// Normalized exclusion: blank or [`NO_EXCLUSION`] means none.
fn exclusion(exclude: Option<&str>) -> Option<&str> {
    exclude
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != NO_EXCLUSION)
}

/// Rows other than those of the excluded advertiser.
pub fn without_entity(records: &[RankRecord], exclude: Option<&str>) -> Vec<RankRecord> {
    let exclude = exclusion(exclude);
    records
        .iter()
        .filter(|r| exclude != Some(r.entity_name.as_str()))
        .cloned()
        .collect()
}

/// Rows submitted for a rank-schedule recommendation: the active device tab,
/// minus one optionally excluded advertiser.
pub fn schedule_request_rows(
    records: &[RankRecord],
    device: DeviceClass,
    exclude: Option<&str>,
) -> Vec<RankRecord> {
    let exclude = exclusion(exclude);
    records
        .iter()
        .filter(|r| r.device == device)
        .filter(|r| exclude != Some(r.entity_name.as_str()))
        .cloned()
        .collect()
}

/// Spreadsheet-friendly CSV of the given rows, prefixed with a UTF-8 BOM.
/// Every cell is quoted.
pub fn to_csv(records: &[RankRecord]) -> Result<String, SearchError> {
    let mut header: Vec<String> = ["키워드", "광고 영역", "광고주", "평균"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    header.extend((0..HOURS_PER_DAY).map(hour_label));

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(BOM.as_bytes().to_vec());
    writer.write_record(&header).map_err(csv_error)?;

    for record in records {
        let mut cells = vec![
            record.keyword.clone(),
            record.device.label().to_string(),
            record.entity_name.clone(),
            if record.average_rank > 0.0 {
                format!("{:.2}", record.average_rank)
            } else {
                MISSING_CELL.to_string()
            },
        ];
        cells.extend((0..HOURS_PER_DAY).map(|hour| match record.hourly.get(hour) {
            Some(rank) => format!("{:.1}", rank),
            None => MISSING_CELL.to_string(),
        }));
        writer.write_record(&cells).map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(csv_error)?;
    String::from_utf8(bytes).map_err(csv_error)
}

fn csv_error(err: impl std::fmt::Display) -> SearchError {
    SearchError::Csv(err.to_string())
}

pub fn csv_file_name(date: NaiveDate) -> String {
    format!("rank_data_{}.csv", date.format("%Y-%m-%d"))
}
