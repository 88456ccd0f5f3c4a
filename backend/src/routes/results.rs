use serde::{Deserialize, Serialize};

use crate::models::{DeviceClass, RankRecord};

// =========================================================
// Per-record and per-device metrics types
// =========================================================

/// Hour label paired with the rank observed in that hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourValue {
    /// `00시` … `23시`, or `-` when no hour was observed.
    pub label: String,
    pub value: f64,
}

impl HourValue {
    pub const EMPTY_LABEL: &'static str = "-";

    pub fn empty() -> Self {
        Self {
            label: Self::EMPTY_LABEL.to_string(),
            value: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label == Self::EMPTY_LABEL
    }
}

/// Statistics of one record's observed hours.
///
/// `worst_hour` is the numerically highest rank (the weakest position) and
/// `best_hour` the lowest; they serialize under the upstream names
/// `peak_hour` / `lowest_hour`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetrics {
    #[serde(rename = "peak_hour")]
    pub worst_hour: HourValue,
    #[serde(rename = "lowest_hour")]
    pub best_hour: HourValue,
    /// Population variance over observed hours.
    pub variance: f64,
    pub non_zero_average: f64,
}

impl RecordMetrics {
    pub fn empty() -> Self {
        Self {
            worst_hour: HourValue::empty(),
            best_hour: HourValue::empty(),
            variance: 0.0,
            non_zero_average: 0.0,
        }
    }
}

/// One row of the per-record analysis table shown after upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordAnalysis {
    pub keyword: String,
    #[serde(rename = "ad_area")]
    pub device: DeviceClass,
    #[serde(rename = "advertiser")]
    pub entity_name: String,
    #[serde(rename = "url")]
    pub reference_url: String,
    pub average: f64,
    pub peak_hour: String,
    pub lowest_hour: String,
    /// Rounded to two decimals.
    pub variance: f64,
}

/// Aggregate view of one device class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceSummary {
    pub device: DeviceClass,
    /// Distinct advertisers with at least one observed hour.
    pub advertiser_count: usize,
    /// Sample-weighted mean over every observed hour of the device.
    pub average_rank: f64,
    /// Heuristic score in `1..=5`.
    pub competition_intensity: u8,
}

/// Response of the upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub records: Vec<RankRecord>,
    pub analysis: Vec<RecordAnalysis>,
}

/// Route function name constant for upload decoding
pub const POST_UPLOAD: &str = "post_upload";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_metrics_serializes_upstream_names() {
        let metrics = RecordMetrics::empty();
        let value = serde_json::to_value(&metrics).unwrap();
        assert_eq!(value["peak_hour"]["label"], "-");
        assert_eq!(value["lowest_hour"]["value"], 0.0);
        assert!(value.get("worst_hour").is_none());
    }

    #[test]
    fn test_hour_value_empty() {
        assert!(HourValue::empty().is_empty());
        let observed = HourValue {
            label: "03시".to_string(),
            value: 2.0,
        };
        assert!(!observed.is_empty());
    }
}
