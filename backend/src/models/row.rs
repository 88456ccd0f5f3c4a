//! Lenient decoding of header-keyed table rows.
//!
//! Both the uploaded spreadsheet (Korean column headers) and the JSON wire form
//! exchanged with the AI collaborator (snake_case keys) are flat objects. This
//! module turns either into a [`RankRecord`], coercing missing or malformed
//! cells instead of rejecting the row.

use serde_json::{Map, Value};

use super::rank::{DeviceClass, HourlyRanks, RankRecord};

/// Column names used to look up the fields of one row.
#[derive(Debug, Clone, Copy)]
pub struct RowKeys {
    pub keyword: &'static str,
    pub device: &'static str,
    pub entity_name: &'static str,
    pub reference_url: &'static str,
    pub average_rank: &'static str,
    pub hour: fn(usize) -> String,
}

/// Keys of the wire format (`hour_00` … `hour_23`).
pub const WIRE_KEYS: RowKeys = RowKeys {
    keyword: "keyword",
    device: "ad_area",
    entity_name: "advertiser",
    reference_url: "url",
    average_rank: "average",
    hour: wire_hour_key,
};

/// Headers of the uploaded spreadsheet (`00시` … `23시`).
pub const SHEET_KEYS: RowKeys = RowKeys {
    keyword: "키워드",
    device: "광고영역",
    entity_name: "광고주",
    reference_url: "URL",
    average_rank: "평균",
    hour: hour_label,
};

pub fn wire_hour_key(hour: usize) -> String {
    format!("hour_{:02}", hour)
}

/// Display label of an hour slot, e.g. `07시`.
pub fn hour_label(hour: usize) -> String {
    format!("{:02}시", hour)
}

/// Decode one row. Never fails: absent cells become empty strings or zero.
pub fn decode_row(row: &Map<String, Value>, keys: &RowKeys) -> RankRecord {
    let hourly = HourlyRanks::from_fn(|hour| coerce_number(row.get(&(keys.hour)(hour))));

    RankRecord {
        keyword: coerce_string(row.get(keys.keyword)),
        device: row
            .get(keys.device)
            .map(|v| DeviceClass::from_label(&coerce_string(Some(v))))
            .unwrap_or_default(),
        entity_name: coerce_string(row.get(keys.entity_name)),
        reference_url: coerce_string(row.get(keys.reference_url)),
        average_rank: coerce_number(row.get(keys.average_rank)),
        hourly,
    }
}

/// Coerce a cell to a number. Numeric strings are parsed; everything else
/// (null, booleans, arrays, unparsable text, NaN) yields 0.
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Coerce a cell to text. Numbers and booleans are stringified, null or
/// structured values become the empty string.
pub fn coerce_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}
