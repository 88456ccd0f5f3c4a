//! Insight normalizer.
//!
//! The narrative returned by the language model is not schema-enforced: any
//! field may be missing, a bare string, a list or a keyed object. Every field
//! is first classified into a [`RawField`] and then folded into the fixed
//! [`NormalizedInsight`] shape. Normalization never fails.

use serde_json::{Map, Value};
use tracing::debug;

use crate::routes::insight::{CompetitorGroup, GoldenWindow, NormalizedInsight};

/// Wire keys of the narrative payload.
pub mod keys {
    pub const WRAPPER: &str = "insight";
    pub const OVERALL: &str = "overall_health";
    pub const MEDIA_ASYMMETRY: &str = "media_asymmetry";
    pub const COMPETITOR_DYNAMICS: &str = "competitor_dynamics";
    pub const GOLDEN_TIME: &str = "golden_time";
    pub const ACTION_ITEMS: &str = "action_items";
}

/// Label of the single group built from a flat competitor list.
pub const FLAT_COMPETITOR_LABEL: &str = "경쟁 그룹";
/// Label of a golden window given as a bare string.
pub const BARE_WINDOW_LABEL: &str = "구간";
/// Placeholder for an empty golden-window value.
pub const EMPTY_VALUE: &str = "-";

/// Shape of one loosely typed field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawField<'a> {
    Absent,
    Text(&'a str),
    List(&'a [Value]),
    Keyed(&'a Map<String, Value>),
    Other(&'a Value),
}

impl<'a> RawField<'a> {
    pub fn classify(value: Option<&'a Value>) -> Self {
        match value {
            None | Some(Value::Null) => RawField::Absent,
            Some(Value::String(s)) => RawField::Text(s),
            Some(Value::Array(items)) => RawField::List(items),
            Some(Value::Object(map)) => RawField::Keyed(map),
            Some(other) => RawField::Other(other),
        }
    }
}

/// Normalize a raw narrative payload.
///
/// Accepts either the narrative object itself or a `{ "insight": ... }`
/// envelope. Anything that is not an object yields an empty insight.
pub fn normalize(raw: Option<&Value>) -> NormalizedInsight {
    let Some(Value::Object(map)) = raw else {
        if raw.is_some_and(|v| !v.is_null()) {
            debug!("Ignoring non-object insight payload");
        }
        return NormalizedInsight::default();
    };

    let fields = match map.get(keys::WRAPPER) {
        Some(Value::Object(inner)) => inner,
        _ => map,
    };

    NormalizedInsight {
        overall: flat_list(RawField::classify(fields.get(keys::OVERALL))),
        media_asymmetry: flat_list(RawField::classify(fields.get(keys::MEDIA_ASYMMETRY))),
        competitor_groups: competitor_groups(RawField::classify(
            fields.get(keys::COMPETITOR_DYNAMICS),
        )),
        golden_windows: golden_windows(RawField::classify(fields.get(keys::GOLDEN_TIME))),
        action_items: flat_list(RawField::classify(fields.get(keys::ACTION_ITEMS))),
    }
}

/// Convenience wrapper for an owned optional payload.
pub fn normalize_value(raw: &Option<Value>) -> NormalizedInsight {
    normalize(raw.as_ref())
}

/// Text of a list entry. Empty strings, zero, `false`, null and nested
/// containers are dropped.
fn entry_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn list_entries(items: &[Value]) -> Vec<String> {
    items.iter().filter_map(entry_text).collect()
}

/// Flat-list normalization of a single loosely typed value.
pub(crate) fn text_list(value: Option<&Value>) -> Vec<String> {
    flat_list(RawField::classify(value))
}

fn flat_list(field: RawField<'_>) -> Vec<String> {
    match field {
        RawField::Text(s) if !s.is_empty() => vec![s.to_string()],
        RawField::List(items) => list_entries(items),
        RawField::Absent | RawField::Text(_) | RawField::Keyed(_) | RawField::Other(_) => {
            Vec::new()
        }
    }
}

fn competitor_groups(field: RawField<'_>) -> Vec<CompetitorGroup> {
    match field {
        RawField::List(items) => vec![CompetitorGroup {
            label: FLAT_COMPETITOR_LABEL.to_string(),
            items: list_entries(items),
        }],
        RawField::Keyed(map) => map
            .iter()
            .map(|(label, value)| CompetitorGroup {
                label: label.clone(),
                items: match RawField::classify(Some(value)) {
                    RawField::List(items) => list_entries(items),
                    RawField::Text(s) => vec![s.to_string()],
                    _ => Vec::new(),
                },
            })
            .collect(),
        RawField::Absent | RawField::Text(_) | RawField::Other(_) => Vec::new(),
    }
}

fn joined(items: &[Value]) -> String {
    list_entries(items).join("\n")
}

fn golden_windows(field: RawField<'_>) -> Vec<GoldenWindow> {
    match field {
        RawField::List(items) => items
            .iter()
            .enumerate()
            .map(|(idx, value)| GoldenWindow {
                label: format!("{} {}", BARE_WINDOW_LABEL, idx + 1),
                value: match RawField::classify(Some(value)) {
                    RawField::List(inner) => joined(inner),
                    RawField::Text(s) => s.to_string(),
                    RawField::Other(scalar) => scalar.to_string(),
                    // Only a null entry classifies as absent here.
                    RawField::Absent => Value::Null.to_string(),
                    RawField::Keyed(_) => EMPTY_VALUE.to_string(),
                },
            })
            .collect(),
        RawField::Keyed(map) => map
            .iter()
            .map(|(label, value)| GoldenWindow {
                label: label.clone(),
                value: match RawField::classify(Some(value)) {
                    RawField::List(inner) => joined(inner),
                    RawField::Text(s) if !s.is_empty() => s.to_string(),
                    _ => EMPTY_VALUE.to_string(),
                },
            })
            .collect(),
        RawField::Text(s) => vec![GoldenWindow {
            label: BARE_WINDOW_LABEL.to_string(),
            value: s.to_string(),
        }],
        RawField::Absent | RawField::Other(_) => Vec::new(),
    }
}

#[cfg(test)]
#[path = "insight_tests.rs"]
mod tests;
