//! Core rank-observation types.
//!
//! A [`RankRecord`] is one advertiser's hourly ad-rank series for one
//! keyword on one device class. Hours without an observation are `None`; the
//! JSON wire form keeps the upstream convention of writing them as `0`.

use serde::de::Deserializer;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::row::{decode_row, wire_hour_key, WIRE_KEYS};

/// Number of hourly slots in every series.
pub const HOURS_PER_DAY: usize = 24;

/// Device class an observation was taken on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum DeviceClass {
    /// Shown as `PC` in the upstream data.
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub const ALL: [DeviceClass; 2] = [DeviceClass::Desktop, DeviceClass::Mobile];

    /// Label used on the wire and in reports.
    pub fn label(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "PC",
            DeviceClass::Mobile => "Mobile",
        }
    }

    /// Parse an upstream label. Only `Mobile` selects the mobile class; any
    /// other value, including an empty one, falls back to desktop.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("mobile") {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    /// Largest rank shown on charts for this device class.
    pub fn rank_domain_max(&self) -> u32 {
        match self {
            DeviceClass::Desktop => 10,
            DeviceClass::Mobile => 5,
        }
    }
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for DeviceClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DeviceClass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value {
            Value::String(s) => DeviceClass::from_label(&s),
            _ => DeviceClass::default(),
        })
    }
}

/// Fixed 24-slot hourly rank series. A slot holds a positive rank or `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HourlyRanks([Option<f64>; HOURS_PER_DAY]);

impl HourlyRanks {
    /// Build from raw upstream values where `0` (or anything not positive)
    /// means "no observation".
    pub fn from_raw(values: [f64; HOURS_PER_DAY]) -> Self {
        Self::from_fn(|hour| values[hour])
    }

    /// Build by asking `f` for the raw value of every hour in order.
    pub fn from_fn(mut f: impl FnMut(usize) -> f64) -> Self {
        let mut slots = [None; HOURS_PER_DAY];
        for (hour, slot) in slots.iter_mut().enumerate() {
            let value = f(hour);
            if value.is_finite() && value > 0.0 {
                *slot = Some(value);
            }
        }
        Self(slots)
    }

    /// Build from a sparse list of `(hour, rank)` observations.
    pub fn from_observations(observations: &[(usize, f64)]) -> Self {
        Self::from_fn(|hour| {
            observations
                .iter()
                .find(|(h, _)| *h == hour)
                .map(|(_, rank)| *rank)
                .unwrap_or(0.0)
        })
    }

    pub fn get(&self, hour: usize) -> Option<f64> {
        self.0.get(hour).copied().flatten()
    }

    /// Raw value with the upstream sentinel: `0.0` for unobserved hours.
    pub fn raw(&self, hour: usize) -> f64 {
        self.get(hour).unwrap_or(0.0)
    }

    pub fn slots(&self) -> &[Option<f64>; HOURS_PER_DAY] {
        &self.0
    }

    /// Observed `(hour, rank)` pairs in ascending hour order.
    pub fn observed(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(hour, slot)| slot.map(|rank| (hour, rank)))
    }

    pub fn observed_count(&self) -> usize {
        self.0.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.observed_count() == 0
    }
}

/// One advertiser's hourly rank series for a keyword/device combination.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RankRecord {
    pub keyword: String,
    pub device: DeviceClass,
    /// Advertiser name.
    pub entity_name: String,
    pub reference_url: String,
    /// Upstream precomputed average; `0` when unknown.
    pub average_rank: f64,
    pub hourly: HourlyRanks,
}

impl RankRecord {
    pub fn new(
        keyword: impl Into<String>,
        device: DeviceClass,
        entity_name: impl Into<String>,
        hourly: HourlyRanks,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            device,
            entity_name: entity_name.into(),
            reference_url: String::new(),
            average_rank: 0.0,
            hourly,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.reference_url = url.into();
        self
    }

    pub fn with_average(mut self, average: f64) -> Self {
        self.average_rank = average;
        self
    }

    /// Decode from a wire-format object, coercing malformed fields.
    pub fn from_wire(row: &Map<String, Value>) -> Self {
        decode_row(row, &WIRE_KEYS)
    }
}

impl Serialize for RankRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5 + HOURS_PER_DAY))?;
        map.serialize_entry(WIRE_KEYS.keyword, &self.keyword)?;
        map.serialize_entry(WIRE_KEYS.device, &self.device)?;
        map.serialize_entry(WIRE_KEYS.entity_name, &self.entity_name)?;
        map.serialize_entry(WIRE_KEYS.reference_url, &self.reference_url)?;
        map.serialize_entry(WIRE_KEYS.average_rank, &self.average_rank)?;
        for hour in 0..HOURS_PER_DAY {
            map.serialize_entry(&wire_hour_key(hour), &self.hourly.raw(hour))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RankRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Object(row) => Ok(RankRecord::from_wire(&row)),
            other => Err(serde::de::Error::custom(format!(
                "rank record must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
