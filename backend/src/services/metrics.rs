//! Metrics engine: pure statistics over hourly rank series.
//!
//! Two different averages live here and must not be conflated:
//! [`compute_group_average`] pools every observed hour of a group
//! (sample-weighted), while [`compute_two_stage_average`] first averages each
//! record and then averages those per-record means.

use std::collections::HashSet;

use crate::models::row::hour_label;
use crate::models::{DeviceClass, RankRecord};
use crate::routes::results::{DeviceSummary, HourValue, RecordAnalysis, RecordMetrics};

/// Highest score [`competition_intensity`] can return.
pub const MAX_INTENSITY: u8 = 5;

/// Round to `decimals` places, half away from zero.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Worst/best hour, population variance and mean of one record's observed hours.
///
/// Ties resolve to the earliest hour. A record without observations yields
/// [`RecordMetrics::empty`].
pub fn compute_record_metrics(record: &RankRecord) -> RecordMetrics {
    let observed: Vec<(usize, f64)> = record.hourly.observed().collect();
    let Some(&first) = observed.first() else {
        return RecordMetrics::empty();
    };

    let mut worst = first;
    let mut best = first;
    for &(hour, rank) in &observed[1..] {
        if rank > worst.1 {
            worst = (hour, rank);
        }
        if rank < best.1 {
            best = (hour, rank);
        }
    }

    let values: Vec<f64> = observed.iter().map(|(_, rank)| *rank).collect();
    let average = mean(&values);
    let variance = values
        .iter()
        .map(|v| (v - average).powi(2))
        .sum::<f64>()
        / values.len() as f64;

    RecordMetrics {
        worst_hour: HourValue {
            label: hour_label(worst.0),
            value: worst.1,
        },
        best_hour: HourValue {
            label: hour_label(best.0),
            value: best.1,
        },
        variance,
        non_zero_average: average,
    }
}

/// Mean of one record's observed hours, `0` when none were observed.
pub fn record_average(record: &RankRecord) -> f64 {
    let values: Vec<f64> = record.hourly.observed().map(|(_, rank)| rank).collect();
    mean(&values)
}

/// Sample-weighted mean over every observed hour of every record.
pub fn compute_group_average<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a RankRecord>,
{
    let values: Vec<f64> = records
        .into_iter()
        .flat_map(|record| record.hourly.observed().map(|(_, rank)| rank))
        .collect();
    mean(&values)
}

/// Mean of per-record means. Records without observations do not count.
pub fn compute_two_stage_average<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a RankRecord>,
{
    let per_record: Vec<f64> = records
        .into_iter()
        .filter(|record| !record.hourly.is_empty())
        .map(record_average)
        .collect();
    mean(&per_record)
}

/// Distinct advertisers that have at least one observed hour.
pub fn observed_entity_count<'a, I>(records: I) -> usize
where
    I: IntoIterator<Item = &'a RankRecord>,
{
    records
        .into_iter()
        .filter(|record| !record.hourly.is_empty())
        .map(|record| record.entity_name.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Crowding heuristic in `1..=5`.
///
/// Starts at 1; +1 at 10 entities, +1 more at 20; +1 when the average rank is
/// at most 5, +1 more at most 3. An average of 0 (nothing observed) takes
/// both rank bonuses.
pub fn competition_intensity(entity_count: usize, average_rank: f64) -> u8 {
    let mut intensity: u8 = 1;
    if entity_count >= 10 {
        intensity += 1;
    }
    if entity_count >= 20 {
        intensity += 1;
    }
    if average_rank <= 5.0 {
        intensity += 1;
    }
    if average_rank <= 3.0 {
        intensity += 1;
    }
    intensity.min(MAX_INTENSITY)
}

/// Device-wide summary built from the records of `device` only.
pub fn summarize_device(records: &[RankRecord], device: DeviceClass) -> DeviceSummary {
    let subset: Vec<&RankRecord> = records.iter().filter(|r| r.device == device).collect();
    let advertiser_count = observed_entity_count(subset.iter().copied());
    let average_rank = compute_group_average(subset.iter().copied());

    DeviceSummary {
        device,
        advertiser_count,
        average_rank,
        competition_intensity: competition_intensity(advertiser_count, average_rank),
    }
}

/// Per-record analysis rows shown right after an upload.
pub fn analyze_records(records: &[RankRecord]) -> Vec<RecordAnalysis> {
    records
        .iter()
        .map(|record| {
            let metrics = compute_record_metrics(record);
            RecordAnalysis {
                keyword: record.keyword.clone(),
                device: record.device,
                entity_name: record.entity_name.clone(),
                reference_url: record.reference_url.clone(),
                average: record.average_rank,
                peak_hour: metrics.worst_hour.label,
                lowest_hour: metrics.best_hour.label,
                variance: round_to(metrics.variance, 2),
            }
        })
        .collect()
}
