//! Property tests for the metrics engine.

use proptest::prelude::*;
use rank_insight::api::{DeviceClass, HourlyRanks, RankRecord, HOURS_PER_DAY};
use rank_insight::services::metrics::{
    compute_group_average, compute_record_metrics, compute_two_stage_average,
    competition_intensity, MAX_INTENSITY,
};

fn hourly_slots() -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(prop::option::of(1u32..=15).prop_map(|r| r.map(f64::from)), HOURS_PER_DAY)
}

fn to_record(slots: &[Option<f64>]) -> RankRecord {
    let observations: Vec<(usize, f64)> = slots
        .iter()
        .enumerate()
        .filter_map(|(hour, rank)| rank.map(|r| (hour, r)))
        .collect();
    RankRecord::new(
        "k",
        DeviceClass::Desktop,
        "A",
        HourlyRanks::from_observations(&observations),
    )
}

proptest! {
    #[test]
    fn worst_hour_never_below_best_hour(slots in hourly_slots()) {
        let record = to_record(&slots);
        let metrics = compute_record_metrics(&record);

        if slots.iter().all(Option::is_none) {
            prop_assert!(metrics.worst_hour.is_empty());
            prop_assert!(metrics.best_hour.is_empty());
            prop_assert_eq!(metrics.variance, 0.0);
        } else {
            prop_assert!(metrics.worst_hour.value >= metrics.best_hour.value);
            prop_assert!(metrics.best_hour.value > 0.0);
            prop_assert!(metrics.variance >= 0.0);
        }
    }

    #[test]
    fn extreme_hours_come_from_observed_slots(slots in hourly_slots()) {
        let record = to_record(&slots);
        let metrics = compute_record_metrics(&record);
        for hour in [&metrics.worst_hour, &metrics.best_hour] {
            if hour.is_empty() {
                continue;
            }
            let index: usize = hour.label.trim_end_matches('시').parse().unwrap();
            prop_assert_eq!(slots[index], Some(hour.value));
        }
    }

    #[test]
    fn group_averages_stay_within_observed_range(
        groups in prop::collection::vec(hourly_slots(), 1..6)
    ) {
        let records: Vec<RankRecord> = groups.iter().map(|s| to_record(s)).collect();
        let observed: Vec<f64> = groups.iter().flatten().flatten().copied().collect();
        let flat = compute_group_average(&records);
        let two_stage = compute_two_stage_average(&records);

        if observed.is_empty() {
            prop_assert_eq!(flat, 0.0);
            prop_assert_eq!(two_stage, 0.0);
        } else {
            let min = observed.iter().copied().fold(f64::INFINITY, f64::min);
            let max = observed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(flat >= min - 1e-9 && flat <= max + 1e-9);
            prop_assert!(two_stage >= min - 1e-9 && two_stage <= max + 1e-9);
        }
    }

    #[test]
    fn intensity_is_bounded(count in 0usize..50, average in 0.0f64..20.0) {
        prop_assert!(competition_intensity(count, average) <= MAX_INTENSITY);
    }
}

#[test]
fn flattened_and_two_stage_averages_differ_on_uneven_records() {
    let records = vec![
        RankRecord::new(
            "k",
            DeviceClass::Desktop,
            "A",
            HourlyRanks::from_observations(&[(0, 2.0), (1, 4.0)]),
        ),
        RankRecord::new(
            "k",
            DeviceClass::Desktop,
            "B",
            HourlyRanks::from_observations(&[(5, 10.0)]),
        ),
    ];
    assert!((compute_group_average(&records) - 16.0 / 3.0).abs() < 1e-9);
    assert!((compute_two_stage_average(&records) - 6.5).abs() < 1e-9);
}

#[test]
fn tie_on_worst_rank_keeps_earliest_hour() {
    let record = RankRecord::new(
        "k",
        DeviceClass::Mobile,
        "A",
        HourlyRanks::from_observations(&[(3, 7.0), (8, 7.0), (12, 1.0)]),
    );
    let metrics = compute_record_metrics(&record);
    assert_eq!(metrics.worst_hour.label, "03시");
    assert_eq!(metrics.best_hour.label, "12시");
}
