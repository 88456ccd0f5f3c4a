#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use rank_insight::api::{DeviceClass, HourlyRanks, RankRecord};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// Record with ranks observed at the given hours.
pub fn record(
    keyword: &str,
    device: DeviceClass,
    entity: &str,
    observations: &[(usize, f64)],
) -> RankRecord {
    RankRecord::new(
        keyword,
        device,
        entity,
        HourlyRanks::from_observations(observations),
    )
}

/// Record built from a dense 24-slot series where 0 means "not observed".
pub fn dense_record(keyword: &str, device: DeviceClass, entity: &str, ranks: &[f64]) -> RankRecord {
    let observations: Vec<(usize, f64)> = ranks
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, rank)| *rank > 0.0)
        .collect();
    record(keyword, device, entity, &observations)
}

/// Small mixed dataset: two keywords, both device classes, three advertisers.
pub fn sample_dataset() -> Vec<RankRecord> {
    vec![
        record("운동화", DeviceClass::Desktop, "A", &[(9, 1.0), (10, 2.0), (11, 3.0)]),
        record("운동화", DeviceClass::Desktop, "B", &[(9, 4.0), (21, 6.0)]),
        record("운동화", DeviceClass::Mobile, "A", &[(9, 2.0), (12, 2.0)]),
        record("가방", DeviceClass::Mobile, "C", &[(0, 5.0)]),
        record("가방", DeviceClass::Desktop, "C", &[]),
    ]
}
