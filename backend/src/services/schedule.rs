//! Parsing of the hour-by-hour rank-schedule recommendation.

use serde_json::Value;

use super::insight::{keys::WRAPPER, text_list};
use crate::models::HOURS_PER_DAY;
use crate::routes::insight::RankScheduleRecommendation;

pub const SCHEDULE_KEY: &str = "optimalRankSchedule";
pub const REASON_KEY: &str = "optimalRankScheduleReason";

/// Target used for any hour without a usable value.
pub const DEFAULT_TARGET_RANK: u32 = 1;

/// Key of one hour in the schedule map (`hour00` … `hour23`).
pub fn schedule_hour_key(hour: usize) -> String {
    format!("hour{:02}", hour)
}

/// Leading-integer parse: optional whitespace, optional sign, then digits.
/// Trailing text is ignored; no digits yields `None`. Out-of-range digit
/// runs saturate.
fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let signed = if negative {
        format!("-{}", digits)
    } else {
        digits
    };
    Some(signed.parse::<i64>().unwrap_or(if negative { i64::MIN } else { i64::MAX }))
}

/// Coerce one schedule value to a positive rank, falling back to
/// [`DEFAULT_TARGET_RANK`].
pub fn coerce_target_rank(value: Option<&Value>) -> u32 {
    let parsed = match value {
        Some(Value::String(s)) => parse_leading_int(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v.trunc() as i64)),
        _ => None,
    };
    match parsed {
        Some(rank) if rank > 0 => u32::try_from(rank).unwrap_or(u32::MAX),
        _ => DEFAULT_TARGET_RANK,
    }
}

/// Build a recommendation from the model's JSON object. Accepts the object
/// itself or a `{ "insight": ... }` envelope; never fails.
pub fn parse_recommendation(raw: Option<&Value>) -> RankScheduleRecommendation {
    let fields = match raw {
        Some(Value::Object(map)) => match map.get(WRAPPER) {
            Some(Value::Object(inner)) => Some(inner),
            _ => Some(map),
        },
        _ => None,
    };
    let Some(fields) = fields else {
        return RankScheduleRecommendation::default();
    };

    let schedule = fields.get(SCHEDULE_KEY).and_then(Value::as_object);
    let mut target_rank_by_hour = [DEFAULT_TARGET_RANK; HOURS_PER_DAY];
    for (hour, target) in target_rank_by_hour.iter_mut().enumerate() {
        *target = coerce_target_rank(schedule.and_then(|s| s.get(&schedule_hour_key(hour))));
    }

    RankScheduleRecommendation {
        target_rank_by_hour,
        rationale: text_list(fields.get(REASON_KEY)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unparsable_and_negative_default_to_one() {
        let raw = json!({
            "optimalRankSchedule": { "hour00": "abc", "hour05": "-3", "hour06": "0" }
        });
        let rec = parse_recommendation(Some(&raw));
        assert_eq!(rec.target_rank_by_hour[0], 1);
        assert_eq!(rec.target_rank_by_hour[5], 1);
        assert_eq!(rec.target_rank_by_hour[6], 1);
        // missing hours
        assert_eq!(rec.target_rank_by_hour[23], 1);
    }

    #[test]
    fn test_leading_integer_semantics() {
        assert_eq!(coerce_target_rank(Some(&json!("3"))), 3);
        assert_eq!(coerce_target_rank(Some(&json!(" 4위"))), 4);
        assert_eq!(coerce_target_rank(Some(&json!("2.7"))), 2);
        assert_eq!(coerce_target_rank(Some(&json!("+6"))), 6);
        assert_eq!(coerce_target_rank(Some(&json!(7))), 7);
        assert_eq!(coerce_target_rank(Some(&json!(2.9))), 2);
        assert_eq!(coerce_target_rank(Some(&json!(null))), 1);
        assert_eq!(coerce_target_rank(None), 1);
    }

    #[test]
    fn test_oversized_values_saturate() {
        assert_eq!(parse_leading_int("99999999999999999999"), Some(i64::MAX));
        assert_eq!(parse_leading_int("-99999999999999999999"), Some(i64::MIN));
        assert_eq!(parse_leading_int("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(
            coerce_target_rank(Some(&json!("99999999999999999999"))),
            u32::MAX
        );
        assert_eq!(coerce_target_rank(Some(&json!("5000000000위"))), u32::MAX);
        assert_eq!(coerce_target_rank(Some(&json!("-99999999999999999999"))), 1);
        assert_eq!(coerce_target_rank(Some(&json!(1e30))), u32::MAX);
    }

    #[test]
    fn test_full_schedule_with_envelope() {
        let mut schedule = serde_json::Map::new();
        for hour in 0..HOURS_PER_DAY {
            schedule.insert(schedule_hour_key(hour), json!((hour % 5 + 1).to_string()));
        }
        let raw = json!({
            "insight": {
                "optimalRankSchedule": schedule,
                "optimalRankScheduleReason": ["새벽 경쟁 약함", ""]
            }
        });
        let rec = parse_recommendation(Some(&raw));
        assert_eq!(rec.target_rank_by_hour[0], 1);
        assert_eq!(rec.target_rank_by_hour[4], 5);
        assert_eq!(rec.target_rank_by_hour[7], 3);
        assert_eq!(rec.rationale, vec!["새벽 경쟁 약함"]);
    }

    #[test]
    fn test_non_object_yields_default() {
        assert_eq!(
            parse_recommendation(Some(&json!("nope"))),
            RankScheduleRecommendation::default()
        );
        assert_eq!(parse_recommendation(None), RankScheduleRecommendation::default());
    }
}
