use super::*;
use serde_json::json;

fn norm(value: Value) -> NormalizedInsight {
    normalize(Some(&value))
}

#[test]
fn test_missing_payload_is_empty() {
    assert!(normalize(None).is_empty());
    assert!(norm(Value::Null).is_empty());
    assert!(norm(json!("just prose")).is_empty());
    assert!(norm(json!([1, 2, 3])).is_empty());
}

#[test]
fn test_single_string_becomes_one_item() {
    let insight = norm(json!({ "action_items": "single" }));
    assert_eq!(insight.action_items, vec!["single".to_string()]);
}

#[test]
fn test_null_list_is_empty() {
    let insight = norm(json!({ "action_items": null }));
    assert!(insight.action_items.is_empty());
}

#[test]
fn test_list_drops_empty_entries() {
    let insight = norm(json!({
        "overall_health": ["a", "", null, "b", 0, 3],
        "media_asymmetry": { "not": "a list" }
    }));
    assert_eq!(insight.overall, vec!["a", "b", "3"]);
    assert!(insight.media_asymmetry.is_empty());
}

#[test]
fn test_keyed_competitor_groups_preserve_order() {
    let insight = norm(json!({
        "competitor_dynamics": { "A": ["x", "y"], "B": "z" }
    }));
    assert_eq!(insight.competitor_groups.len(), 2);
    assert_eq!(insight.competitor_groups[0].label, "A");
    assert_eq!(insight.competitor_groups[0].items, vec!["x", "y"]);
    assert_eq!(insight.competitor_groups[1].label, "B");
    assert_eq!(insight.competitor_groups[1].items, vec!["z"]);
}

#[test]
fn test_flat_competitor_list_is_wrapped() {
    let insight = norm(json!({ "competitor_dynamics": ["x", "", "y"] }));
    assert_eq!(insight.competitor_groups.len(), 1);
    assert_eq!(insight.competitor_groups[0].label, FLAT_COMPETITOR_LABEL);
    assert_eq!(insight.competitor_groups[0].items, vec!["x", "y"]);
}

#[test]
fn test_competitor_group_with_unusable_value_is_empty() {
    let insight = norm(json!({ "competitor_dynamics": { "A": 5, "B": null } }));
    assert_eq!(insight.competitor_groups.len(), 2);
    assert!(insight.competitor_groups.iter().all(|g| g.items.is_empty()));

    let bare = norm(json!({ "competitor_dynamics": "prose" }));
    assert!(bare.competitor_groups.is_empty());
}

#[test]
fn test_golden_windows_keyed() {
    let insight = norm(json!({
        "golden_time": {
            "새벽": ["02시", "03시"],
            "오후": "14시~16시",
            "저녁": "",
            "심야": 7
        }
    }));
    let windows = &insight.golden_windows;
    assert_eq!(windows.len(), 4);
    assert_eq!(windows[0].value, "02시\n03시");
    assert_eq!(windows[1].label, "오후");
    assert_eq!(windows[1].value, "14시~16시");
    assert_eq!(windows[2].value, EMPTY_VALUE);
    assert_eq!(windows[3].value, EMPTY_VALUE);
}

#[test]
fn test_golden_windows_list_and_string() {
    let insight = norm(json!({ "golden_time": [["a", "b"], "c"] }));
    assert_eq!(insight.golden_windows[0].label, "구간 1");
    assert_eq!(insight.golden_windows[0].value, "a\nb");
    assert_eq!(insight.golden_windows[1].label, "구간 2");
    assert_eq!(insight.golden_windows[1].value, "c");

    let mixed = norm(json!({ "golden_time": [null, 7, {}] }));
    assert_eq!(mixed.golden_windows[0].value, "null");
    assert_eq!(mixed.golden_windows[1].value, "7");
    assert_eq!(mixed.golden_windows[2].value, EMPTY_VALUE);

    let bare = norm(json!({ "golden_time": "새벽 2시" }));
    assert_eq!(bare.golden_windows.len(), 1);
    assert_eq!(bare.golden_windows[0].label, BARE_WINDOW_LABEL);
    assert_eq!(bare.golden_windows[0].value, "새벽 2시");
}

#[test]
fn test_envelope_is_unwrapped() {
    let insight = norm(json!({
        "insight": { "overall_health": ["ok"], "golden_time": null }
    }));
    assert_eq!(insight.overall, vec!["ok"]);
    assert!(insight.golden_windows.is_empty());
}

#[test]
fn test_classify_variants() {
    assert_eq!(RawField::classify(None), RawField::Absent);
    assert_eq!(RawField::classify(Some(&Value::Null)), RawField::Absent);
    assert!(matches!(RawField::classify(Some(&json!("s"))), RawField::Text("s")));
    assert!(matches!(RawField::classify(Some(&json!([]))), RawField::List(_)));
    assert!(matches!(RawField::classify(Some(&json!({}))), RawField::Keyed(_)));
    assert!(matches!(RawField::classify(Some(&json!(true))), RawField::Other(_)));
}
