//! Prioritized field lookup over untrusted JSON records.
//!
//! Catalog sources rename and move fields between releases, so nothing here
//! assumes exact field names. [`pick_first`] walks an ordered candidate list
//! and returns the first key that is present and non-empty; absence is a
//! normal outcome, not an error.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Returns the first candidate key whose value is present and non-empty.
pub fn pick_first<'a>(record: &'a Map<String, Value>, candidates: &[&str]) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|k| record.get(*k).filter(|v| !is_empty(v)))
}

/// [`pick_first`] over a flattened record, where candidates are dotted paths.
pub fn pick_first_flat<'a>(
    flat: &'a BTreeMap<String, Value>,
    candidates: &[&str],
) -> Option<&'a Value> {
    candidates
        .iter()
        .find_map(|k| flat.get(*k).filter(|v| !is_empty(v)))
}

/// Null, the empty string, and the empty array all count as "not there".
fn is_empty(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_pick_first_respects_order() {
        let r = record(json!({"name": "B", "title": "A"}));
        assert_eq!(pick_first(&r, &["title", "name"]), Some(&json!("A")));
        assert_eq!(pick_first(&r, &["name", "title"]), Some(&json!("B")));
    }

    #[test]
    fn test_pick_first_skips_empty_values() {
        let r = record(json!({"title": "", "name": null, "course_title": "Rust 101"}));
        assert_eq!(
            pick_first(&r, &["title", "name", "course_title"]),
            Some(&json!("Rust 101"))
        );
    }

    #[test]
    fn test_pick_first_skips_empty_array() {
        let r = record(json!({"categories": [], "tags": ["web"]}));
        assert_eq!(
            pick_first(&r, &["categories", "tags"]),
            Some(&json!(["web"]))
        );
    }

    #[test]
    fn test_pick_first_absent_is_none() {
        let r = record(json!({"other": 1}));
        assert_eq!(pick_first(&r, &["title", "name"]), None);
    }

    #[test]
    fn test_pick_first_flat_dotted_paths() {
        let flat = crate::flatten::flatten(&json!({"attributes": {"level": "beginner"}}));
        assert_eq!(
            pick_first_flat(&flat, &["level", "attributes.level"]),
            Some(&json!("beginner"))
        );
    }

    #[test]
    fn test_zero_and_false_are_present() {
        let r = record(json!({"price": 0, "active": false}));
        assert_eq!(pick_first(&r, &["price"]), Some(&json!(0)));
        assert_eq!(pick_first(&r, &["active"]), Some(&json!(false)));
    }
}
