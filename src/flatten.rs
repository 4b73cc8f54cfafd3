//! Recursive JSON flattening.
//!
//! Converts an arbitrarily nested JSON value into a flat map from dot-joined
//! path strings to scalar leaves (`"attributes.price"`, `"tags.0"`). The
//! normalizer uses this to resolve fields that sources bury at different
//! depths, without caring where exactly they live.

use serde_json::Value;
use std::collections::BTreeMap;

/// Nesting depth past which a subtree is emitted as a single leaf instead of
/// being descended into. Keeps adversarially deep payloads off the stack.
const MAX_DEPTH: usize = 64;

/// Flatten a JSON value into `path -> scalar` entries.
///
/// Object keys and array indices become dot-joined path segments. Null leaves
/// are kept as-is (callers decide what counts as empty). Empty objects and
/// arrays contribute no entries. Never fails.
pub fn flatten(value: &Value) -> BTreeMap<String, Value> {
    let mut out = BTreeMap::new();
    flatten_into(value, String::new(), 0, &mut out);
    out
}

fn flatten_into(value: &Value, prefix: String, depth: usize, out: &mut BTreeMap<String, Value>) {
    if depth >= MAX_DEPTH {
        out.insert(prefix, value.clone());
        return;
    }
    match value {
        Value::Object(map) => {
            for (k, v) in map {
                flatten_into(v, join(&prefix, k), depth + 1, out);
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_into(v, join(&prefix, &i.to_string()), depth + 1, out);
            }
        }
        scalar => {
            out.insert(prefix, scalar.clone());
        }
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
