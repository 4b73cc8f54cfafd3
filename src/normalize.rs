//! Raw record → [`Course`] normalization.
//!
//! The catalog API does not commit to a schema, so no exact field names are
//! assumed. Each logical field is resolved through a fixed candidate list —
//! first against the record's top-level keys, then against dotted paths in
//! its flattened form — and falls back to a default. Normalization is total:
//! any JSON value in, a usable [`Course`] out.

use serde_json::Value;

use crate::fields::{pick_first, pick_first_flat};
use crate::flatten::flatten;
use crate::models::{Course, Price};

/// Placeholder title for records that carry none.
pub const UNTITLED: &str = "Untitled Course";

/// String form of any JSON value: strings unquoted, null empty, containers
/// serialized compactly.
pub fn as_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Normalize one raw catalog record. Never fails; missing or malformed
/// fields degrade to defaults.
pub fn normalize(raw: Value) -> Course {
    let empty = serde_json::Map::new();
    let obj = raw.as_object().unwrap_or(&empty);
    let flat = flatten(&raw);

    let title = pick_first(obj, &["title", "name", "course_title"])
        .or_else(|| pick_first_flat(&flat, &["data.title", "attributes.title"]))
        .map(as_text)
        .unwrap_or_else(|| UNTITLED.to_string());

    let slug = pick_first(obj, &["slug", "permalink"])
        .or_else(|| pick_first_flat(&flat, &["data.slug", "attributes.slug"]))
        .map(as_text);

    let description = pick_first(obj, &["description", "intro", "summary"])
        .or_else(|| pick_first_flat(&flat, &["data.description", "attributes.description"]))
        .map(as_text)
        .unwrap_or_default();

    let level = pick_first(obj, &["level", "difficulty"])
        .or_else(|| pick_first_flat(&flat, &["attributes.level"]))
        .map(|v| as_text(v).to_lowercase())
        .unwrap_or_default();

    let price_value = pick_first(obj, &["price", "harga"])
        .or_else(|| pick_first_flat(&flat, &["attributes.price"]))
        .cloned();
    let price_text = price_value.as_ref().map(|v| as_text(v)).unwrap_or_default();
    let price = to_price(price_value);

    let categories = pick_first(obj, &["categories", "category", "tags"])
        .map(to_categories)
        .unwrap_or_default();

    let joined_categories = categories.join(" ");
    let raw_text = as_text(&raw);
    let search_text = [
        title.as_str(),
        description.as_str(),
        level.as_str(),
        joined_categories.as_str(),
        price_text.as_str(),
        raw_text.as_str(),
    ]
    .join(" ")
    .to_lowercase();

    Course {
        title,
        slug,
        description,
        level,
        categories,
        price,
        raw,
        search_text,
    }
}

fn to_price(v: Option<Value>) -> Price {
    match v {
        None => Price::Absent,
        Some(Value::Number(n)) => Price::Number(n),
        Some(Value::String(s)) => Price::Text(s),
        Some(other) => Price::Text(as_text(&other)),
    }
}

/// A bare string becomes a one-element list; list elements are stringified.
fn to_categories(v: &Value) -> Vec<String> {
    match v {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().map(as_text).collect(),
        other => vec![as_text(other)],
    }
}
