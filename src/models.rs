//! Core data models used throughout Course Scout.
//!
//! These types represent the normalized courses, cached catalog index, and
//! user preferences that flow through the fetch → normalize → query pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Course price as delivered by the source, passed through unvalidated.
///
/// The catalog API guarantees nothing about this field's type, so it is kept
/// as a closed variant and never examined by scoring or display paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Price {
    /// No usable price field on the record. Serializes as `null`.
    Absent,
    Number(serde_json::Number),
    Text(String),
}

impl Price {
    pub fn is_absent(&self) -> bool {
        matches!(self, Price::Absent)
    }
}

/// Normalized course: the stable shape the rest of the system depends on.
///
/// Built once per raw record during a catalog refresh, immutable afterwards,
/// and replaced wholesale on the next refresh.
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    /// Course title; `"Untitled Course"` when the source omits one.
    pub title: String,
    /// Stable identifier when the source provides one; sources drop it often
    /// enough that it stays optional.
    pub slug: Option<String>,
    pub description: String,
    /// Lowercased difficulty label; empty when absent.
    pub level: String,
    pub categories: Vec<String>,
    pub price: Price,
    /// The original record, retained for downstream inspection.
    pub raw: Value,
    /// Lowercase concatenation of every displayable field plus the serialized
    /// raw record. This is the surface the scorer matches against.
    pub search_text: String,
}

/// Catalog index entry held in session state.
#[derive(Debug, Clone)]
pub struct CatalogIndex {
    pub fetched_at: DateTime<Utc>,
    pub items: Vec<Course>,
    pub count: usize,
}

/// Saved user hints, merged field-wise across updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
}

impl Preferences {
    /// Merge non-null updates into the stored record. Omitted fields keep
    /// their previous values.
    pub fn merge(&mut self, topic: Option<String>, level: Option<String>, budget: Option<String>) {
        if let Some(t) = topic {
            self.topic = Some(t);
        }
        if let Some(l) = level {
            self.level = Some(l);
        }
        if let Some(b) = budget {
            self.budget = Some(b);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.level.is_none() && self.budget.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_merge_keeps_prior_fields() {
        let mut prefs = Preferences::default();
        prefs.merge(Some("react".into()), None, None);
        prefs.merge(None, Some("beginner".into()), None);
        assert_eq!(prefs.topic.as_deref(), Some("react"));
        assert_eq!(prefs.level.as_deref(), Some("beginner"));
        assert_eq!(prefs.budget, None);
    }

    #[test]
    fn test_preferences_merge_overwrites_same_field() {
        let mut prefs = Preferences::default();
        prefs.merge(Some("react".into()), None, None);
        prefs.merge(Some("laravel".into()), None, Some("free".into()));
        assert_eq!(prefs.topic.as_deref(), Some("laravel"));
        assert_eq!(prefs.budget.as_deref(), Some("free"));
    }

    #[test]
    fn test_price_serializes_transparently() {
        assert_eq!(serde_json::to_value(Price::Absent).unwrap(), Value::Null);
        assert_eq!(
            serde_json::to_value(Price::Number(150000.into())).unwrap(),
            serde_json::json!(150000)
        );
        assert_eq!(
            serde_json::to_value(Price::Text("gratis".into())).unwrap(),
            serde_json::json!("gratis")
        );
    }
}
