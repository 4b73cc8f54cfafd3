//! Fuzzy relevance scoring.
//!
//! Matches a free-text query plus optional level/topic filters against a
//! course's precomputed search text. Scoring is additive substring matching —
//! deliberately unclever, since the catalog is small and schema-unstable:
//!
//! - +3 per query token found in the search text
//! - +5 when the whole query appears verbatim (phrase bonus)
//! - +2 when the level filter matches the course level
//! - +2 when the topic filter appears in the search text

use crate::models::Course;

/// Score one course against a query. Total over all inputs; an empty query
/// and absent filters yield 0.
pub fn score(query: &str, course: &Course, level: Option<&str>, topic: Option<&str>) -> f64 {
    let txt = course.search_text.as_str();
    let mut score = 0.0;

    if !query.is_empty() {
        let q = query.to_lowercase();
        for token in tokenize(&q) {
            if txt.contains(&token) {
                score += 3.0;
            }
        }
        if txt.contains(&q) {
            score += 5.0;
        }
    }

    if let Some(level_filter) = level {
        if !level_filter.is_empty() && course.level.contains(&level_filter.to_lowercase()) {
            score += 2.0;
        }
    }

    if let Some(topic_filter) = topic {
        if !topic_filter.is_empty() && txt.contains(&topic_filter.to_lowercase()) {
            score += 2.0;
        }
    }

    score
}

/// Lowercase ASCII-alphanumeric runs; everything else separates.
fn tokenize(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
