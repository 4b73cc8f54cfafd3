//! Query operations over the cached catalog.
//!
//! Thin orchestration of [`Session`] + [`score`]: each operation ensures the
//! index is current, then filters, ranks, and projects. These are the same
//! entry points the CLI and the tool server call.

use anyhow::{bail, Result};
use serde::Serialize;

use crate::cache::Session;
use crate::config::Config;
use crate::fetch::CatalogFetcher;
use crate::models::{Course, Preferences, Price};
use crate::score::score;

/// One ranked search result, projected for display.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub slug: Option<String>,
    pub level: String,
    pub price: Price,
    pub categories: Vec<String>,
    pub preview: String,
    pub score: f64,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
    pub total_indexed: usize,
}

#[derive(Debug, Serialize)]
pub struct Recommendations {
    pub recommendations: Vec<SearchHit>,
    pub prefs: Preferences,
}

/// Force a catalog refetch. Returns the new index size.
pub async fn refresh_courses(session: &mut Session, fetcher: &dyn CatalogFetcher) -> Result<usize> {
    session.refresh(fetcher).await
}

/// Rank the catalog against a free-text query and optional level/topic
/// filters. With no query and no filters this degrades to an unranked full
/// listing — that branch is a deliberate browse mode.
pub async fn search_courses(
    session: &mut Session,
    fetcher: &dyn CatalogFetcher,
    config: &Config,
    query: Option<&str>,
    level: Option<&str>,
    topic: Option<&str>,
    max_results: Option<usize>,
) -> Result<SearchResponse> {
    session
        .ensure_index(fetcher, config.catalog.cache_ttl_secs, false)
        .await?;

    let q = query.unwrap_or("");
    let level = level.filter(|s| !s.is_empty());
    let topic = topic.filter(|s| !s.is_empty());
    let unfiltered = q.is_empty() && level.is_none() && topic.is_none();
    let limit = max_results.unwrap_or(config.search.max_results);

    let items = session.items();
    let mut scored: Vec<(f64, &Course)> = items
        .iter()
        .filter_map(|c| {
            let s = score(q, c, level, topic);
            (s > 0.0 || unfiltered).then_some((s, c))
        })
        .collect();

    // Stable sort: equal scores keep index order.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);

    let results = scored
        .into_iter()
        .map(|(s, c)| SearchHit {
            title: c.title.clone(),
            slug: c.slug.clone(),
            level: c.level.clone(),
            price: c.price.clone(),
            categories: c.categories.clone(),
            preview: preview(&c.description, config.search.preview_chars),
            score: s,
        })
        .collect();

    Ok(SearchResponse {
        results,
        total_indexed: items.len(),
    })
}

/// Look up one course by slug or title fragment.
///
/// Exact (case-insensitive) slug equality is tried across the whole index
/// first; only when no slug matches does the title-substring pass run.
pub async fn get_course_detail(
    session: &mut Session,
    fetcher: &dyn CatalogFetcher,
    config: &Config,
    slug_or_title: &str,
) -> Result<Course> {
    session
        .ensure_index(fetcher, config.catalog.cache_ttl_secs, false)
        .await?;

    let target = slug_or_title.trim().to_lowercase();
    let items = session.items();

    if let Some(found) = items
        .iter()
        .find(|c| c.slug.as_deref().is_some_and(|s| s.to_lowercase() == target))
    {
        return Ok(found.clone());
    }

    if let Some(found) = items.iter().find(|c| c.title.to_lowercase().contains(&target)) {
        return Ok(found.clone());
    }

    bail!("Course '{}' not found", slug_or_title)
}

/// Merge the given hints into the session's preference record and return the
/// result. Fields not supplied keep their previous values.
pub fn set_user_pref(
    session: &mut Session,
    topic: Option<String>,
    level: Option<String>,
    budget: Option<String>,
) -> Preferences {
    session.prefs.merge(topic, level, budget);
    session.prefs.clone()
}

/// Recommend courses from the saved preferences: the topic doubles as query
/// and topic filter, the level as level filter.
pub async fn recommend_for_user(
    session: &mut Session,
    fetcher: &dyn CatalogFetcher,
    config: &Config,
    max_results: Option<usize>,
) -> Result<Recommendations> {
    let prefs = session.prefs.clone();
    let limit = max_results.unwrap_or(config.search.recommend_limit);

    let res = search_courses(
        session,
        fetcher,
        config,
        prefs.topic.as_deref(),
        prefs.level.as_deref(),
        prefs.topic.as_deref(),
        Some(limit),
    )
    .await?;

    Ok(Recommendations {
        recommendations: res.results,
        prefs,
    })
}

/// Description preview: first `max_chars` characters with a trailing ellipsis
/// when non-empty. Counts characters, not bytes.
fn preview(description: &str, max_chars: usize) -> String {
    if description.is_empty() {
        return String::new();
    }
    let mut out: String = description.chars().take(max_chars).collect();
    out.push('…');
    out
}
