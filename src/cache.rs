//! Session-scoped catalog cache.
//!
//! [`Session`] owns the mutable state one conversation accumulates: the
//! normalized catalog index and the user's saved preferences. It is passed by
//! handle into every query operation rather than living in a global — the
//! server wraps it in a `Mutex` so the check-fetch-replace sequence can never
//! interleave across concurrent tool calls.

use anyhow::Result;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::fetch::CatalogFetcher;
use crate::models::{CatalogIndex, Course, Preferences};
use crate::normalize::normalize;

/// Wrapper keys tried, in order, when the payload is an object rather than a
/// bare array of records.
const CONTAINER_KEYS: [&str; 3] = ["data", "courses", "items"];

/// Per-session mutable state: catalog index plus user preferences.
#[derive(Default)]
pub struct Session {
    pub index: Option<CatalogIndex>,
    pub prefs: Preferences,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached items, refetching first when the cache is missing,
    /// stale, empty, or a refresh is forced.
    ///
    /// A fetch failure propagates unchanged and leaves any existing index
    /// untouched — stale data is never silently served on error.
    pub async fn ensure_index(
        &mut self,
        fetcher: &dyn CatalogFetcher,
        ttl_secs: u64,
        force_refresh: bool,
    ) -> Result<&[Course]> {
        let fresh = !force_refresh
            && self.index.as_ref().is_some_and(|idx| {
                !idx.items.is_empty()
                    && Utc::now().signed_duration_since(idx.fetched_at)
                        < Duration::seconds(ttl_secs as i64)
            });

        if !fresh {
            let payload = fetcher.fetch().await?;
            let items: Vec<Course> = extract_records(payload).into_iter().map(normalize).collect();
            let count = items.len();
            self.index = Some(CatalogIndex {
                fetched_at: Utc::now(),
                items,
                count,
            });
        }

        match &self.index {
            Some(idx) => Ok(&idx.items),
            None => Ok(&[]),
        }
    }

    /// Force a refetch regardless of cache age. Returns the new item count.
    pub async fn refresh(&mut self, fetcher: &dyn CatalogFetcher) -> Result<usize> {
        // ttl plays no part in a forced refresh.
        let items = self.ensure_index(fetcher, 0, true).await?;
        Ok(items.len())
    }

    /// Items currently indexed, empty if nothing has been fetched yet.
    pub fn items(&self) -> &[Course] {
        self.index.as_ref().map(|i| i.items.as_slice()).unwrap_or(&[])
    }

    pub fn indexed_count(&self) -> usize {
        self.index.as_ref().map(|i| i.count).unwrap_or(0)
    }
}

/// Pull the record list out of the payload. A bare array is used as-is; an
/// object is probed for the first container key holding a non-empty array;
/// anything else yields no records rather than an error.
fn extract_records(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in CONTAINER_KEYS {
                let holds_records = matches!(map.get(key), Some(Value::Array(a)) if !a.is_empty());
                if holds_records {
                    if let Some(Value::Array(items)) = map.remove(key) {
                        return items;
                    }
                }
            }
            Vec::new()
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubFetcher {
        payload: Value,
        calls: AtomicUsize,
    }

    impl StubFetcher {
        fn new(payload: Value) -> Self {
            Self {
                payload,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CatalogFetcher for StubFetcher {
        async fn fetch(&self) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl CatalogFetcher for FailingFetcher {
        async fn fetch(&self) -> Result<Value> {
            bail!("Catalog returned HTTP 500")
        }
    }

    fn aged_index(hours: i64, titles: &[&str]) -> CatalogIndex {
        let items: Vec<Course> = titles
            .iter()
            .map(|t| normalize(json!({ "title": t })))
            .collect();
        let count = items.len();
        CatalogIndex {
            fetched_at: Utc::now() - Duration::hours(hours),
            items,
            count,
        }
    }

    const TTL: u64 = 6 * 3600;

    #[tokio::test]
    async fn test_fresh_cache_skips_fetch() {
        let fetcher = StubFetcher::new(json!([{"title": "New"}]));
        let mut session = Session::new();
        session.index = Some(aged_index(3, &["Cached"]));

        let items = session.ensure_index(&fetcher, TTL, false).await.unwrap();
        assert_eq!(items[0].title, "Cached");
        assert_eq!(fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_stale_cache_triggers_fetch() {
        let fetcher = StubFetcher::new(json!([{"title": "New"}]));
        let mut session = Session::new();
        session.index = Some(aged_index(7, &["Cached"]));

        let items = session.ensure_index(&fetcher, TTL, false).await.unwrap();
        assert_eq!(items[0].title, "New");
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_cache_triggers_fetch() {
        let fetcher = StubFetcher::new(json!([{"title": "New"}]));
        let mut session = Session::new();
        session.index = Some(aged_index(1, &[]));

        let items = session.ensure_index(&fetcher, TTL, false).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(fetcher.call_count(), 1);
    }

    #[tokio::test]
    async fn test_force_refresh_replaces_wholesale() {
        let fetcher = StubFetcher::new(json!([{"title": "A"}, {"title": "B"}]));
        let mut session = Session::new();
        session.index = Some(aged_index(1, &["Old1", "Old2", "Old3"]));

        let count = session.refresh(&fetcher).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(session.indexed_count(), 2);
        assert!(session.items().iter().all(|c| c.title != "Old1"));
    }

    #[tokio::test]
    async fn test_fetch_error_leaves_cache_untouched() {
        let mut session = Session::new();
        session.index = Some(aged_index(7, &["Cached"]));

        let err = session.ensure_index(&FailingFetcher, TTL, false).await;
        assert!(err.is_err());
        assert_eq!(session.items()[0].title, "Cached");
        assert_eq!(session.indexed_count(), 1);
    }

    #[tokio::test]
    async fn test_wrapped_payload_container_keys() {
        let fetcher = StubFetcher::new(json!({"courses": [{"title": "Wrapped"}]}));
        let mut session = Session::new();
        let items = session.ensure_index(&fetcher, TTL, false).await.unwrap();
        assert_eq!(items[0].title, "Wrapped");
    }

    #[tokio::test]
    async fn test_container_priority_order() {
        // "data" wins over "courses" when both hold records.
        let fetcher = StubFetcher::new(json!({
            "courses": [{"title": "FromCourses"}],
            "data": [{"title": "FromData"}]
        }));
        let mut session = Session::new();
        let items = session.ensure_index(&fetcher, TTL, false).await.unwrap();
        assert_eq!(items[0].title, "FromData");
    }

    #[tokio::test]
    async fn test_unrecognized_shape_yields_empty_index() {
        let fetcher = StubFetcher::new(json!({"total": 0, "data": "none"}));
        let mut session = Session::new();
        let items = session.ensure_index(&fetcher, TTL, false).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(session.indexed_count(), 0);
    }

    #[tokio::test]
    async fn test_count_matches_input_records() {
        // Sparse and malformed records still normalize; nothing is dropped.
        let fetcher = StubFetcher::new(json!([{}, {"title": "Ok"}, null, [1, 2]]));
        let mut session = Session::new();
        let items = session.ensure_index(&fetcher, TTL, false).await.unwrap();
        assert_eq!(items.len(), 4);
    }
}
