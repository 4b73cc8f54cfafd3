//! End-to-end pipeline tests: messy payload in, ranked answers out.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use course_scout::cache::Session;
use course_scout::config::Config;
use course_scout::fetch::CatalogFetcher;
use course_scout::models::Price;
use course_scout::normalize::normalize;
use course_scout::ops;
use course_scout::score::score;

struct StubFetcher(Value);

#[async_trait]
impl CatalogFetcher for StubFetcher {
    async fn fetch(&self) -> Result<Value> {
        Ok(self.0.clone())
    }
}

fn test_config() -> Config {
    toml::from_str(
        r#"[catalog]
url = "https://api.example.com/course?page=1&limit=1000"

[server]
bind = "127.0.0.1:0"
"#,
    )
    .unwrap()
}

/// A payload in the worst shape real sources deliver: wrapped container,
/// fields renamed, nested under `data`/`attributes`, sparse records.
fn messy_payload() -> Value {
    json!({
        "total": 5,
        "data": [
            {
                "course_title": "Belajar Laravel untuk Pemula",
                "permalink": "belajar-laravel",
                "intro": "Framework PHP paling populer, dari instalasi sampai deploy.",
                "difficulty": "Beginner",
                "harga": 150000,
                "tags": ["Laravel", "PHP", "Web"]
            },
            {
                "data": {
                    "title": "Mastering React Hooks",
                    "slug": "mastering-react-hooks",
                    "description": "State management modern dengan React."
                },
                "attributes": { "level": "Intermediate", "price": "Rp 200.000" }
            },
            {
                "title": "Belajar PHP Dasar",
                "summary": "Kursus PHP untuk pemula.",
                "category": "PHP"
            },
            {},
            { "name": "Kelas Tanpa Apa-apa", "level": null, "price": "" }
        ]
    })
}

#[tokio::test]
async fn test_messy_payload_normalizes_and_ranks() {
    let fetcher = StubFetcher(messy_payload());
    let cfg = test_config();
    let mut session = Session::new();

    let res = ops::search_courses(&mut session, &fetcher, &cfg, Some("laravel"), None, None, None)
        .await
        .unwrap();

    assert_eq!(res.total_indexed, 5);
    assert_eq!(res.results[0].title, "Belajar Laravel untuk Pemula");
    assert_eq!(res.results[0].slug.as_deref(), Some("belajar-laravel"));
    assert_eq!(res.results[0].level, "beginner");
    assert_eq!(res.results[0].price, Price::Number(150000.into()));
    assert!(res.results[0].preview.ends_with('…'));
}

#[tokio::test]
async fn test_nested_record_resolves_through_flattened_paths() {
    let fetcher = StubFetcher(messy_payload());
    let cfg = test_config();
    let mut session = Session::new();

    let course = ops::get_course_detail(&mut session, &fetcher, &cfg, "mastering-react-hooks")
        .await
        .unwrap();
    assert_eq!(course.title, "Mastering React Hooks");
    assert_eq!(course.level, "intermediate");
    assert_eq!(course.price, Price::Text("Rp 200.000".into()));
}

#[tokio::test]
async fn test_sparse_records_degrade_to_defaults() {
    let fetcher = StubFetcher(messy_payload());
    let cfg = test_config();
    let mut session = Session::new();

    let res = ops::search_courses(&mut session, &fetcher, &cfg, None, None, None, None)
        .await
        .unwrap();
    assert!(res
        .results
        .iter()
        .any(|r| r.title == "Untitled Course" && r.slug.is_none()));
    // "" price is empty, so it falls through to absent.
    let bare = res
        .results
        .iter()
        .find(|r| r.title == "Kelas Tanpa Apa-apa")
        .unwrap();
    assert_eq!(bare.price, Price::Absent);
}

#[tokio::test]
async fn test_session_serves_fresh_cache_across_queries() {
    let fetcher = StubFetcher(messy_payload());
    let cfg = test_config();
    let mut session = Session::new();

    ops::refresh_courses(&mut session, &fetcher).await.unwrap();
    let fetched_at = session.index.as_ref().unwrap().fetched_at;

    // Subsequent queries reuse the index without touching the fetcher.
    ops::search_courses(&mut session, &fetcher, &cfg, Some("php"), None, None, None)
        .await
        .unwrap();
    ops::get_course_detail(&mut session, &fetcher, &cfg, "belajar-laravel")
        .await
        .unwrap();
    assert_eq!(session.index.as_ref().unwrap().fetched_at, fetched_at);
}

#[tokio::test]
async fn test_stale_session_refetches_on_next_query() {
    let fetcher = StubFetcher(messy_payload());
    let cfg = test_config();
    let mut session = Session::new();

    ops::refresh_courses(&mut session, &fetcher).await.unwrap();
    session.index.as_mut().unwrap().fetched_at = Utc::now() - Duration::hours(7);
    let stale_stamp = session.index.as_ref().unwrap().fetched_at;

    ops::search_courses(&mut session, &fetcher, &cfg, Some("php"), None, None, None)
        .await
        .unwrap();
    assert!(session.index.as_ref().unwrap().fetched_at > stale_stamp);
}

#[test]
fn test_score_monotonicity_over_search_text() {
    let course = normalize(json!({"title": "Belajar Laravel", "categories": ["Laravel"]}));
    assert!(score("laravel", &course, None, None) >= 3.0);

    // A full-phrase match always includes the +5 bonus on top of tokens.
    let with_phrase = score("belajar laravel", &course, None, None);
    let tokens_only = score("belajar nuxt", &course, None, None);
    assert!(with_phrase >= tokens_only + 5.0);
}

#[test]
fn test_flatten_leaf_cardinality_matches_source() {
    use course_scout::flatten::flatten;

    let v = json!({
        "a": {"b": [1, 2, {"c": "x"}]},
        "d": null,
        "e": "y"
    });
    // Leaves: 1, 2, "x", null, "y"
    assert_eq!(flatten(&v).len(), 5);
}
