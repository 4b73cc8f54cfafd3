//! Tool trait and registry for the agent-facing surface.
//!
//! Each catalog operation is exposed as a [`Tool`]: a named, self-describing
//! callable with an OpenAI function-calling parameter schema. The HTTP server
//! lists them on `GET /tools/list` and dispatches `POST /tools/{name}`
//! through the same registry, so an agent layer can discover and invoke them
//! without compile-time knowledge of this crate.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::Session;
use crate::config::Config;
use crate::fetch::CatalogFetcher;
use crate::ops;

/// A callable operation agents can discover and invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, used as the route path (`POST /tools/{name}`).
    fn name(&self) -> &str;

    /// One-line description for agent discovery.
    fn description(&self) -> &str;

    /// OpenAI function-calling JSON Schema for the parameters object.
    fn parameters_schema(&self) -> Value;

    /// Execute with a JSON parameters object. Success payloads carry
    /// `"status": "success"`; failures become tagged error responses at the
    /// server boundary.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

/// Shared state handed to every tool invocation.
///
/// The session sits behind a mutex so the cache's check-fetch-replace
/// sequence is serialized across concurrent tool calls.
#[derive(Clone)]
pub struct ToolContext {
    pub config: Arc<Config>,
    pub session: Arc<Mutex<Session>>,
    pub fetcher: Arc<dyn CatalogFetcher>,
}

impl ToolContext {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn CatalogFetcher>) -> Self {
        Self {
            config,
            session: Arc::new(Mutex::new(Session::new())),
            fetcher,
        }
    }
}

// ============ Built-in tools ============

/// Forced catalog refetch; reports the new index size.
pub struct RefreshCoursesTool;

#[async_trait]
impl Tool for RefreshCoursesTool {
    fn name(&self) -> &str {
        "refresh_courses"
    }

    fn description(&self) -> &str {
        "Refetch the course catalog and rebuild the index"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        let mut session = ctx.session.lock().await;
        let count = ops::refresh_courses(&mut session, ctx.fetcher.as_ref()).await?;
        Ok(json!({ "status": "success", "count": count }))
    }
}

/// Fuzzy catalog search by keyword, level, and topic.
pub struct SearchCoursesTool;

#[async_trait]
impl Tool for SearchCoursesTool {
    fn name(&self) -> &str {
        "search_courses"
    }

    fn description(&self) -> &str {
        "Search courses by keyword, level, or topic"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Free-text keywords, e.g. \"Laravel pemula\"" },
                "level": { "type": "string", "description": "Difficulty label, matched loosely" },
                "topic": { "type": "string", "description": "Specific topic or stack, e.g. \"laravel\", \"react\"" },
                "max_results": { "type": "integer", "description": "Maximum results", "default": 10 }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let query = params["query"].as_str();
        let level = params["level"].as_str();
        let topic = params["topic"].as_str();
        let max_results = params["max_results"].as_u64().map(|n| n as usize);

        let mut session = ctx.session.lock().await;
        let res = ops::search_courses(
            &mut session,
            ctx.fetcher.as_ref(),
            &ctx.config,
            query,
            level,
            topic,
            max_results,
        )
        .await?;

        Ok(json!({
            "status": "success",
            "results": res.results,
            "total_indexed": res.total_indexed,
        }))
    }
}

/// Single-course lookup by slug or title fragment.
pub struct GetCourseDetailTool;

#[async_trait]
impl Tool for GetCourseDetailTool {
    fn name(&self) -> &str {
        "get_course_detail"
    }

    fn description(&self) -> &str {
        "Fetch one course by slug or title"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "slug_or_title": { "type": "string", "description": "Course slug, or a fragment of its title" }
            },
            "required": ["slug_or_title"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let target = params["slug_or_title"].as_str().unwrap_or("");
        if target.trim().is_empty() {
            anyhow::bail!("slug_or_title must not be empty");
        }

        let mut session = ctx.session.lock().await;
        let course =
            ops::get_course_detail(&mut session, ctx.fetcher.as_ref(), &ctx.config, target).await?;

        Ok(json!({ "status": "success", "course": course }))
    }
}

/// Saves user hints for later recommendations.
pub struct SetUserPrefTool;

#[async_trait]
impl Tool for SetUserPrefTool {
    fn name(&self) -> &str {
        "set_user_pref"
    }

    fn description(&self) -> &str {
        "Save user preferences (topic, level, budget) for recommendations"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "topic": { "type": "string", "description": "Preferred topic, e.g. \"laravel\"" },
                "level": { "type": "string", "description": "Preferred difficulty, e.g. \"beginner\"" },
                "budget_hint": { "type": "string", "description": "Budget hint, e.g. \"gratis\"" }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let topic = params["topic"].as_str().map(str::to_string);
        let level = params["level"].as_str().map(str::to_string);
        let budget = params["budget_hint"].as_str().map(str::to_string);

        let mut session = ctx.session.lock().await;
        let saved = ops::set_user_pref(&mut session, topic, level, budget);

        Ok(json!({ "status": "success", "saved": saved }))
    }
}

/// Recommendations from the saved preference record.
pub struct RecommendForUserTool;

#[async_trait]
impl Tool for RecommendForUserTool {
    fn name(&self) -> &str {
        "recommend_for_user"
    }

    fn description(&self) -> &str {
        "Recommend courses based on saved preferences"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "max_results": { "type": "integer", "description": "Maximum recommendations", "default": 5 }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let max_results = params["max_results"].as_u64().map(|n| n as usize);

        let mut session = ctx.session.lock().await;
        let rec =
            ops::recommend_for_user(&mut session, ctx.fetcher.as_ref(), &ctx.config, max_results)
                .await?;

        Ok(json!({
            "status": "success",
            "recommendations": rec.recommendations,
            "prefs": rec.prefs,
        }))
    }
}

// ============ Registry ============

/// Registry of callable tools, dispatched by name.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Registry pre-loaded with the five catalog tools.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(RefreshCoursesTool));
        registry.register(Box::new(SearchCoursesTool));
        registry.register(Box::new(GetCourseDetailTool));
        registry.register(Box::new(SetUserPrefTool));
        registry.register(Box::new(RecommendForUserTool));
        registry
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn tools(&self) -> &[Box<dyn Tool>] {
        &self.tools
    }

    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
