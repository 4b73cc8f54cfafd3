//! Agent-facing HTTP server.
//!
//! Exposes the catalog tools via a JSON HTTP API suitable for integration
//! with MCP-compatible agent layers. All tools are registered in a
//! [`ToolRegistry`] and dispatched through the same `POST /tools/{name}`
//! handler.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/tools/list` | List all registered tools with schemas |
//! | `POST` | `/tools/{name}` | Call any registered tool by name |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! Error responses carry the same status tagging as tool results:
//!
//! ```json
//! { "status": "error", "code": "not_found", "message": "Course 'x' not found" }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `timeout` (408),
//! `fetch_error` (502), `tool_error` (500).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::fetch::HttpFetcher;
use crate::tools::{ToolContext, ToolRegistry};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    tools: Arc<ToolRegistry>,
    ctx: ToolContext,
}

/// Starts the tool server with the production HTTP fetcher.
///
/// Binds to the address configured in `[server].bind` and runs until the
/// process is terminated. One [`crate::cache::Session`] backs all requests,
/// so the catalog cache and preferences live for the server's lifetime.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let fetcher = Arc::new(HttpFetcher::new(&config.catalog)?);
    let ctx = ToolContext::new(Arc::new(config.clone()), fetcher);
    let bind_addr = config.server.bind.clone();

    let registry = ToolRegistry::with_builtins();
    println!("Registered {} tools:", registry.len());
    for t in registry.tools() {
        println!("  POST /tools/{} — {}", t.name(), t.description());
    }

    let app = router(ctx);
    println!("Tool server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the route tree around a prepared [`ToolContext`]. Split out from
/// [`run_server`] so tests can serve it with an injected fetcher on an
/// ephemeral port.
pub fn router(ctx: ToolContext) -> Router {
    let state = AppState {
        tools: Arc::new(ToolRegistry::with_builtins()),
        ctx,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

// ============ Error response ============

/// JSON error body: status-tagged, with a machine code and human message.
#[derive(Serialize)]
struct ErrorBody {
    status: String,
    code: String,
    message: String,
}

/// Internal error type that converts into an HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            status: "error".to_string(),
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn timeout_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::REQUEST_TIMEOUT,
        code: "timeout".to_string(),
        message: message.into(),
    }
}

fn fetch_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        code: "fetch_error".to_string(),
        message: message.into(),
    }
}

fn tool_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "tool_error".to_string(),
        message: message.into(),
    }
}

/// Maps tool execution errors to the most appropriate HTTP status. Built-in
/// tools signal their failure class through message shape, which keeps the
/// `Tool` trait free of a custom error type.
fn classify_tool_error(tool_name: &str, err: anyhow::Error) -> AppError {
    let msg = err.to_string();

    if msg.contains("not found") {
        not_found(msg)
    } else if msg.contains("must not be empty") {
        bad_request(msg)
    } else if msg.contains("timed out") || msg.contains("timeout") {
        timeout_error(format!("{}: {}", tool_name, msg))
    } else if msg.contains("Catalog") || msg.contains("HTTP") {
        fetch_error(format!("{}: {}", tool_name, msg))
    } else {
        tool_error(format!("{}: {}", tool_name, msg))
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /tools/list ============

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Serialize)]
struct ToolListResponse {
    tools: Vec<ToolInfo>,
}

async fn handle_list_tools(State(state): State<AppState>) -> Json<ToolListResponse> {
    let tools = state
        .tools
        .tools()
        .iter()
        .map(|t| ToolInfo {
            name: t.name().to_string(),
            description: t.description().to_string(),
            parameters: t.parameters_schema(),
        })
        .collect();

    Json(ToolListResponse { tools })
}

// ============ POST /tools/{name} ============

async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(params): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let tool = state
        .tools
        .find(&name)
        .ok_or_else(|| not_found(format!("no tool registered with name: {}", name)))?;

    if !params.is_object() && !params.is_null() {
        return Err(bad_request("parameters must be a JSON object"));
    }

    let result = tool
        .execute(params, &state.ctx)
        .await
        .map_err(|e| classify_tool_error(&name, e))?;

    Ok(Json(result))
}
