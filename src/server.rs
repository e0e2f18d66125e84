//! Serving the query tools.
//!
//! Two transports are supported:
//!
//! * **stdio**: the MCP server speaks JSON-RPC over stdin/stdout. This is
//!   what MCP clients launch as a subprocess.
//! * **HTTP**: an Axum server exposing MCP (streamable HTTP) at `/mcp`
//!   next to plain JSON routes.
//!
//! # HTTP Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/tools/list` | List all registered tools with schemas |
//! | `POST` | `/tools/{name}` | Call a tool by name |
//! | `GET`  | `/health` | Health check (returns version and source) |
//! | `*`    | `/mcp` | MCP streamable HTTP endpoint |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Endpoint not found: GET /nope" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404),
//! `upstream_error` (502), `tool_error` (500).
//!
//! # Client Integration
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "api-knowledge": {
//!       "command": "apik",
//!       "args": ["serve", "stdio"],
//!       "env": { "SWAGGER_URL": "http://localhost:3000/api-json" }
//!     }
//!   }
//! }
//! ```

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rmcp::transport::streamable_http_server::{
    session::local::LocalSessionManager, StreamableHttpService,
};
use rmcp::ServiceExt;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use api_knowledge_core::NotFound;

use crate::config::Config;
use crate::engine::KnowledgeIndex;
use crate::error::FetchError;
use crate::mcp::McpBridge;
use crate::traits::{validate_params, ToolContext, ToolRegistry};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
struct AppState {
    ctx: ToolContext,
    tools: Arc<ToolRegistry>,
}

fn build_context(config: &Config) -> anyhow::Result<ToolContext> {
    let index = KnowledgeIndex::from_config(config)?;
    info!(source = %index.source(), "API document source configured");
    Ok(ToolContext::new(Arc::new(index)))
}

/// Runs the MCP server over stdin/stdout until the client disconnects.
pub async fn run_stdio(config: &Config) -> anyhow::Result<()> {
    run_stdio_with_tools(config, ToolRegistry::with_builtins()).await
}

/// Like [`run_stdio`], serving a caller-supplied tool set.
pub async fn run_stdio_with_tools(config: &Config, tools: ToolRegistry) -> anyhow::Result<()> {
    let bridge = McpBridge::new(build_context(config)?, Arc::new(tools));

    info!("API Knowledge MCP server running on stdio");
    let service = bridge.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}

/// Starts the HTTP server on `[server].bind` and runs until terminated.
pub async fn run_http(config: &Config) -> anyhow::Result<()> {
    run_http_with_tools(config, ToolRegistry::with_builtins()).await
}

/// Like [`run_http`], serving a caller-supplied tool set.
pub async fn run_http_with_tools(config: &Config, tools: ToolRegistry) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState {
        ctx: build_context(config)?,
        tools: Arc::new(tools),
    };

    for t in state.tools.tools() {
        info!(tool = t.name(), "registered POST /tools/{}", t.name());
    }

    let app = router(state);
    info!("API Knowledge server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let bridge = McpBridge::new(state.ctx.clone(), state.tools.clone());
    let mcp_service = StreamableHttpService::new(
        move || Ok(bridge.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tools/list", get(handle_list_tools))
        .route("/tools/{name}", post(handle_tool_call))
        .route("/health", get(handle_health))
        .with_state(state)
        .nest_service("/mcp", mcp_service)
        .layer(cors)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (e.g., `"bad_request"`, `"not_found"`).
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn app_error(status: StatusCode, code: &str, message: impl Into<String>) -> AppError {
    AppError {
        status,
        code: code.to_string(),
        message: message.into(),
    }
}

/// Map a tool failure to a status code by its error type.
fn classify_tool_error(tool_name: &str, err: anyhow::Error) -> AppError {
    if err.downcast_ref::<NotFound>().is_some() {
        app_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
    } else if err.downcast_ref::<FetchError>().is_some() {
        app_error(
            StatusCode::BAD_GATEWAY,
            "upstream_error",
            format!("{}: {}", tool_name, err),
        )
    } else {
        app_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "tool_error",
            format!("{}: {}", tool_name, err),
        )
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    source: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        source: state.ctx.index().source(),
    })
}

// ============ GET /tools/list ============

#[derive(Serialize)]
struct ToolInfo {
    name: String,
    description: String,
    builtin: bool,
    parameters: serde_json::Value,
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
            builtin: t.is_builtin(),
            parameters: t.parameters_schema(),
        })
        .collect();
    Json(ToolListResponse { tools })
}

// ============ POST /tools/{name} ============

/// Validates the JSON body against the tool's schema and runs it.
///
/// Returns `404` for an unknown tool or a lookup miss, `400` for invalid
/// arguments and `502` when the API document cannot be fetched.
async fn handle_tool_call(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(params): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, AppError> {
    let tool = state.tools.find(&name).ok_or_else(|| {
        app_error(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("no tool registered with name: {}", name),
        )
    })?;

    let validated_params = validate_params(&tool.parameters_schema(), &params)
        .map_err(|e| app_error(StatusCode::BAD_REQUEST, "bad_request", e.to_string()))?;

    let result = tool
        .execute(validated_params, &state.ctx)
        .await
        .map_err(|e| classify_tool_error(&name, e))?;

    Ok(Json(serde_json::json!({ "result": result })))
}
