//! Named query tools and their registry.
//!
//! Every query the engine supports is wrapped as a [`Tool`]: a name, a
//! one-line description, a JSON-Schema parameter contract and an async
//! `execute`. The MCP bridge ([`crate::mcp`]), the HTTP routes
//! ([`crate::server`]) and any custom binary all dispatch through the same
//! [`ToolRegistry`].
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 ToolRegistry                 │
//! │  list_endpoints  get_endpoint_details        │
//! │  search_endpoints  get_schema  list_schemas  │
//! │  list_tags  get_api_info  refresh_cache      │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//!            ToolContext → KnowledgeIndex
//! ```
//!
//! # Usage
//!
//! ```rust
//! use api_knowledge::traits::ToolRegistry;
//!
//! let tools = ToolRegistry::with_builtins();
//! assert!(tools.find("get_schema").is_some());
//! ```

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use jsonschema::JSONSchema;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::engine::KnowledgeIndex;

/// Acknowledgement returned by `refresh_cache`.
pub const CACHE_CLEARED_MESSAGE: &str =
    "Cache cleared. The next API call will fetch fresh API document data.";

// ═══════════════════════════════════════════════════════════════════════
// Tool Trait
// ═══════════════════════════════════════════════════════════════════════

/// A named operation that MCP clients can discover and call.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use anyhow::Result;
/// use serde_json::{json, Value};
/// use api_knowledge::traits::{Tool, ToolContext};
///
/// pub struct CountEndpointsTool;
///
/// #[async_trait]
/// impl Tool for CountEndpointsTool {
///     fn name(&self) -> &str { "count_endpoints" }
///     fn description(&self) -> &str { "Count the API's endpoints" }
///
///     fn parameters_schema(&self) -> Value {
///         json!({ "type": "object", "properties": {} })
///     }
///
///     async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
///         let endpoints = ctx.index().list_endpoints(None).await?;
///         Ok(json!({ "count": endpoints.len() }))
///     }
/// }
/// ```
#[async_trait]
pub trait Tool: Send + Sync {
    /// Lowercase identifier with underscores, e.g. `"list_endpoints"`.
    fn name(&self) -> &str;

    /// One-line description for tool discovery.
    fn description(&self) -> &str;

    /// Whether this is one of the built-in query tools.
    fn is_builtin(&self) -> bool {
        false
    }

    /// Whether calling the tool leaves all state untouched.
    fn is_read_only(&self) -> bool {
        true
    }

    /// JSON Schema (`type: "object"`) for the tool's arguments.
    fn parameters_schema(&self) -> Value;

    /// Run the tool with arguments that already passed
    /// [`validate_params`].
    ///
    /// A missing endpoint or schema is reported as an error carrying
    /// [`api_knowledge_core::NotFound`]; callers can downcast to tell it
    /// apart from a fetch failure.
    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value>;
}

// ═══════════════════════════════════════════════════════════════════════
// ToolContext
// ═══════════════════════════════════════════════════════════════════════

/// Gives tools access to the shared [`KnowledgeIndex`].
#[derive(Clone)]
pub struct ToolContext {
    index: Arc<KnowledgeIndex>,
}

impl ToolContext {
    pub fn new(index: Arc<KnowledgeIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &KnowledgeIndex {
        &self.index
    }
}

/// Check `params` against a tool's parameter schema.
///
/// A `null` argument object is treated as `{}`. Returns the arguments to
/// pass to [`Tool::execute`].
pub fn validate_params(schema: &Value, params: &Value) -> Result<Value> {
    let params = match params {
        Value::Null => json!({}),
        other => other.clone(),
    };

    let compiled =
        JSONSchema::compile(schema).map_err(|e| anyhow!("invalid parameter schema: {}", e))?;
    if let Err(errors) = compiled.validate(&params) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        bail!("invalid parameters: {}", details);
    }
    Ok(params)
}

/// Text form of a tool result: strings as-is, everything else as
/// pretty-printed JSON.
pub fn render_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn str_param<'a>(params: &'a Value, key: &str) -> &'a str {
    params.get(key).and_then(Value::as_str).unwrap_or("")
}

// ═══════════════════════════════════════════════════════════════════════
// Built-in Tool Implementations
// ═══════════════════════════════════════════════════════════════════════

pub struct ListEndpointsTool;

#[async_trait]
impl Tool for ListEndpointsTool {
    fn name(&self) -> &str {
        "list_endpoints"
    }

    fn description(&self) -> &str {
        "List all API endpoints. Optionally filter by tag."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "tag": { "type": "string", "description": "Filter endpoints by tag (e.g., \"items\", \"users\")" }
            }
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let tag = params.get("tag").and_then(Value::as_str);
        let endpoints = ctx.index().list_endpoints(tag).await?;
        Ok(serde_json::to_value(endpoints)?)
    }
}

pub struct GetEndpointDetailsTool;

#[async_trait]
impl Tool for GetEndpointDetailsTool {
    fn name(&self) -> &str {
        "get_endpoint_details"
    }

    fn description(&self) -> &str {
        "Get detailed information about a specific endpoint including parameters, request body, and responses."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "method": { "type": "string", "description": "HTTP method (GET, POST, PUT, PATCH, DELETE)" },
                "path": { "type": "string", "description": "API path (e.g., \"/items\", \"/items/{id}\")" }
            },
            "required": ["method", "path"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let method = str_param(&params, "method");
        let path = str_param(&params, "path");
        let details = ctx
            .index()
            .get_endpoint_details(method, path)
            .await?
            .into_result()?;
        Ok(serde_json::to_value(details)?)
    }
}

pub struct SearchEndpointsTool;

#[async_trait]
impl Tool for SearchEndpointsTool {
    fn name(&self) -> &str {
        "search_endpoints"
    }

    fn description(&self) -> &str {
        "Search for endpoints by keyword. Searches in path, summary, operationId, and tags."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Search query" }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let endpoints = ctx
            .index()
            .search_endpoints(str_param(&params, "query"))
            .await?;
        Ok(serde_json::to_value(endpoints)?)
    }
}

pub struct GetSchemaTool;

#[async_trait]
impl Tool for GetSchemaTool {
    fn name(&self) -> &str {
        "get_schema"
    }

    fn description(&self) -> &str {
        "Get the schema definition for a DTO or model."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "schemaName": { "type": "string", "description": "Name of the schema (e.g., \"CreateItemDto\", \"Item\")" }
            },
            "required": ["schemaName"]
        })
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> Result<Value> {
        let schema = ctx
            .index()
            .get_schema(str_param(&params, "schemaName"))
            .await?
            .into_result()?;
        Ok(serde_json::to_value(schema)?)
    }
}

pub struct ListSchemasTool;

#[async_trait]
impl Tool for ListSchemasTool {
    fn name(&self) -> &str {
        "list_schemas"
    }

    fn description(&self) -> &str {
        "List all available DTO/model schemas."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(serde_json::to_value(ctx.index().list_schemas().await?)?)
    }
}

pub struct ListTagsTool;

#[async_trait]
impl Tool for ListTagsTool {
    fn name(&self) -> &str {
        "list_tags"
    }

    fn description(&self) -> &str {
        "List endpoint tags with their descriptions and endpoint counts."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(serde_json::to_value(ctx.index().list_tags().await?)?)
    }
}

pub struct ApiInfoTool;

#[async_trait]
impl Tool for ApiInfoTool {
    fn name(&self) -> &str {
        "get_api_info"
    }

    fn description(&self) -> &str {
        "Get the API title, version, description and endpoint/schema counts."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        Ok(serde_json::to_value(ctx.index().api_info().await?)?)
    }
}

pub struct RefreshCacheTool;

#[async_trait]
impl Tool for RefreshCacheTool {
    fn name(&self) -> &str {
        "refresh_cache"
    }

    fn description(&self) -> &str {
        "Clear the cached API document and fetch fresh data on next request."
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn is_read_only(&self) -> bool {
        false
    }

    fn parameters_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn execute(&self, _params: Value, ctx: &ToolContext) -> Result<Value> {
        ctx.index().refresh_cache().await;
        Ok(Value::String(CACHE_CLEARED_MESSAGE.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════

/// Registry of tools, looked up by name.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Create a registry pre-loaded with every built-in query tool.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(ListEndpointsTool));
        registry.register(Box::new(GetEndpointDetailsTool));
        registry.register(Box::new(SearchEndpointsTool));
        registry.register(Box::new(GetSchemaTool));
        registry.register(Box::new(ListSchemasTool));
        registry.register(Box::new(ListTagsTool));
        registry.register(Box::new(ApiInfoTool));
        registry.register(Box::new(RefreshCacheTool));
        registry
    }

    /// Register a tool. A later tool with the same name is shadowed by the
    /// earlier one in [`find`](ToolRegistry::find).
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = ToolRegistry::with_builtins();
        let names: Vec<&str> = registry.tools().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "list_endpoints",
                "get_endpoint_details",
                "search_endpoints",
                "get_schema",
                "list_schemas",
                "list_tags",
                "get_api_info",
                "refresh_cache"
            ]
        );
        assert!(registry.tools().iter().all(|t| t.is_builtin()));
        assert!(!registry.find("refresh_cache").unwrap().is_read_only());
    }

    #[test]
    fn test_validate_params_accepts_valid_arguments() {
        let schema = GetEndpointDetailsTool.parameters_schema();
        let params = json!({ "method": "GET", "path": "/items" });
        assert_eq!(validate_params(&schema, &params).unwrap(), params);
    }

    #[test]
    fn test_validate_params_rejects_missing_required() {
        let schema = GetSchemaTool.parameters_schema();
        let err = validate_params(&schema, &json!({})).unwrap_err();
        assert!(err.to_string().contains("invalid parameters"));
        assert!(err.to_string().contains("schemaName"));
    }

    #[test]
    fn test_validate_params_rejects_wrong_type() {
        let schema = ListEndpointsTool.parameters_schema();
        assert!(validate_params(&schema, &json!({ "tag": 42 })).is_err());
    }

    #[test]
    fn test_null_params_become_empty_object() {
        let schema = ListSchemasTool.parameters_schema();
        assert_eq!(validate_params(&schema, &Value::Null).unwrap(), json!({}));
    }

    #[test]
    fn test_render_text() {
        assert_eq!(render_text(&json!("done")), "done");
        assert_eq!(render_text(&json!([])), "[]");
        assert_eq!(render_text(&json!(["a"])), "[\n  \"a\"\n]");
    }
}
