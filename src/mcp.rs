//! MCP JSON-RPC protocol bridge.
//!
//! Adapts the [`ToolRegistry`] to the Model Context Protocol so that MCP
//! clients (Cursor, Claude, ...) can discover the query tools via
//! `list_tools` and invoke them via `call_tool`. The same bridge is served
//! over stdio and over streamable HTTP (see [`crate::server`]).
//!
//! Tool results are returned as pretty-printed JSON text. Failures never
//! surface as protocol faults: a fetch failure, a missing endpoint/schema or
//! invalid arguments all come back as a text result flagged `isError`.

use std::borrow::Cow;
use std::sync::Arc;

use api_knowledge_core::NotFound;
use rmcp::model::*;
use rmcp::{ErrorData as McpError, ServerHandler};
use tracing::{debug, warn};

use crate::traits::{render_text, validate_params, ToolContext, ToolRegistry};

/// Bridges the tool registry to the MCP JSON-RPC protocol.
///
/// Each MCP session receives a clone of this struct (everything is
/// behind `Arc`), so all sessions share one document cache.
#[derive(Clone)]
pub struct McpBridge {
    ctx: ToolContext,
    tools: Arc<ToolRegistry>,
}

impl McpBridge {
    pub fn new(ctx: ToolContext, tools: Arc<ToolRegistry>) -> Self {
        Self { ctx, tools }
    }

    /// Convert a tool into an rmcp `Tool` descriptor.
    fn to_mcp_tool(tool: &dyn crate::traits::Tool) -> Tool {
        let schema_value = tool.parameters_schema();
        let input_schema: Arc<serde_json::Map<String, serde_json::Value>> = match schema_value {
            serde_json::Value::Object(map) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        Tool {
            name: Cow::Owned(tool.name().to_string()),
            title: None,
            description: Some(Cow::Owned(tool.description().to_string())),
            input_schema,
            output_schema: None,
            annotations: Some(ToolAnnotations::new().read_only(tool.is_read_only())),
            execution: None,
            icons: None,
            meta: None,
        }
    }

    /// Validate arguments, run the named tool and wrap the outcome.
    ///
    /// Returns `None` when no tool has that name.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Option<CallToolResult> {
        let tool = self.tools.find(name)?;
        debug!(tool = name, "tool call");

        let params = arguments
            .map(serde_json::Value::Object)
            .unwrap_or(serde_json::Value::Object(serde_json::Map::new()));

        let outcome = match validate_params(&tool.parameters_schema(), &params) {
            Ok(params) => tool.execute(params, &self.ctx).await,
            Err(e) => Err(e),
        };

        Some(match outcome {
            Ok(result) => CallToolResult::success(vec![Content::text(render_text(&result))]),
            Err(e) => {
                if e.downcast_ref::<NotFound>().is_none() {
                    warn!(tool = name, error = %e, "tool call failed");
                }
                CallToolResult::error(vec![Content::text(error_text(&e))])
            }
        })
    }
}

/// User-facing text for a failed tool call. Not-found results read as a
/// plain sentence; everything else is prefixed with `Error:`.
pub fn error_text(err: &anyhow::Error) -> String {
    if err.downcast_ref::<NotFound>().is_some() {
        err.to_string()
    } else {
        format!("Error: {}", err)
    }
}

impl ServerHandler for McpBridge {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "api-knowledge-server".to_string(),
                title: Some("API Knowledge".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "API Knowledge answers questions about an HTTP API from its OpenAPI document. \
                 Use list_endpoints or search_endpoints to find operations, get_endpoint_details \
                 for parameters, request body and responses, and list_schemas / get_schema for \
                 data models. Call refresh_cache after the API changes."
                    .to_string(),
            ),
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools: Vec<Tool> = self
            .tools
            .tools()
            .iter()
            .map(|t| Self::to_mcp_tool(t.as_ref()))
            .collect();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    fn get_tool(&self, name: &str) -> Option<Tool> {
        self.tools.find(name).map(Self::to_mcp_tool)
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        self.dispatch(&request.name, request.arguments)
            .await
            .ok_or_else(|| {
                McpError::new(
                    ErrorCode::METHOD_NOT_FOUND,
                    format!("no tool registered with name: {}", request.name),
                    None,
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ListSchemasTool;

    #[test]
    fn test_error_text() {
        let missing = anyhow::Error::new(NotFound::Endpoint {
            method: "GET".to_string(),
            path: "/nope".to_string(),
        });
        assert_eq!(error_text(&missing), "Endpoint not found: GET /nope");

        let other = anyhow::anyhow!("invalid parameters: \"path\" is a required property");
        assert!(error_text(&other).starts_with("Error: invalid parameters"));
    }

    #[test]
    fn test_tool_descriptor() {
        let tool = McpBridge::to_mcp_tool(&ListSchemasTool);
        assert_eq!(tool.name, "list_schemas");
        assert_eq!(tool.input_schema.get("type"), Some(&serde_json::json!("object")));
    }
}
