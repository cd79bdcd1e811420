//! MCP server exposing the Shopify tools.
//!
//! [`ShopifyMcpServer`] implements `rmcp::ServerHandler`. Its `ToolRouter` is
//! built at construction from a [`ToolRegistry`], one dynamic route per tool,
//! so `tools/list` and `tools/call` are answered by rmcp's router.
//!
//! # Errors as seen by the agent
//!
//! - Bad arguments become an `invalid_params` protocol error.
//! - Shopify failures and missing objects become a tool result with
//!   `isError: true` and a message such as `Failed to fetch products: ...`.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_mcp::{server, ShopifyConfig};
//!
//! let config = ShopifyConfig::builder()
//!     .shop("my-store".parse()?)
//!     .access_token("shpat_...".parse()?)
//!     .build()?;
//! server::run_stdio(config).await?;
//! ```

use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use rmcp::handler::server::router::tool::{ToolRoute, ToolRouter};
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo, Tool};
use rmcp::{tool_handler, ErrorData, ServerHandler, ServiceExt};
use serde_json::Value;
use thiserror::Error;

use crate::clients::GraphqlClient;
use crate::config::ShopifyConfig;
use crate::tools::{JsonObject, ShopifyTool, ToolError, ToolRegistry};

/// Name reported in the MCP `initialize` handshake.
pub const SERVER_NAME: &str = "shopify-mcp-server";

const INSTRUCTIONS: &str = "Read-only access to a Shopify store through the Admin GraphQL API. \
List tools (get-products, get-collections, get-pages, get-blogs, get-articles, get-orders) \
page with first/after or last/before and return pageInfo cursors. By-id tools accept a numeric \
id or a gid://shopify/... id. search-shopify looks across several resource types at once.";

/// Errors that end a server session.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The MCP initialize handshake failed.
    #[error("MCP initialization failed: {0}")]
    Initialize(String),

    /// The service task ended abnormally.
    #[error("MCP service task failed: {0}")]
    Service(#[from] tokio::task::JoinError),
}

/// The Shopify MCP server.
#[derive(Clone)]
pub struct ShopifyMcpServer {
    client: Arc<GraphqlClient>,
    registry: ToolRegistry,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for ShopifyMcpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyMcpServer")
            .field("client", &self.client)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl ShopifyMcpServer {
    /// Creates a server with every built-in tool.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        Self::with_registry(config, ToolRegistry::with_default_tools())
    }

    /// Creates a server exposing the tools in `registry`.
    #[must_use]
    pub fn with_registry(config: &ShopifyConfig, registry: ToolRegistry) -> Self {
        let client = Arc::new(GraphqlClient::new(config));
        let tool_router = build_tool_router(&client, &registry);
        tracing::info!(
            shop = %config.shop(),
            api_version = %config.api_version(),
            tools = registry.len(),
            "Shopify MCP server ready"
        );
        Self {
            client,
            registry,
            tool_router,
        }
    }

    /// Returns the registered tools.
    #[must_use]
    pub const fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Returns the MCP tool definitions, as advertised by `tools/list`.
    #[must_use]
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Runs the tool called `name` with `arguments`.
    ///
    /// This is what `tools/call` does, minus the transport.
    ///
    /// # Errors
    ///
    /// Returns an `invalid_params` error for an unknown tool or bad
    /// arguments. Request failures are reported inside the `CallToolResult`.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let Some(tool) = self.registry.get(name) else {
            tracing::warn!(tool = name, "Unknown tool requested");
            return Err(ErrorData::invalid_params(format!("Unknown tool: {name}"), None));
        };
        invoke(&self.client, tool.as_ref(), arguments).await
    }
}

#[tool_handler]
impl ServerHandler for ShopifyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..ServerInfo::default()
        }
    }
}

/// Builds one dynamic route per registered tool.
fn build_tool_router(
    client: &Arc<GraphqlClient>,
    registry: &ToolRegistry,
) -> ToolRouter<ShopifyMcpServer> {
    let mut router = ToolRouter::new();

    for tool in registry.iter() {
        let definition = Tool::new(tool.name(), tool.description(), tool.input_schema());

        let client = Arc::clone(client);
        let tool = Arc::clone(tool);
        router.add_route(ToolRoute::new_dyn(definition, move |ctx| {
            let client = Arc::clone(&client);
            let tool = Arc::clone(&tool);
            async move { invoke(&client, tool.as_ref(), ctx.arguments).await }.boxed()
        }));
    }

    tracing::debug!(tools = ?registry.names(), "Tool router built");
    router
}

/// Runs one tool and maps the outcome onto MCP.
async fn invoke(
    client: &GraphqlClient,
    tool: &dyn ShopifyTool,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, ErrorData> {
    let name = tool.name();
    let started = Instant::now();
    let arguments = arguments.map_or(Value::Null, Value::Object);

    let result = tool.call(client, arguments).await;
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(value) => {
            tracing::info!(tool = name, elapsed_ms, outcome = "ok", "Tool call finished");
            let text = serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string());
            Ok(CallToolResult::success(vec![Content::text(text)]))
        }
        Err(error) => {
            tracing::warn!(
                tool = name,
                elapsed_ms,
                outcome = outcome_label(&error),
                error = %error,
                "Tool call failed"
            );
            error_to_result(error)
        }
    }
}

const fn outcome_label(error: &ToolError) -> &'static str {
    match error {
        ToolError::InvalidInput(_) => "invalid_input",
        ToolError::Request { .. } => "request_failed",
        ToolError::NotFound { .. } => "not_found",
    }
}

/// Maps a [`ToolError`] onto a protocol error or an error result.
fn error_to_result(error: ToolError) -> Result<CallToolResult, ErrorData> {
    if error.is_invalid_input() {
        Err(ErrorData::invalid_params(error.to_string(), None))
    } else {
        Ok(CallToolResult::error(vec![Content::text(error.to_string())]))
    }
}

/// Serves the tools over stdin/stdout until the client disconnects.
///
/// # Errors
///
/// Returns [`ServeError`] if the handshake fails or the service task dies.
pub async fn run_stdio(config: ShopifyConfig) -> Result<(), ServeError> {
    let server = ShopifyMcpServer::new(&config);

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|e| ServeError::Initialize(e.to_string()))?;
    tracing::info!("MCP session established over stdio");

    let reason = service.waiting().await?;
    tracing::info!(reason = ?reason, "MCP session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::GraphqlError;
    use crate::config::{AccessToken, ShopDomain};

    fn config() -> ShopifyConfig {
        ShopifyConfig::builder()
            .shop(ShopDomain::new("test-shop").unwrap())
            .access_token(AccessToken::new("shpat_test").unwrap())
            .build()
            .unwrap()
    }

    fn result_json(result: &CallToolResult) -> Value {
        serde_json::to_value(result).unwrap()
    }

    #[test]
    fn test_server_info_advertises_tools() {
        let info = ShopifyMcpServer::new(&config()).get_info();
        assert_eq!(info.server_info.name, SERVER_NAME);
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("search-shopify"));
    }

    #[test]
    fn test_router_lists_every_registered_tool() {
        let server = ShopifyMcpServer::new(&config());
        let mut listed: Vec<String> = server.tools().iter().map(|t| t.name.to_string()).collect();
        let mut registered: Vec<String> = server
            .registry()
            .names()
            .into_iter()
            .map(String::from)
            .collect();
        listed.sort();
        registered.sort();
        assert_eq!(listed, registered);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_invalid_params() {
        let server = ShopifyMcpServer::new(&config());
        let error = server.dispatch("get-customers", None).await.unwrap_err();
        assert!(error.message.contains("Unknown tool: get-customers"));
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_rejected_before_any_request() {
        let server = ShopifyMcpServer::new(&config());
        let arguments = serde_json::json!({"first": 0});
        let error = server
            .dispatch("get-products", arguments.as_object().cloned())
            .await
            .unwrap_err();
        assert!(error.message.contains("'first' must be between 1 and 250"));
    }

    #[test]
    fn test_request_failures_become_error_results() {
        let result = error_to_result(ToolError::Request {
            context: "Failed to fetch orders",
            source: GraphqlError::MissingData,
        })
        .unwrap();
        let json = result_json(&result);
        assert_eq!(json["isError"], true);
        assert_eq!(
            json["content"][0]["text"],
            "Failed to fetch orders: GraphQL response contained no data"
        );
    }

    #[test]
    fn test_not_found_becomes_error_result() {
        let result = error_to_result(ToolError::NotFound {
            context: "Failed to fetch order",
            resource: "Order",
            id: "gid://shopify/Order/1".to_string(),
        })
        .unwrap();
        assert_eq!(result_json(&result)["isError"], true);
    }
}
