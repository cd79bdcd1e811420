//! MCP tools backed by the Shopify Admin GraphQL API.
//!
//! Each tool is a stateless adapter: it deserializes its typed input, turns
//! it into GraphQL variables for a fixed query document, sends one request
//! through [`GraphqlClient`], and reshapes the `data` object by removing
//! connection wrappers.
//!
//! # Overview
//!
//! - [`ShopifyTool`]: the interface every tool implements
//! - [`ToolRegistry`]: the set of tools the server advertises
//! - [`ToolError`]: input, request and not-found failures
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_mcp::tools::ToolRegistry;
//! use serde_json::json;
//!
//! let registry = ToolRegistry::with_default_tools();
//! let tool = registry.get("get-products").unwrap();
//! let result = tool.call(&client, json!({"first": 5, "vendor": "Acme"})).await?;
//! ```

mod articles;
mod blogs;
mod collections;
mod orders;
mod pages;
mod products;
mod search;

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::clients::{GraphqlClient, GraphqlError};
use crate::gid::GidError;
use crate::pagination::{flatten_connections, Page, PaginationError};

pub use articles::{GetArticleById, GetArticles};
pub use blogs::{GetBlogById, GetBlogs};
pub use collections::{GetCollectionById, GetCollections};
pub use orders::{GetOrderById, GetOrders};
pub use pages::{GetPageById, GetPages};
pub use products::{GetProductById, GetProducts};
pub use search::SearchShopify;

/// A JSON object, as used for tool input schemas.
pub type JsonObject = serde_json::Map<String, Value>;

/// Errors a tool call can end with.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The arguments were malformed or violated a constraint.
    #[error("{0}")]
    InvalidInput(String),

    /// The request to Shopify failed.
    #[error("{context}: {source}")]
    Request {
        /// What the tool was doing, e.g. `Failed to fetch products`.
        context: &'static str,
        /// The underlying failure.
        #[source]
        source: GraphqlError,
    },

    /// Shopify answered but the requested object does not exist.
    #[error("{context}: {resource} not found: {id}")]
    NotFound {
        /// What the tool was doing, e.g. `Failed to fetch product`.
        context: &'static str,
        /// The resource type, e.g. `Product`.
        resource: &'static str,
        /// The id that was looked up.
        id: String,
    },
}

impl ToolError {
    /// Creates an [`InvalidInput`](Self::InvalidInput) error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Returns `true` if the caller sent bad arguments.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl From<PaginationError> for ToolError {
    fn from(error: PaginationError) -> Self {
        Self::InvalidInput(error.to_string())
    }
}

impl From<GidError> for ToolError {
    fn from(error: GidError) -> Self {
        Self::InvalidInput(error.to_string())
    }
}

/// An MCP tool backed by one fixed GraphQL document.
#[async_trait]
pub trait ShopifyTool: Send + Sync {
    /// The MCP tool name, e.g. `get-products`.
    fn name(&self) -> &'static str;

    /// Human-readable description shown to the agent.
    fn description(&self) -> &'static str;

    /// JSON Schema of the tool arguments.
    fn input_schema(&self) -> JsonObject;

    /// Runs the tool.
    ///
    /// `arguments` is the raw argument object (`null` is treated as `{}`).
    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError>;
}

/// The tools exposed by the server, in registration order.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ShopifyTool>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in tool.
    #[must_use]
    pub fn with_default_tools() -> Self {
        let mut registry = Self::new();
        registry.register(GetProducts);
        registry.register(GetProductById);
        registry.register(GetCollections);
        registry.register(GetCollectionById);
        registry.register(GetPages);
        registry.register(GetPageById);
        registry.register(GetBlogs);
        registry.register(GetBlogById);
        registry.register(GetArticles);
        registry.register(GetArticleById);
        registry.register(GetOrders);
        registry.register(GetOrderById);
        registry.register(SearchShopify);
        registry
    }

    /// Adds a tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: impl ShopifyTool + 'static) {
        let tool: Arc<dyn ShopifyTool> = Arc::new(tool);
        if let Some(existing) = self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            tracing::warn!(tool = tool.name(), "Replacing previously registered tool");
            *existing = tool;
        } else {
            self.tools.push(tool);
        }
    }

    /// Looks up a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn ShopifyTool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// Returns the registered tools.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ShopifyTool>> {
        self.tools.iter()
    }

    /// Returns the registered tool names.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Derives a tool input schema from its argument type.
pub(crate) fn schema_of<T: JsonSchema>() -> JsonObject {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(schema) {
        Ok(Value::Object(map)) => map,
        other => {
            tracing::error!(?other, "Tool input schema is not a JSON object");
            JsonObject::new()
        }
    }
}

/// Deserializes tool arguments, treating `null` as an empty object.
///
/// Keys that are not properties of `T`'s schema are rejected, so a
/// misspelled filter fails instead of widening the query.
pub(crate) fn parse_input<T: DeserializeOwned + JsonSchema>(
    arguments: Value,
) -> Result<T, ToolError> {
    let arguments = if arguments.is_null() {
        Value::Object(JsonObject::new())
    } else {
        arguments
    };

    if let Value::Object(object) = &arguments {
        let schema = schema_of::<T>();
        let properties = schema.get("properties").and_then(Value::as_object);
        let unknown: Vec<&str> = object
            .keys()
            .filter(|key| !properties.is_some_and(|known| known.contains_key(key.as_str())))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(ToolError::invalid_input(format!(
                "Unknown arguments: {}",
                unknown.join(", ")
            )));
        }
    }

    serde_json::from_value(arguments)
        .map_err(|e| ToolError::invalid_input(format!("Invalid arguments: {e}")))
}

/// Runs a query and returns its `data`, tagging failures with `context`.
pub(crate) async fn fetch(
    client: &GraphqlClient,
    query: &'static str,
    variables: Value,
    context: &'static str,
) -> Result<Value, ToolError> {
    client
        .execute(query, Some(variables))
        .await
        .map_err(|source| ToolError::Request { context, source })
}

/// Unwraps the connection at `data[field]` into `{ key: [...], pageInfo }`.
pub(crate) fn page_result(mut data: Value, field: &str, key: &str) -> Value {
    let connection = data.get_mut(field).map(Value::take).unwrap_or_default();
    Page::from_connection(connection).into_json(key)
}

/// Unwraps the object at `data[field]` into `{ field: {...} }`.
///
/// A `null` object means the id did not resolve.
pub(crate) fn node_result(
    mut data: Value,
    field: &'static str,
    resource: &'static str,
    id: String,
    context: &'static str,
) -> Result<Value, ToolError> {
    match data.get_mut(field).map(Value::take) {
        Some(node) if !node.is_null() => {
            Ok(serde_json::json!({ field: flatten_connections(node) }))
        }
        _ => Err(ToolError::NotFound {
            context,
            resource,
            id,
        }),
    }
}

/// Inserts `value` under `key` unless it is `None`.
pub(crate) fn insert_some<T: serde::Serialize>(
    variables: &mut Value,
    key: &str,
    value: Option<T>,
) {
    if let (Some(object), Some(value)) = (variables.as_object_mut(), value) {
        if let Ok(value) = serde_json::to_value(value) {
            object.insert(key.to_string(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema)]
    #[serde(rename_all = "camelCase")]
    struct EchoInput {
        /// Text to echo.
        text: String,
        #[serde(default)]
        repeat: Option<u32>,
    }

    struct Echo;

    #[async_trait]
    impl ShopifyTool for Echo {
        fn name(&self) -> &'static str {
            "echo"
        }

        fn description(&self) -> &'static str {
            "Echoes text"
        }

        fn input_schema(&self) -> JsonObject {
            schema_of::<EchoInput>()
        }

        async fn call(
            &self,
            _client: &GraphqlClient,
            arguments: Value,
        ) -> Result<Value, ToolError> {
            let input: EchoInput = parse_input(arguments)?;
            Ok(Value::String(input.text.repeat(input.repeat.unwrap_or(1) as usize)))
        }
    }

    #[test]
    fn test_default_registry_holds_every_tool() {
        let registry = ToolRegistry::with_default_tools();
        assert_eq!(
            registry.names(),
            vec![
                "get-products",
                "get-product-by-id",
                "get-collections",
                "get-collection-by-id",
                "get-pages",
                "get-page-by-id",
                "get-blogs",
                "get-blog-by-id",
                "get-articles",
                "get-article-by-id",
                "get-orders",
                "get-order-by-id",
                "search-shopify",
            ]
        );
    }

    #[test]
    fn test_every_schema_is_an_object_schema() {
        for tool in ToolRegistry::with_default_tools().iter() {
            let schema = tool.input_schema();
            assert_eq!(schema.get("type"), Some(&Value::from("object")), "{}", tool.name());
            assert!(!tool.description().is_empty());
        }
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register(Echo);
        registry.register(Echo);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn test_schema_of_lists_required_fields() {
        let schema = schema_of::<EchoInput>();
        assert_eq!(schema["required"], serde_json::json!(["text"]));
        assert!(schema["properties"]["repeat"].is_object());
    }

    #[test]
    fn test_parse_input_rejects_unknown_keys() {
        let error = parse_input::<EchoInput>(serde_json::json!({"text": "hi", "repaet": 2})).unwrap_err();
        assert!(error.is_invalid_input());
        assert_eq!(error.to_string(), "Unknown arguments: repaet");
    }

    #[test]
    fn test_parse_input_treats_null_as_empty() {
        let error = parse_input::<EchoInput>(Value::Null).unwrap_err();
        assert!(error.is_invalid_input());
        assert!(error.to_string().contains("missing field `text`"));
    }

    #[test]
    fn test_request_error_message_is_prefixed() {
        let error = ToolError::Request {
            context: "Failed to fetch products",
            source: GraphqlError::MissingData,
        };
        assert_eq!(
            error.to_string(),
            "Failed to fetch products: GraphQL response contained no data"
        );
    }

    #[test]
    fn test_not_found_message() {
        let error = ToolError::NotFound {
            context: "Failed to fetch page",
            resource: "Page",
            id: "gid://shopify/Page/1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to fetch page: Page not found: gid://shopify/Page/1"
        );
    }

    #[test]
    fn test_insert_some_skips_none() {
        let mut variables = serde_json::json!({});
        insert_some(&mut variables, "reverse", Some(true));
        insert_some::<String>(&mut variables, "sortKey", None);
        assert_eq!(variables, serde_json::json!({"reverse": true}));
    }
}
