//! # Shopify MCP Server
//!
//! A [Model Context Protocol](https://modelcontextprotocol.io) server that
//! gives AI agents read-only access to a Shopify store through the Admin
//! GraphQL API.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`ShopifyConfig`] and [`ShopifyConfigBuilder`]
//! - Validated newtypes for the store domain, access token and API host
//! - An async HTTP client and a GraphQL client for the Admin API
//! - Relay-style cursor pagination helpers in [`pagination`]
//! - Shopify search query construction in [`search_query`]
//! - Thirteen tools covering products, collections, pages, blogs, articles,
//!   orders and a cross-resource search, in [`tools`]
//! - The MCP server itself in [`server`]
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_mcp::{AccessToken, ApiVersion, ShopDomain, ShopifyConfig};
//!
//! let config = ShopifyConfig::builder()
//!     .shop(ShopDomain::new("my-store").unwrap())
//!     .access_token(AccessToken::new("shpat_123").unwrap())
//!     .api_version(ApiVersion::latest())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.shop().as_ref(), "my-store.myshopify.com");
//! ```
//!
//! ## Serving over stdio
//!
//! ```rust,ignore
//! use shopify_mcp::server;
//!
//! server::run_stdio(config).await?;
//! ```
//!
//! ## Calling a tool directly
//!
//! Tools can be run without a transport, which is how the integration
//! tests drive them:
//!
//! ```rust,ignore
//! use shopify_mcp::server::ShopifyMcpServer;
//! use serde_json::json;
//!
//! let server = ShopifyMcpServer::new(&config);
//! let arguments = json!({ "first": 5, "vendor": "Acme" });
//! let result = server
//!     .dispatch("get-products", arguments.as_object().cloned())
//!     .await?;
//! ```
//!
//! ## Design Principles
//!
//! - **Read-only**: no tool issues a mutation
//! - **No global state**: configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: newtypes and tool arguments are checked before
//!   any request is sent
//! - **Thread-safe**: all types are `Send + Sync`

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod gid;
pub mod pagination;
pub mod search_query;
pub mod server;
pub mod tools;

// Re-export public types at crate root for convenience
pub use config::{AccessToken, ApiVersion, HostUrl, ShopDomain, ShopifyConfig, ShopifyConfigBuilder};
pub use error::ConfigError;

// Re-export client types
pub use clients::{
    GraphqlClient, GraphqlError, HttpClient, HttpError, HttpRequest, HttpResponse,
    HttpResponseError, InvalidHttpRequestError,
};

pub use server::ShopifyMcpServer;
pub use tools::{ShopifyTool, ToolError, ToolRegistry};
