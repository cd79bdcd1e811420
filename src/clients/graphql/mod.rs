//! GraphQL API client for Shopify Admin API.
//!
//! This module provides a higher-level GraphQL API client built on top of the
//! [`HttpClient`](crate::clients::HttpClient). Every tool the server exposes
//! goes through it.
//!
//! # Overview
//!
//! - [`GraphqlClient`]: The GraphQL API client with `query()` and `execute()` methods
//! - [`GraphqlError`]: Error type for GraphQL API operations
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_mcp::{GraphqlClient, ShopifyConfig};
//! use serde_json::json;
//!
//! let client = GraphqlClient::new(&config);
//!
//! // Raw response, including extensions
//! let response = client.query("query { shop { name } }", None).await?;
//! println!("Shop name: {}", response.body["data"]["shop"]["name"]);
//!
//! // Unwrapped data, with GraphQL errors surfaced as `GraphqlError::Query`
//! let data = client.execute(
//!     "query GetPage($id: ID!) { page(id: $id) { title } }",
//!     Some(json!({ "id": "gid://shopify/Page/123" })),
//! ).await?;
//! ```

mod client;
mod errors;

pub use client::GraphqlClient;
pub use errors::GraphqlError;
