//! GraphQL-specific error types.
//!
//! - [`GraphqlError::Http`]: Wraps underlying HTTP errors
//! - [`GraphqlError::Query`]: The response carried a top-level `errors` array
//! - [`GraphqlError::MissingData`]: The response had neither errors nor data
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_mcp::clients::graphql::{GraphqlClient, GraphqlError};
//!
//! match client.execute("query { shop { name } }", None).await {
//!     Ok(data) => println!("Shop: {}", data["shop"]["name"]),
//!     Err(GraphqlError::Query { messages }) => println!("Rejected: {messages:?}"),
//!     Err(e) => println!("Failed: {e}"),
//! }
//! ```

use crate::clients::HttpError;
use thiserror::Error;

/// Error type for GraphQL API operations.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::clients::graphql::GraphqlError;
/// use shopify_mcp::clients::{HttpError, HttpResponseError};
///
/// let http_error = HttpError::Response(HttpResponseError {
///     code: 401,
///     message: r#"{"error":"Unauthorized"}"#.to_string(),
///     error_reference: None,
/// });
/// let graphql_error: GraphqlError = http_error.into();
/// assert!(graphql_error.to_string().contains("Unauthorized"));
///
/// let query_error = GraphqlError::Query {
///     messages: vec!["Field 'nope' doesn't exist on type 'Shop'".to_string()],
/// };
/// assert_eq!(
///     query_error.to_string(),
///     "GraphQL errors: Field 'nope' doesn't exist on type 'Shop'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum GraphqlError {
    /// An HTTP-level error occurred (network failure or non-2xx response).
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Shopify rejected or partially failed the query.
    ///
    /// Each message is prefixed with its `extensions.code` when Shopify
    /// supplies one, e.g. `[THROTTLED] Throttled`.
    #[error("GraphQL errors: {}", messages.join("; "))]
    Query {
        /// Error messages in response order.
        messages: Vec<String>,
    },

    /// The response contained no `data` object.
    #[error("GraphQL response contained no data")]
    MissingData,
}

impl GraphqlError {
    /// Builds a [`GraphqlError::Query`] from a GraphQL `errors` array.
    ///
    /// Returns `None` when `errors` is not a non-empty array.
    #[must_use]
    pub fn from_errors(errors: &serde_json::Value) -> Option<Self> {
        let entries = errors.as_array().filter(|entries| !entries.is_empty())?;

        let messages = entries
            .iter()
            .map(|entry| {
                let message = entry
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map_or_else(|| entry.to_string(), String::from);
                match entry.pointer("/extensions/code").and_then(serde_json::Value::as_str) {
                    Some(code) => format!("[{code}] {message}"),
                    None => message,
                }
            })
            .collect();

        Some(Self::Query { messages })
    }
}
