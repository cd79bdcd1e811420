//! HTTP request types.
//!
//! Every call the server makes is a JSON `POST`, so a request is just a
//! relative path and a JSON object body.

use crate::clients::errors::InvalidHttpRequestError;

/// An HTTP request to be sent to the Shopify Admin API.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::clients::HttpRequest;
/// use serde_json::json;
///
/// let request = HttpRequest::new("graphql.json", json!({"query": "{ shop { name } }"})).unwrap();
/// assert_eq!(request.path, "graphql.json");
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The path (relative to the client's base path) for this request.
    pub path: String,
    /// The JSON request body.
    pub body: serde_json::Value,
}

impl HttpRequest {
    /// Creates a validated request to `path` carrying `body`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn new(
        path: impl Into<String>,
        body: serde_json::Value,
    ) -> Result<Self, InvalidHttpRequestError> {
        let request = Self {
            path: path.into(),
            body,
        };
        request.verify()?;
        Ok(request)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the path is empty or the body
    /// is not a JSON object.
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.path.trim().is_empty() {
            return Err(InvalidHttpRequestError::EmptyPath);
        }

        let kind = match &self.body {
            serde_json::Value::Object(_) => return Ok(()),
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
        };
        Err(InvalidHttpRequestError::NonObjectBody { kind })
    }
}
