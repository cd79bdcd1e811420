//! HTTP response types.
//!
//! This module provides the [`HttpResponse`] type and the [`QueryCost`]
//! report that Shopify attaches to GraphQL responses.

use std::collections::HashMap;

use serde::Deserialize;

/// Throttle bucket state reported alongside a GraphQL query cost.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleStatus {
    /// Bucket size.
    pub maximum_available: f64,
    /// Points left in the bucket after this query.
    pub currently_available: f64,
    /// Points restored per second.
    pub restore_rate: f64,
}

/// Cost information from a GraphQL response's `extensions.cost` field.
///
/// This is informational only; the server does not throttle itself.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::clients::HttpResponse;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let response = HttpResponse::new(200, HashMap::new(), json!({
///     "data": {},
///     "extensions": {"cost": {
///         "requestedQueryCost": 12,
///         "actualQueryCost": 4,
///         "throttleStatus": {"maximumAvailable": 2000.0, "currentlyAvailable": 1996, "restoreRate": 100.0}
///     }}
/// }));
///
/// let cost = response.query_cost().unwrap();
/// assert_eq!(cost.requested_query_cost, 12.0);
/// assert_eq!(cost.actual_query_cost, Some(4.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCost {
    /// Cost estimated before execution.
    pub requested_query_cost: f64,
    /// Cost actually charged, absent when the query was not executed.
    pub actual_query_cost: Option<f64>,
    /// Bucket state after the query.
    pub throttle_status: Option<ThrottleStatus>,
}

/// An HTTP response from the Shopify Admin API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lower-cased name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    #[must_use]
    pub const fn new(
        code: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `X-Shopify-API-Deprecated-Reason` header value, if present.
    #[must_use]
    pub fn deprecation_reason(&self) -> Option<&str> {
        self.header("x-shopify-api-deprecated-reason")
    }

    /// Returns the query cost report, if the body carries one.
    #[must_use]
    pub fn query_cost(&self) -> Option<QueryCost> {
        self.body
            .pointer("/extensions/cost")
            .and_then(|cost| QueryCost::deserialize(cost).ok())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for code in [400, 401, 404, 429, 500, 503] {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(!response.is_ok(), "Expected is_ok() to be false for code {code}");
        }
    }

    #[test]
    fn test_request_id_extraction() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc-123-xyz".to_string()]);

        let response = HttpResponse::new(200, headers, json!({}));
        assert_eq!(response.request_id(), Some("abc-123-xyz"));
    }

    #[test]
    fn test_deprecation_reason_extraction() {
        let mut headers = HashMap::new();
        headers.insert(
            "x-shopify-api-deprecated-reason".to_string(),
            vec!["https://shopify.dev/changelog".to_string()],
        );

        let response = HttpResponse::new(200, headers, json!({}));
        assert_eq!(
            response.deprecation_reason(),
            Some("https://shopify.dev/changelog")
        );
        assert!(HttpResponse::new(200, HashMap::new(), json!({}))
            .deprecation_reason()
            .is_none());
    }

    #[test]
    fn test_query_cost_absent_or_malformed() {
        let response = HttpResponse::new(200, HashMap::new(), json!({"data": {}}));
        assert!(response.query_cost().is_none());

        let response = HttpResponse::new(
            200,
            HashMap::new(),
            json!({"extensions": {"cost": "expensive"}}),
        );
        assert!(response.query_cost().is_none());
    }

    #[test]
    fn test_query_cost_without_throttle_status() {
        let response = HttpResponse::new(
            200,
            HashMap::new(),
            json!({"extensions": {"cost": {"requestedQueryCost": 1002}}}),
        );
        let cost = response.query_cost().unwrap();
        assert!((cost.requested_query_cost - 1002.0).abs() < f64::EPSILON);
        assert!(cost.actual_query_cost.is_none());
        assert!(cost.throttle_status.is_none());
    }
}
