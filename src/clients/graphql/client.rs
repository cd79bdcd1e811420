//! GraphQL client implementation for Shopify Admin API.
//!
//! This module provides the [`GraphqlClient`] type for executing GraphQL queries
//! against the Shopify Admin API.

use crate::clients::graphql::GraphqlError;
use crate::clients::{HttpClient, HttpRequest, HttpResponse};
use crate::config::{ApiVersion, ShopifyConfig};

/// GraphQL API client for Shopify Admin API.
///
/// Provides [`query`](Self::query) for the raw response and
/// [`execute`](Self::execute) for the unwrapped `data` object.
///
/// # Thread Safety
///
/// `GraphqlClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use shopify_mcp::GraphqlClient;
/// use serde_json::json;
///
/// let client = GraphqlClient::new(&config);
///
/// let data = client.execute(
///     "query GetProduct($id: ID!) { product(id: $id) { title } }",
///     Some(json!({ "id": "gid://shopify/Product/123" })),
/// ).await?;
/// println!("{}", data["product"]["title"]);
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    /// The internal HTTP client for making requests.
    http_client: HttpClient,
    /// The API version being used.
    api_version: ApiVersion,
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};

impl GraphqlClient {
    /// Creates a new GraphQL client for the configured store.
    ///
    /// Requests go to `/admin/api/{version}/graphql.json` using the
    /// configuration's API version.
    #[must_use]
    pub fn new(config: &ShopifyConfig) -> Self {
        let api_version = config.api_version().clone();
        let base_path = format!("/admin/api/{api_version}");
        let http_client = HttpClient::new(base_path, config);

        tracing::debug!(
            shop = %config.shop(),
            api_version = %api_version,
            base_uri = http_client.base_uri(),
            "GraphQL client ready"
        );

        Self {
            http_client,
            api_version,
        }
    }

    /// Returns the API version being used by this client.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the endpoint URL queries are posted to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.http_client.url_for("graphql.json")
    }

    /// Executes a GraphQL query and returns the raw response.
    ///
    /// GraphQL-level errors arrive with HTTP 200 and are left in
    /// `response.body["errors"]`; use [`execute`](Self::execute) to have them
    /// turned into [`GraphqlError::Query`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphqlError::Http`] for network errors and non-2xx responses.
    pub async fn query(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<HttpResponse, GraphqlError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| serde_json::json!({})),
        });

        let request =
            HttpRequest::new("graphql.json", body).map_err(|e| GraphqlError::Http(e.into()))?;
        let response = self.http_client.request(request).await?;

        if let Some(cost) = response.query_cost() {
            tracing::debug!(
                requested = cost.requested_query_cost,
                actual = cost.actual_query_cost,
                available = cost.throttle_status.map(|s| s.currently_available),
                "GraphQL query cost"
            );
        }

        Ok(response)
    }

    /// Executes a GraphQL query and returns its `data` object.
    ///
    /// # Errors
    ///
    /// - [`GraphqlError::Http`] for network errors and non-2xx responses
    /// - [`GraphqlError::Query`] when the response has a non-empty `errors` array
    /// - [`GraphqlError::MissingData`] when `data` is absent or `null`
    pub async fn execute(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, GraphqlError> {
        let mut response = self.query(query, variables).await?;

        if let Some(errors) = response.body.get("errors") {
            if let Some(error) = GraphqlError::from_errors(errors) {
                return Err(error);
            }
        }

        match response.body.get_mut("data").map(serde_json::Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(GraphqlError::MissingData),
        }
    }
}
