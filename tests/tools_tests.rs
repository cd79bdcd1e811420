//! End-to-end tests for the MCP tools against a mock Admin API.
//!
//! Each test drives a tool through `ShopifyMcpServer::dispatch`, which runs
//! the same code path as an MCP `tools/call` request.

use rmcp::model::CallToolResult;
use serde_json::{json, Value};
use shopify_mcp::{AccessToken, ApiVersion, HostUrl, ShopDomain, ShopifyConfig, ShopifyMcpServer};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GRAPHQL_PATH: &str = "/admin/api/2025-10/graphql.json";

/// Creates a server whose Shopify requests go to `mock`.
fn create_test_server(mock: &MockServer) -> ShopifyMcpServer {
    let config = ShopifyConfig::builder()
        .shop(ShopDomain::new("test-shop").unwrap())
        .access_token(AccessToken::new("shpat_test_token").unwrap())
        .api_version(ApiVersion::V2025_10)
        .api_host(HostUrl::new(mock.uri()).unwrap())
        .build()
        .unwrap();
    ShopifyMcpServer::new(&config)
}

/// Mounts a GraphQL response for requests whose body contains `body`.
async fn mock_graphql(mock: &MockServer, body: Value, response: Value) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(header("X-Shopify-Access-Token", "shpat_test_token"))
        .and(body_partial_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
        .mount(mock)
        .await;
}

/// Runs a tool and returns `(is_error, text)`.
async fn call(server: &ShopifyMcpServer, name: &str, arguments: Value) -> (bool, String) {
    let result: CallToolResult = server
        .dispatch(name, arguments.as_object().cloned())
        .await
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    let is_error = json["isError"].as_bool().unwrap_or(false);
    let text = json["content"][0]["text"].as_str().unwrap().to_string();
    (is_error, text)
}

/// Runs a tool that is expected to succeed and parses its JSON output.
async fn call_ok(server: &ShopifyMcpServer, name: &str, arguments: Value) -> Value {
    let (is_error, text) = call(server, name, arguments).await;
    assert!(!is_error, "{name} failed: {text}");
    serde_json::from_str(&text).unwrap()
}

fn page_info(has_next: bool) -> Value {
    json!({
        "hasNextPage": has_next,
        "hasPreviousPage": false,
        "startCursor": "c1",
        "endCursor": "c2"
    })
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_get_products_unwraps_edges_and_passes_filters() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "first": 5, "query": "vendor:Acme AND status:active" } }),
        json!({ "data": { "products": {
            "edges": [
                { "cursor": "c1", "node": {
                    "id": "gid://shopify/Product/1",
                    "title": "Hat",
                    "variants": { "edges": [ { "node": { "sku": "HAT-1" } } ] }
                } },
                { "cursor": "c2", "node": { "id": "gid://shopify/Product/2", "title": "Scarf" } }
            ],
            "pageInfo": page_info(true)
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(
        &server,
        "get-products",
        json!({ "first": 5, "vendor": "Acme", "status": "active" }),
    )
    .await;

    assert_eq!(output["products"][0]["title"], "Hat");
    assert_eq!(output["products"][0]["variants"], json!([{ "sku": "HAT-1" }]));
    assert_eq!(output["products"][1]["id"], "gid://shopify/Product/2");
    assert_eq!(output["pageInfo"]["hasNextPage"], true);
    assert_eq!(output["pageInfo"]["endCursor"], "c2");
}

#[tokio::test]
async fn test_get_products_backward_page() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "first": null, "after": null, "last": 3, "before": "abc" } }),
        json!({ "data": { "products": { "edges": [], "pageInfo": page_info(false) } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(&server, "get-products", json!({ "last": 3, "before": "abc" })).await;

    assert_eq!(output["products"], json!([]));
}

#[tokio::test]
async fn test_get_products_graphql_errors_are_error_results() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({}),
        json!({ "errors": [ { "message": "Throttled", "extensions": { "code": "THROTTLED" } } ] }),
    )
    .await;

    let server = create_test_server(&mock);
    let (is_error, text) = call(&server, "get-products", json!({})).await;

    assert!(is_error);
    assert_eq!(text, "Failed to fetch products: GraphQL errors: [THROTTLED] Throttled");
}

#[tokio::test]
async fn test_get_products_unauthorized_is_error_result() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "errors": "[API] Invalid API key or access token" })),
        )
        .mount(&mock)
        .await;

    let server = create_test_server(&mock);
    let (is_error, text) = call(&server, "get-products", json!({})).await;

    assert!(is_error);
    assert!(text.starts_with("Failed to fetch products: HTTP 401: "), "{text}");
    assert!(text.contains("Invalid API key or access token"), "{text}");
}

#[tokio::test]
async fn test_get_product_by_id_normalizes_id_and_flattens() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "id": "gid://shopify/Product/42", "variantsFirst": 20 } }),
        json!({ "data": { "product": {
            "id": "gid://shopify/Product/42",
            "title": "Hat",
            "variants": { "edges": [ { "node": { "sku": "HAT-1" } }, { "node": { "sku": "HAT-2" } } ] }
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(&server, "get-product-by-id", json!({ "productId": "42" })).await;

    assert_eq!(output["product"]["title"], "Hat");
    assert_eq!(output["product"]["variants"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_product_by_id_not_found() {
    let mock = MockServer::start().await;
    mock_graphql(&mock, json!({}), json!({ "data": { "product": null } })).await;

    let server = create_test_server(&mock);
    let (is_error, text) = call(
        &server,
        "get-product-by-id",
        json!({ "productId": "gid://shopify/Product/999" }),
    )
    .await;

    assert!(is_error);
    assert_eq!(
        text,
        "Failed to fetch product: Product not found: gid://shopify/Product/999"
    );
}

// ============================================================================
// Collections and Pages
// ============================================================================

#[tokio::test]
async fn test_get_collections_smart_filter() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "query": "collection_type:smart" } }),
        json!({ "data": { "collections": {
            "edges": [ { "cursor": "c1", "node": { "id": "gid://shopify/Collection/7", "title": "Sale" } } ],
            "pageInfo": page_info(false)
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(&server, "get-collections", json!({ "collectionType": "smart" })).await;

    assert_eq!(output["collections"][0]["title"], "Sale");
}

#[tokio::test]
async fn test_get_collection_by_id_includes_products() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "id": "gid://shopify/Collection/7", "productsFirst": 4 } }),
        json!({ "data": { "collection": {
            "id": "gid://shopify/Collection/7",
            "products": { "edges": [ { "node": { "title": "Hat" } } ] }
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(
        &server,
        "get-collection-by-id",
        json!({ "collectionId": "7", "productsFirst": 4 }),
    )
    .await;

    assert_eq!(output["collection"]["products"], json!([{ "title": "Hat" }]));
}

#[tokio::test]
async fn test_get_pages_published_filter() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "query": "published_status:unpublished" } }),
        json!({ "data": { "pages": {
            "edges": [ { "cursor": "c1", "node": { "title": "Draft", "isPublished": false } } ],
            "pageInfo": page_info(false)
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(&server, "get-pages", json!({ "published": false })).await;

    assert_eq!(output["pages"][0]["isPublished"], false);
}

// ============================================================================
// Blogs and Articles
// ============================================================================

#[tokio::test]
async fn test_get_blog_by_id_lists_recent_articles() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "id": "gid://shopify/Blog/77", "articlesFirst": 10 } }),
        json!({ "data": { "blog": {
            "id": "gid://shopify/Blog/77",
            "title": "News",
            "articles": { "edges": [ { "node": { "title": "Launch" } } ] }
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(&server, "get-blog-by-id", json!({ "blogId": "77" })).await;

    assert_eq!(output["blog"]["articles"][0]["title"], "Launch");
}

#[tokio::test]
async fn test_get_articles_scoped_to_blog() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "blogId": "gid://shopify/Blog/77", "first": 2 } }),
        json!({ "data": { "blog": {
            "id": "gid://shopify/Blog/77",
            "title": "News",
            "handle": "news",
            "articles": {
                "edges": [ { "cursor": "c1", "node": { "title": "Launch" } } ],
                "pageInfo": page_info(false)
            }
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(&server, "get-articles", json!({ "blogId": "77", "first": 2 })).await;

    assert_eq!(output["articles"], json!([{ "title": "Launch" }]));
    assert_eq!(output["blog"], json!({ "id": "gid://shopify/Blog/77", "title": "News", "handle": "news" }));
    assert_eq!(output["pageInfo"]["hasNextPage"], false);
}

#[tokio::test]
async fn test_get_articles_unknown_blog_is_not_found() {
    let mock = MockServer::start().await;
    mock_graphql(&mock, json!({}), json!({ "data": { "blog": null } })).await;

    let server = create_test_server(&mock);
    let (is_error, text) = call(&server, "get-articles", json!({ "blogId": "404" })).await;

    assert!(is_error);
    assert_eq!(text, "Failed to fetch articles: Blog not found: gid://shopify/Blog/404");
}

#[tokio::test]
async fn test_get_article_by_id() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "id": "gid://shopify/Article/5" } }),
        json!({ "data": { "article": { "id": "gid://shopify/Article/5", "body": "<p>Hi</p>" } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(&server, "get-article-by-id", json!({ "articleId": "5" })).await;

    assert_eq!(output["article"]["body"], "<p>Hi</p>");
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_get_orders_date_range_in_utc() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": {
            "query": r#"status:open AND created_at:>="2025-01-01T00:00:00Z" AND created_at:<="2025-01-31T23:59:59Z""#
        } }),
        json!({ "data": { "orders": {
            "edges": [ { "cursor": "c1", "node": { "name": "#1001" } } ],
            "pageInfo": page_info(false)
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(
        &server,
        "get-orders",
        json!({
            "status": "open",
            "createdAtMin": "2025-01-01",
            "createdAtMax": "2025-01-31T23:59:59Z"
        }),
    )
    .await;

    assert_eq!(output["orders"][0]["name"], "#1001");
}

#[tokio::test]
async fn test_get_order_by_id_flattens_line_items() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": { "id": "gid://shopify/Order/1001", "lineItemsFirst": 50 } }),
        json!({ "data": { "order": {
            "name": "#1001",
            "lineItems": { "edges": [ { "node": { "title": "Hat", "quantity": 2 } } ] }
        } } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(&server, "get-order-by-id", json!({ "orderId": "1001" })).await;

    assert_eq!(output["order"]["lineItems"][0]["quantity"], 2);
}

// ============================================================================
// Search
// ============================================================================

#[tokio::test]
async fn test_search_counts_results_across_types() {
    let mock = MockServer::start().await;
    mock_graphql(
        &mock,
        json!({ "variables": {
            "query": "hat",
            "first": 3,
            "includeProducts": true,
            "includeCollections": true,
            "includePages": false,
            "includeBlogs": false,
            "includeArticles": false,
            "includeOrders": false
        } }),
        json!({ "data": {
            "products": { "edges": [ { "node": { "title": "Hat" } }, { "node": { "title": "Top Hat" } } ] },
            "collections": { "edges": [ { "node": { "title": "Hats" } } ] }
        } }),
    )
    .await;

    let server = create_test_server(&mock);
    let output = call_ok(
        &server,
        "search-shopify",
        json!({ "query": "  hat ", "types": ["collection", "product"], "first": 3 }),
    )
    .await;

    assert_eq!(output["query"], "hat");
    assert_eq!(output["totalCount"], 3);
    assert_eq!(output["results"]["products"][1]["title"], "Top Hat");
    assert_eq!(output["results"]["collections"][0]["title"], "Hats");
    assert!(output["results"].get("orders").is_none());
}

// ============================================================================
// Argument Validation
// ============================================================================

#[tokio::test]
async fn test_invalid_arguments_never_reach_shopify() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&mock)
        .await;

    let server = create_test_server(&mock);
    let cases = [
        ("get-products", json!({ "first": 10, "limit": 10 })),
        ("get-products", json!({ "first": 251 })),
        ("get-collections", json!({ "first": 2, "before": "abc" })),
        ("get-pages", json!({ "after": "" })),
        ("get-product-by-id", json!({ "productId": "gid://shopify/Order/1" })),
        ("get-orders", json!({ "createdAtMin": "yesterday" })),
        ("search-shopify", json!({ "query": "" })),
        ("get-blog-by-id", json!({})),
        ("get-orders", json!({ "created_at_min": "garbage", "frist": 999 })),
    ];

    for (name, arguments) in cases {
        let error = server
            .dispatch(name, arguments.as_object().cloned())
            .await
            .unwrap_err();
        assert!(!error.message.is_empty(), "{name}: {arguments}");
    }
}
