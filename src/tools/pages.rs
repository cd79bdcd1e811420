//! Online store page tools: `get-pages` and `get-page-by-id`.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{fetch, insert_some, node_result, page_result, parse_input, schema_of};
use super::{JsonObject, ShopifyTool, ToolError};
use crate::clients::GraphqlClient;
use crate::gid::to_gid;
use crate::pagination::PageArgs;
use crate::search_query::SearchQuery;

const GET_PAGES_QUERY: &str = r"
query GetPages(
  $first: Int
  $last: Int
  $after: String
  $before: String
  $query: String
  $sortKey: PageSortKeys
  $reverse: Boolean
) {
  pages(
    first: $first
    last: $last
    after: $after
    before: $before
    query: $query
    sortKey: $sortKey
    reverse: $reverse
  ) {
    edges {
      cursor
      node {
        id
        title
        handle
        bodySummary
        isPublished
        publishedAt
        createdAt
        updatedAt
        templateSuffix
      }
    }
    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
  }
}
";

const GET_PAGE_BY_ID_QUERY: &str = r"
query GetPageById($id: ID!) {
  page(id: $id) {
    id
    title
    handle
    body
    bodySummary
    isPublished
    publishedAt
    createdAt
    updatedAt
    templateSuffix
  }
}
";

/// Sort orders accepted by the `pages` connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PageSortKey {
    /// Numeric id.
    Id,
    /// Publication time.
    PublishedAt,
    /// Search relevance (only meaningful with a query).
    Relevance,
    /// Title.
    Title,
    /// Last update time.
    UpdatedAt,
}

/// Arguments of `get-pages`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPagesInput {
    #[serde(flatten)]
    page: PageArgs,
    /// Raw Shopify search query, combined with the other filters.
    #[serde(default)]
    query: Option<String>,
    /// Title prefix to match.
    #[serde(default)]
    title: Option<String>,
    /// Only published (`true`) or unpublished (`false`) pages.
    #[serde(default)]
    published: Option<bool>,
    /// Sort order.
    #[serde(default)]
    sort_key: Option<PageSortKey>,
    /// Reverse the sort order.
    #[serde(default)]
    reverse: Option<bool>,
}

/// Maps a `published` flag onto the `published_status` search field.
pub(crate) const fn published_status(published: bool) -> &'static str {
    if published {
        "published"
    } else {
        "unpublished"
    }
}

impl GetPagesInput {
    fn variables(&self) -> Result<Value, ToolError> {
        let mut variables = self.page.variables()?;
        let query = SearchQuery::new()
            .raw(self.query.as_deref())
            .prefix("title", self.title.as_deref())
            .term("published_status", self.published.map(published_status))
            .build();
        insert_some(&mut variables, "query", query);
        insert_some(&mut variables, "sortKey", self.sort_key);
        insert_some(&mut variables, "reverse", self.reverse);
        Ok(variables)
    }
}

/// Lists online store pages.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetPages;

#[async_trait]
impl ShopifyTool for GetPages {
    fn name(&self) -> &'static str {
        "get-pages"
    }

    fn description(&self) -> &'static str {
        "List online store pages. Supports cursor pagination, filtering by title, \
         publication state or a raw Shopify search query, and sorting."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetPagesInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetPagesInput = parse_input(arguments)?;
        let data = fetch(
            client,
            GET_PAGES_QUERY,
            input.variables()?,
            "Failed to fetch pages",
        )
        .await?;
        Ok(page_result(data, "pages", "pages"))
    }
}

/// Arguments of `get-page-by-id`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetPageByIdInput {
    /// Numeric page id or `gid://shopify/Page/<id>`.
    page_id: String,
}

/// Fetches one page including its HTML body.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetPageById;

#[async_trait]
impl ShopifyTool for GetPageById {
    fn name(&self) -> &'static str {
        "get-page-by-id"
    }

    fn description(&self) -> &'static str {
        "Get a single online store page by id, including its HTML body."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetPageByIdInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetPageByIdInput = parse_input(arguments)?;
        let id = to_gid("Page", &input.page_id)?;
        let data = fetch(
            client,
            GET_PAGE_BY_ID_QUERY,
            json!({ "id": id }),
            "Failed to fetch page",
        )
        .await?;
        node_result(data, "page", "Page", id, "Failed to fetch page")
    }
}
