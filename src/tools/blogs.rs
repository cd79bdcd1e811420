//! Blog tools: `get-blogs` and `get-blog-by-id`.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{fetch, insert_some, node_result, page_result, parse_input, schema_of};
use super::{JsonObject, ShopifyTool, ToolError};
use crate::clients::GraphqlClient;
use crate::gid::to_gid;
use crate::pagination::{page_size, PageArgs};
use crate::search_query::SearchQuery;

const GET_BLOGS_QUERY: &str = r"
query GetBlogs(
  $first: Int
  $last: Int
  $after: String
  $before: String
  $query: String
  $sortKey: BlogSortKeys
  $reverse: Boolean
) {
  blogs(
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
        commentPolicy
        tags
        templateSuffix
        createdAt
        updatedAt
        articlesCount { count }
        feed { location path }
      }
    }
    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
  }
}
";

const GET_BLOG_BY_ID_QUERY: &str = r"
query GetBlogById($id: ID!, $articlesFirst: Int!) {
  blog(id: $id) {
    id
    title
    handle
    commentPolicy
    tags
    templateSuffix
    createdAt
    updatedAt
    articlesCount { count }
    feed { location path }
    articles(first: $articlesFirst, sortKey: PUBLISHED_AT, reverse: true) {
      edges {
        node {
          id
          title
          handle
          summary
          isPublished
          publishedAt
          tags
          author { name }
        }
      }
    }
  }
}
";

/// Sort orders accepted by the `blogs` connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlogSortKey {
    /// Handle.
    Handle,
    /// Numeric id.
    Id,
    /// Title.
    Title,
}

/// Arguments of `get-blogs`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetBlogsInput {
    #[serde(flatten)]
    page: PageArgs,
    /// Raw Shopify search query, combined with the other filters.
    #[serde(default)]
    query: Option<String>,
    /// Title prefix to match.
    #[serde(default)]
    title: Option<String>,
    /// Sort order.
    #[serde(default)]
    sort_key: Option<BlogSortKey>,
    /// Reverse the sort order.
    #[serde(default)]
    reverse: Option<bool>,
}

impl GetBlogsInput {
    fn variables(&self) -> Result<Value, ToolError> {
        let mut variables = self.page.variables()?;
        let query = SearchQuery::new()
            .raw(self.query.as_deref())
            .prefix("title", self.title.as_deref())
            .build();
        insert_some(&mut variables, "query", query);
        insert_some(&mut variables, "sortKey", self.sort_key);
        insert_some(&mut variables, "reverse", self.reverse);
        Ok(variables)
    }
}

/// Lists blogs.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetBlogs;

#[async_trait]
impl ShopifyTool for GetBlogs {
    fn name(&self) -> &'static str {
        "get-blogs"
    }

    fn description(&self) -> &'static str {
        "List the store's blogs. Supports cursor pagination, filtering by title or a raw \
         Shopify search query, and sorting."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetBlogsInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetBlogsInput = parse_input(arguments)?;
        let data = fetch(
            client,
            GET_BLOGS_QUERY,
            input.variables()?,
            "Failed to fetch blogs",
        )
        .await?;
        Ok(page_result(data, "blogs", "blogs"))
    }
}

/// Arguments of `get-blog-by-id`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetBlogByIdInput {
    /// Numeric blog id or `gid://shopify/Blog/<id>`.
    blog_id: String,
    /// Number of most recent articles to include (1-250, default 10).
    #[serde(default)]
    articles_first: Option<u32>,
}

/// Fetches one blog with its latest articles.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetBlogById;

#[async_trait]
impl ShopifyTool for GetBlogById {
    fn name(&self) -> &'static str {
        "get-blog-by-id"
    }

    fn description(&self) -> &'static str {
        "Get a single blog by id, including its most recently published articles."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetBlogByIdInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetBlogByIdInput = parse_input(arguments)?;
        let id = to_gid("Blog", &input.blog_id)?;
        let variables = json!({
            "id": id,
            "articlesFirst": page_size("articlesFirst", input.articles_first, 10)?,
        });

        let data = fetch(client, GET_BLOG_BY_ID_QUERY, variables, "Failed to fetch blog").await?;
        node_result(data, "blog", "Blog", id, "Failed to fetch blog")
    }
}
