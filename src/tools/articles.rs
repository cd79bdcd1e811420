//! Article tools: `get-articles` and `get-article-by-id`.
//!
//! `get-articles` reads the shop-wide `articles` connection, or the
//! `articles` connection of one blog when `blogId` is given.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::pages::published_status;
use super::{fetch, insert_some, node_result, page_result, parse_input, schema_of};
use super::{JsonObject, ShopifyTool, ToolError};
use crate::clients::GraphqlClient;
use crate::gid::to_gid;
use crate::pagination::PageArgs;
use crate::search_query::SearchQuery;

const GET_ARTICLES_QUERY: &str = r"
query GetArticles(
  $first: Int
  $last: Int
  $after: String
  $before: String
  $query: String
  $sortKey: ArticleSortKeys
  $reverse: Boolean
) {
  articles(
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
        summary
        isPublished
        publishedAt
        createdAt
        updatedAt
        tags
        author { name }
        blog { id title handle }
        image { url altText }
      }
    }
    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
  }
}
";

const GET_BLOG_ARTICLES_QUERY: &str = r"
query GetBlogArticles(
  $blogId: ID!
  $first: Int
  $last: Int
  $after: String
  $before: String
  $query: String
  $sortKey: ArticleSortKeys
  $reverse: Boolean
) {
  blog(id: $blogId) {
    id
    title
    handle
    articles(
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
          summary
          isPublished
          publishedAt
          createdAt
          updatedAt
          tags
          author { name }
          image { url altText }
        }
      }
      pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
    }
  }
}
";

const GET_ARTICLE_BY_ID_QUERY: &str = r"
query GetArticleById($id: ID!) {
  article(id: $id) {
    id
    title
    handle
    body
    summary
    isPublished
    publishedAt
    createdAt
    updatedAt
    tags
    templateSuffix
    author { name }
    blog { id title handle }
    image { url altText width height }
    commentsCount { count }
  }
}
";

/// Sort orders accepted by `articles` connections.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArticleSortKey {
    /// Author name.
    Author,
    /// Title of the owning blog.
    BlogTitle,
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

/// Arguments of `get-articles`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetArticlesInput {
    #[serde(flatten)]
    page: PageArgs,
    /// Only list articles of this blog (numeric id or `gid://shopify/Blog/<id>`).
    #[serde(default)]
    blog_id: Option<String>,
    /// Raw Shopify search query, combined with the other filters.
    #[serde(default)]
    query: Option<String>,
    /// Title prefix to match.
    #[serde(default)]
    title: Option<String>,
    /// Exact author name.
    #[serde(default)]
    author: Option<String>,
    /// Tag the article must carry.
    #[serde(default)]
    tag: Option<String>,
    /// Only published (`true`) or unpublished (`false`) articles.
    #[serde(default)]
    published: Option<bool>,
    /// Sort order.
    #[serde(default)]
    sort_key: Option<ArticleSortKey>,
    /// Reverse the sort order.
    #[serde(default)]
    reverse: Option<bool>,
}

impl GetArticlesInput {
    /// Returns the blog GID (if scoped) and the query variables.
    fn variables(&self) -> Result<(Option<String>, Value), ToolError> {
        let mut variables = self.page.variables()?;
        let blog_id = self
            .blog_id
            .as_deref()
            .map(|id| to_gid("Blog", id))
            .transpose()?;

        let query = SearchQuery::new()
            .raw(self.query.as_deref())
            .prefix("title", self.title.as_deref())
            .term("author", self.author.as_deref())
            .term("tag", self.tag.as_deref())
            .term("published_status", self.published.map(published_status))
            .build();
        insert_some(&mut variables, "blogId", blog_id.as_deref());
        insert_some(&mut variables, "query", query);
        insert_some(&mut variables, "sortKey", self.sort_key);
        insert_some(&mut variables, "reverse", self.reverse);
        Ok((blog_id, variables))
    }
}

/// Lists blog articles, optionally within one blog.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetArticles;

#[async_trait]
impl ShopifyTool for GetArticles {
    fn name(&self) -> &'static str {
        "get-articles"
    }

    fn description(&self) -> &'static str {
        "List blog articles across all blogs, or within one blog when blogId is given. \
         Supports cursor pagination, filtering by title, author, tag, publication state \
         or a raw Shopify search query, and sorting."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetArticlesInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        const CONTEXT: &str = "Failed to fetch articles";

        let input: GetArticlesInput = parse_input(arguments)?;
        let (blog_id, variables) = input.variables()?;

        let Some(blog_id) = blog_id else {
            let data = fetch(client, GET_ARTICLES_QUERY, variables, CONTEXT).await?;
            return Ok(page_result(data, "articles", "articles"));
        };

        let data = fetch(client, GET_BLOG_ARTICLES_QUERY, variables, CONTEXT).await?;
        let Some(mut blog) = data.get("blog").filter(|blog| !blog.is_null()).cloned() else {
            return Err(ToolError::NotFound {
                context: CONTEXT,
                resource: "Blog",
                id: blog_id,
            });
        };

        let articles = blog
            .as_object_mut()
            .and_then(|blog| blog.remove("articles"))
            .unwrap_or_default();
        let mut result = page_result(json!({ "articles": articles }), "articles", "articles");
        if let Some(result) = result.as_object_mut() {
            result.insert("blog".to_string(), blog);
        }
        Ok(result)
    }
}

/// Arguments of `get-article-by-id`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetArticleByIdInput {
    /// Numeric article id or `gid://shopify/Article/<id>`.
    article_id: String,
}

/// Fetches one article including its HTML body.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetArticleById;

#[async_trait]
impl ShopifyTool for GetArticleById {
    fn name(&self) -> &'static str {
        "get-article-by-id"
    }

    fn description(&self) -> &'static str {
        "Get a single blog article by id, including its HTML body, author and blog."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetArticleByIdInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetArticleByIdInput = parse_input(arguments)?;
        let id = to_gid("Article", &input.article_id)?;
        let data = fetch(
            client,
            GET_ARTICLE_BY_ID_QUERY,
            json!({ "id": id }),
            "Failed to fetch article",
        )
        .await?;
        node_result(data, "article", "Article", id, "Failed to fetch article")
    }
}
