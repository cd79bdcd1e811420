//! Collection tools: `get-collections` and `get-collection-by-id`.

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

const GET_COLLECTIONS_QUERY: &str = r"
query GetCollections(
  $first: Int
  $last: Int
  $after: String
  $before: String
  $query: String
  $sortKey: CollectionSortKeys
  $reverse: Boolean
) {
  collections(
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
        description
        sortOrder
        updatedAt
        productsCount { count }
        ruleSet {
          appliedDisjunctively
          rules { column relation condition }
        }
        image { url altText }
      }
    }
    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
  }
}
";

const GET_COLLECTION_BY_ID_QUERY: &str = r"
query GetCollectionById($id: ID!, $productsFirst: Int!) {
  collection(id: $id) {
    id
    title
    handle
    description
    descriptionHtml
    sortOrder
    templateSuffix
    updatedAt
    seo { title description }
    image { url altText width height }
    productsCount { count }
    ruleSet {
      appliedDisjunctively
      rules { column relation condition }
    }
    products(first: $productsFirst) {
      edges {
        node {
          id
          title
          handle
          status
          vendor
          productType
          priceRangeV2 {
            minVariantPrice { amount currencyCode }
            maxVariantPrice { amount currencyCode }
          }
        }
      }
    }
  }
}
";

/// How a collection picks its products.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    /// Products are matched by rules.
    Smart,
    /// Products are added by hand.
    Custom,
}

impl CollectionType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Smart => "smart",
            Self::Custom => "custom",
        }
    }
}

/// Sort orders accepted by the `collections` connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionSortKey {
    /// Numeric id.
    Id,
    /// Search relevance (only meaningful with a query).
    Relevance,
    /// Title.
    Title,
    /// Last update time.
    UpdatedAt,
}

/// Arguments of `get-collections`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCollectionsInput {
    #[serde(flatten)]
    page: PageArgs,
    /// Raw Shopify search query, combined with the other filters.
    #[serde(default)]
    query: Option<String>,
    /// Title prefix to match.
    #[serde(default)]
    title: Option<String>,
    /// Restrict to smart or custom collections.
    #[serde(default)]
    collection_type: Option<CollectionType>,
    /// Sort order.
    #[serde(default)]
    sort_key: Option<CollectionSortKey>,
    /// Reverse the sort order.
    #[serde(default)]
    reverse: Option<bool>,
}

impl GetCollectionsInput {
    fn variables(&self) -> Result<Value, ToolError> {
        let mut variables = self.page.variables()?;
        let query = SearchQuery::new()
            .raw(self.query.as_deref())
            .prefix("title", self.title.as_deref())
            .term(
                "collection_type",
                self.collection_type.map(CollectionType::as_str),
            )
            .build();
        insert_some(&mut variables, "query", query);
        insert_some(&mut variables, "sortKey", self.sort_key);
        insert_some(&mut variables, "reverse", self.reverse);
        Ok(variables)
    }
}

/// Lists collections with cursor pagination and filters.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetCollections;

#[async_trait]
impl ShopifyTool for GetCollections {
    fn name(&self) -> &'static str {
        "get-collections"
    }

    fn description(&self) -> &'static str {
        "List collections in the store. Supports cursor pagination, filtering by title, \
         collection type (smart or custom) or a raw Shopify search query, and sorting."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetCollectionsInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetCollectionsInput = parse_input(arguments)?;
        let data = fetch(
            client,
            GET_COLLECTIONS_QUERY,
            input.variables()?,
            "Failed to fetch collections",
        )
        .await?;
        Ok(page_result(data, "collections", "collections"))
    }
}

/// Arguments of `get-collection-by-id`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCollectionByIdInput {
    /// Numeric collection id or `gid://shopify/Collection/<id>`.
    collection_id: String,
    /// Number of products to include (1-250, default 10).
    #[serde(default)]
    products_first: Option<u32>,
}

/// Fetches one collection with its products.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetCollectionById;

#[async_trait]
impl ShopifyTool for GetCollectionById {
    fn name(&self) -> &'static str {
        "get-collection-by-id"
    }

    fn description(&self) -> &'static str {
        "Get a single collection by id, including its rules and the first page of its products."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetCollectionByIdInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetCollectionByIdInput = parse_input(arguments)?;
        let id = to_gid("Collection", &input.collection_id)?;
        let variables = json!({
            "id": id,
            "productsFirst": page_size("productsFirst", input.products_first, 10)?,
        });

        let data = fetch(
            client,
            GET_COLLECTION_BY_ID_QUERY,
            variables,
            "Failed to fetch collection",
        )
        .await?;
        node_result(
            data,
            "collection",
            "Collection",
            id,
            "Failed to fetch collection",
        )
    }
}
