//! `search-shopify`: one query across several resource types.
//!
//! A single document covers every type; `@include` directives switch the
//! unwanted connections off, so the query text never changes.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{fetch, parse_input, schema_of, JsonObject, ShopifyTool, ToolError};
use crate::clients::GraphqlClient;
use crate::pagination::{page_size, Page};

const SEARCH_QUERY: &str = r"
query SearchShopify(
  $query: String!
  $first: Int!
  $includeProducts: Boolean!
  $includeCollections: Boolean!
  $includePages: Boolean!
  $includeBlogs: Boolean!
  $includeArticles: Boolean!
  $includeOrders: Boolean!
) {
  products(first: $first, query: $query) @include(if: $includeProducts) {
    edges { node { id title handle status vendor productType } }
  }
  collections(first: $first, query: $query) @include(if: $includeCollections) {
    edges { node { id title handle updatedAt } }
  }
  pages(first: $first, query: $query) @include(if: $includePages) {
    edges { node { id title handle isPublished updatedAt } }
  }
  blogs(first: $first, query: $query) @include(if: $includeBlogs) {
    edges { node { id title handle } }
  }
  articles(first: $first, query: $query) @include(if: $includeArticles) {
    edges { node { id title handle isPublished publishedAt blog { id title } } }
  }
  orders(first: $first, query: $query) @include(if: $includeOrders) {
    edges { node { id name email createdAt displayFinancialStatus displayFulfillmentStatus } }
  }
}
";

/// A resource type `search-shopify` can look in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Products.
    Product,
    /// Collections.
    Collection,
    /// Online store pages.
    Page,
    /// Blogs.
    Blog,
    /// Blog articles.
    Article,
    /// Orders.
    Order,
}

impl SearchType {
    /// Every type, in result order.
    pub const ALL: [Self; 6] = [
        Self::Product,
        Self::Collection,
        Self::Page,
        Self::Blog,
        Self::Article,
        Self::Order,
    ];

    /// The root connection field, also used as the result key.
    const fn field(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Collection => "collections",
            Self::Page => "pages",
            Self::Blog => "blogs",
            Self::Article => "articles",
            Self::Order => "orders",
        }
    }

    /// The `@include` variable for this type.
    const fn include_variable(self) -> &'static str {
        match self {
            Self::Product => "includeProducts",
            Self::Collection => "includeCollections",
            Self::Page => "includePages",
            Self::Blog => "includeBlogs",
            Self::Article => "includeArticles",
            Self::Order => "includeOrders",
        }
    }
}

/// Arguments of `search-shopify`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchInput {
    /// Shopify search query text, e.g. `snowboard` or `title:hat*`.
    query: String,
    /// Resource types to search (default: all).
    #[serde(default)]
    types: Option<Vec<SearchType>>,
    /// Maximum results per type (1-250, default 10).
    #[serde(default)]
    first: Option<u32>,
}

impl SearchInput {
    /// Returns the query text, the selected types and the variables.
    fn variables(&self) -> Result<(Vec<SearchType>, Value), ToolError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(ToolError::invalid_input("'query' must not be empty"));
        }

        let types = match &self.types {
            Some(types) if types.is_empty() => {
                return Err(ToolError::invalid_input(
                    "'types' must name at least one resource type",
                ))
            }
            Some(types) => SearchType::ALL
                .into_iter()
                .filter(|t| types.contains(t))
                .collect(),
            None => SearchType::ALL.to_vec(),
        };

        let mut variables = json!({
            "query": query,
            "first": page_size("first", self.first, 10)?,
        });
        if let Some(object) = variables.as_object_mut() {
            for search_type in SearchType::ALL {
                object.insert(
                    search_type.include_variable().to_string(),
                    Value::Bool(types.contains(&search_type)),
                );
            }
        }
        Ok((types, variables))
    }
}

/// Searches several resource types with one Shopify search query.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchShopify;

#[async_trait]
impl ShopifyTool for SearchShopify {
    fn name(&self) -> &'static str {
        "search-shopify"
    }

    fn description(&self) -> &'static str {
        "Search products, collections, pages, blogs, articles and orders with a single \
         Shopify search query. Restrict the resource types with 'types'."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<SearchInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: SearchInput = parse_input(arguments)?;
        let (types, variables) = input.variables()?;
        let mut data = fetch(client, SEARCH_QUERY, variables, "Failed to search store").await?;

        let mut results = JsonObject::new();
        let mut total_count = 0;
        for search_type in types {
            let connection = data
                .get_mut(search_type.field())
                .map(Value::take)
                .unwrap_or_default();
            let items = Page::from_connection(connection).items;
            total_count += items.len();
            results.insert(search_type.field().to_string(), Value::Array(items));
        }

        Ok(json!({
            "query": input.query.trim(),
            "results": results,
            "totalCount": total_count,
        }))
    }
}
