//! Product tools: `get-products` and `get-product-by-id`.

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

const GET_PRODUCTS_QUERY: &str = r"
query GetProducts(
  $first: Int
  $last: Int
  $after: String
  $before: String
  $query: String
  $sortKey: ProductSortKeys
  $reverse: Boolean
) {
  products(
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
        status
        vendor
        productType
        tags
        totalInventory
        onlineStoreUrl
        createdAt
        updatedAt
        priceRangeV2 {
          minVariantPrice { amount currencyCode }
          maxVariantPrice { amount currencyCode }
        }
        featuredMedia {
          preview { image { url altText } }
        }
      }
    }
    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
  }
}
";

const GET_PRODUCT_BY_ID_QUERY: &str = r"
query GetProductById($id: ID!, $variantsFirst: Int!) {
  product(id: $id) {
    id
    title
    handle
    description
    descriptionHtml
    status
    vendor
    productType
    tags
    totalInventory
    onlineStoreUrl
    createdAt
    updatedAt
    publishedAt
    seo { title description }
    options { id name values }
    priceRangeV2 {
      minVariantPrice { amount currencyCode }
      maxVariantPrice { amount currencyCode }
    }
    collections(first: 10) {
      edges { node { id title handle } }
    }
    media(first: 20) {
      edges {
        node {
          alt
          mediaContentType
          preview { image { url altText width height } }
        }
      }
    }
    variants(first: $variantsFirst) {
      edges {
        node {
          id
          title
          sku
          barcode
          price
          compareAtPrice
          inventoryQuantity
          availableForSale
          selectedOptions { name value }
        }
      }
    }
  }
}
";

/// Product lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Visible on sales channels.
    Active,
    /// Hidden and no longer sold.
    Archived,
    /// Not yet published.
    Draft,
}

impl ProductStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Archived => "archived",
            Self::Draft => "draft",
        }
    }
}

/// Sort orders accepted by the `products` connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    /// Creation time.
    CreatedAt,
    /// Numeric id.
    Id,
    /// Total inventory across variants.
    InventoryTotal,
    /// Product type.
    ProductType,
    /// Publication time.
    PublishedAt,
    /// Search relevance (only meaningful with a query).
    Relevance,
    /// Title.
    Title,
    /// Last update time.
    UpdatedAt,
    /// Vendor.
    Vendor,
}

/// Arguments of `get-products`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetProductsInput {
    #[serde(flatten)]
    page: PageArgs,
    /// Raw Shopify search query, combined with the other filters.
    #[serde(default)]
    query: Option<String>,
    /// Title prefix to match.
    #[serde(default)]
    title: Option<String>,
    /// Exact vendor name.
    #[serde(default)]
    vendor: Option<String>,
    /// Exact product type.
    #[serde(default)]
    product_type: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    status: Option<ProductStatus>,
    /// Sort order.
    #[serde(default)]
    sort_key: Option<ProductSortKey>,
    /// Reverse the sort order.
    #[serde(default)]
    reverse: Option<bool>,
}

impl GetProductsInput {
    fn variables(&self) -> Result<Value, ToolError> {
        let mut variables = self.page.variables()?;
        let query = SearchQuery::new()
            .raw(self.query.as_deref())
            .prefix("title", self.title.as_deref())
            .term("vendor", self.vendor.as_deref())
            .term("product_type", self.product_type.as_deref())
            .term("status", self.status.map(ProductStatus::as_str))
            .build();
        insert_some(&mut variables, "query", query);
        insert_some(&mut variables, "sortKey", self.sort_key);
        insert_some(&mut variables, "reverse", self.reverse);
        Ok(variables)
    }
}

/// Lists products with cursor pagination and filters.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetProducts;

#[async_trait]
impl ShopifyTool for GetProducts {
    fn name(&self) -> &'static str {
        "get-products"
    }

    fn description(&self) -> &'static str {
        "List products in the store. Supports cursor pagination (first/after or last/before), \
         filtering by title, vendor, product type, status or a raw Shopify search query, and sorting."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetProductsInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetProductsInput = parse_input(arguments)?;
        let data = fetch(
            client,
            GET_PRODUCTS_QUERY,
            input.variables()?,
            "Failed to fetch products",
        )
        .await?;
        Ok(page_result(data, "products", "products"))
    }
}

/// Arguments of `get-product-by-id`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetProductByIdInput {
    /// Numeric product id or `gid://shopify/Product/<id>`.
    product_id: String,
    /// Number of variants to include (1-250, default 20).
    #[serde(default)]
    variants_first: Option<u32>,
}

/// Fetches one product with its variants, media and collections.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetProductById;

#[async_trait]
impl ShopifyTool for GetProductById {
    fn name(&self) -> &'static str {
        "get-product-by-id"
    }

    fn description(&self) -> &'static str {
        "Get a single product by id, including variants, media, options and collections."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetProductByIdInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetProductByIdInput = parse_input(arguments)?;
        let id = to_gid("Product", &input.product_id)?;
        let variables = json!({
            "id": id,
            "variantsFirst": page_size("variantsFirst", input.variants_first, 20)?,
        });

        let data = fetch(
            client,
            GET_PRODUCT_BY_ID_QUERY,
            variables,
            "Failed to fetch product",
        )
        .await?;
        node_result(data, "product", "Product", id, "Failed to fetch product")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(value: Value) -> GetProductsInput {
        parse_input(value).unwrap()
    }

    #[test]
    fn test_default_variables_page_forward() {
        let variables = input(json!({})).variables().unwrap();
        assert_eq!(
            variables,
            json!({"first": 10, "after": null, "last": null, "before": null})
        );
    }

    #[test]
    fn test_filters_build_search_query() {
        let variables = input(json!({
            "limit": 3,
            "title": "Snow",
            "vendor": "Acme Co",
            "status": "active",
            "sortKey": "UPDATED_AT",
            "reverse": true
        }))
        .variables()
        .unwrap();

        assert_eq!(variables["first"], 3);
        assert_eq!(
            variables["query"],
            r#"title:Snow* AND vendor:"Acme Co" AND status:active"#
        );
        assert_eq!(variables["sortKey"], "UPDATED_AT");
        assert_eq!(variables["reverse"], true);
    }

    #[test]
    fn test_unknown_sort_key_is_rejected() {
        let result = parse_input::<GetProductsInput>(json!({"sortKey": "price"}));
        assert!(result.unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_pagination_conflicts_surface_as_invalid_input() {
        let error = input(json!({"first": 1, "last": 1})).variables().unwrap_err();
        assert!(error.is_invalid_input());
    }

    #[test]
    fn test_queries_declare_every_variable_they_use() {
        for variable in ["$first", "$last", "$after", "$before", "$query", "$sortKey", "$reverse"] {
            assert!(GET_PRODUCTS_QUERY.contains(variable), "{variable}");
        }
        assert!(GET_PRODUCT_BY_ID_QUERY.contains("$variantsFirst: Int!"));
    }
}
