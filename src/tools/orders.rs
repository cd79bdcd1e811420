//! Order tools: `get-orders` and `get-order-by-id`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{fetch, insert_some, node_result, page_result, parse_input, schema_of};
use super::{JsonObject, ShopifyTool, ToolError};
use crate::clients::GraphqlClient;
use crate::gid::to_gid;
use crate::pagination::{page_size, PageArgs};
use crate::search_query::{Comparison, SearchQuery};

const GET_ORDERS_QUERY: &str = r"
query GetOrders(
  $first: Int
  $last: Int
  $after: String
  $before: String
  $query: String
  $sortKey: OrderSortKeys
  $reverse: Boolean
) {
  orders(
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
        name
        email
        createdAt
        updatedAt
        processedAt
        cancelledAt
        closedAt
        displayFinancialStatus
        displayFulfillmentStatus
        tags
        note
        totalPriceSet { shopMoney { amount currencyCode } }
        subtotalPriceSet { shopMoney { amount currencyCode } }
        customer { id displayName email }
      }
    }
    pageInfo { hasNextPage hasPreviousPage startCursor endCursor }
  }
}
";

const GET_ORDER_BY_ID_QUERY: &str = r"
query GetOrderById($id: ID!, $lineItemsFirst: Int!) {
  order(id: $id) {
    id
    name
    email
    phone
    createdAt
    updatedAt
    processedAt
    cancelledAt
    cancelReason
    closedAt
    displayFinancialStatus
    displayFulfillmentStatus
    tags
    note
    currencyCode
    totalPriceSet { shopMoney { amount currencyCode } }
    subtotalPriceSet { shopMoney { amount currencyCode } }
    totalShippingPriceSet { shopMoney { amount currencyCode } }
    totalTaxSet { shopMoney { amount currencyCode } }
    totalDiscountsSet { shopMoney { amount currencyCode } }
    customer { id displayName email phone }
    shippingAddress {
      name
      address1
      address2
      city
      province
      zip
      country
      phone
    }
    lineItems(first: $lineItemsFirst) {
      edges {
        node {
          id
          title
          quantity
          sku
          variantTitle
          vendor
          originalUnitPriceSet { shopMoney { amount currencyCode } }
          variant { id title }
        }
      }
    }
    fulfillments(first: 20) {
      id
      status
      createdAt
      trackingInfo { company number url }
    }
  }
}
";

/// Order state filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Open orders.
    Open,
    /// Closed (archived) orders.
    Closed,
    /// Cancelled orders.
    Cancelled,
    /// No status filter.
    Any,
}

impl OrderStatus {
    const fn search_value(self) -> Option<&'static str> {
        match self {
            Self::Open => Some("open"),
            Self::Closed => Some("closed"),
            Self::Cancelled => Some("cancelled"),
            Self::Any => None,
        }
    }
}

/// Payment state filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FinancialStatus {
    /// Payment authorized but not captured.
    Authorized,
    /// Payment expired before capture.
    Expired,
    /// Fully paid.
    Paid,
    /// Partially paid.
    PartiallyPaid,
    /// Partially refunded.
    PartiallyRefunded,
    /// Awaiting payment.
    Pending,
    /// Fully refunded.
    Refunded,
    /// No payment received.
    Unpaid,
    /// Payment voided.
    Voided,
}

impl FinancialStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::Expired => "expired",
            Self::Paid => "paid",
            Self::PartiallyPaid => "partially_paid",
            Self::PartiallyRefunded => "partially_refunded",
            Self::Pending => "pending",
            Self::Refunded => "refunded",
            Self::Unpaid => "unpaid",
            Self::Voided => "voided",
        }
    }
}

/// Fulfillment state filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    /// Fully shipped.
    Shipped,
    /// Partially shipped.
    Partial,
    /// Nothing shipped yet.
    Unshipped,
    /// Unshipped or partially shipped.
    Unfulfilled,
}

impl FulfillmentStatus {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Shipped => "shipped",
            Self::Partial => "partial",
            Self::Unshipped => "unshipped",
            Self::Unfulfilled => "unfulfilled",
        }
    }
}

/// Sort orders accepted by the `orders` connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSortKey {
    /// Creation time.
    CreatedAt,
    /// Customer name.
    CustomerName,
    /// Payment state.
    FinancialStatus,
    /// Fulfillment state.
    FulfillmentStatus,
    /// Numeric id.
    Id,
    /// Order number.
    OrderNumber,
    /// Processing time.
    ProcessedAt,
    /// Search relevance (only meaningful with a query).
    Relevance,
    /// Order total.
    TotalPrice,
    /// Last update time.
    UpdatedAt,
}

/// Arguments of `get-orders`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetOrdersInput {
    #[serde(flatten)]
    page: PageArgs,
    /// Raw Shopify search query, combined with the other filters.
    #[serde(default)]
    query: Option<String>,
    /// Order state (default: Shopify's default of open and closed orders).
    #[serde(default)]
    status: Option<OrderStatus>,
    /// Payment state.
    #[serde(default)]
    financial_status: Option<FinancialStatus>,
    /// Fulfillment state.
    #[serde(default)]
    fulfillment_status: Option<FulfillmentStatus>,
    /// Earliest creation time, RFC 3339 or `YYYY-MM-DD`.
    #[serde(default)]
    created_at_min: Option<String>,
    /// Latest creation time, RFC 3339 or `YYYY-MM-DD`.
    #[serde(default)]
    created_at_max: Option<String>,
    /// Customer email address.
    #[serde(default)]
    email: Option<String>,
    /// Sort order.
    #[serde(default)]
    sort_key: Option<OrderSortKey>,
    /// Reverse the sort order.
    #[serde(default)]
    reverse: Option<bool>,
}

/// Parses an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
fn parse_timestamp(name: &str, value: &str) -> Result<DateTime<Utc>, ToolError> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|_| {
            ToolError::invalid_input(format!(
                "'{name}' must be an RFC 3339 timestamp or YYYY-MM-DD date, got '{value}'"
            ))
        })
}

/// Formats a timestamp the way order search expects it, always in UTC.
fn search_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

impl GetOrdersInput {
    fn variables(&self) -> Result<Value, ToolError> {
        let mut variables = self.page.variables()?;

        let min = self
            .created_at_min
            .as_deref()
            .map(|v| parse_timestamp("createdAtMin", v))
            .transpose()?;
        let max = self
            .created_at_max
            .as_deref()
            .map(|v| parse_timestamp("createdAtMax", v))
            .transpose()?;
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ToolError::invalid_input(
                    "'createdAtMin' must not be after 'createdAtMax'",
                ));
            }
        }

        let query = SearchQuery::new()
            .raw(self.query.as_deref())
            .term("status", self.status.and_then(OrderStatus::search_value))
            .term(
                "financial_status",
                self.financial_status.map(FinancialStatus::as_str),
            )
            .term(
                "fulfillment_status",
                self.fulfillment_status.map(FulfillmentStatus::as_str),
            )
            .compare("created_at", Comparison::GreaterOrEqual, min.map(search_timestamp))
            .compare("created_at", Comparison::LessOrEqual, max.map(search_timestamp))
            .term("email", self.email.as_deref())
            .build();

        insert_some(&mut variables, "query", query);
        insert_some(&mut variables, "sortKey", self.sort_key);
        insert_some(&mut variables, "reverse", self.reverse);
        Ok(variables)
    }
}

/// Lists orders with cursor pagination and filters.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetOrders;

#[async_trait]
impl ShopifyTool for GetOrders {
    fn name(&self) -> &'static str {
        "get-orders"
    }

    fn description(&self) -> &'static str {
        "List orders. Supports cursor pagination, filtering by status, financial status, \
         fulfillment status, creation date range, customer email or a raw Shopify search \
         query, and sorting."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetOrdersInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetOrdersInput = parse_input(arguments)?;
        let data = fetch(
            client,
            GET_ORDERS_QUERY,
            input.variables()?,
            "Failed to fetch orders",
        )
        .await?;
        Ok(page_result(data, "orders", "orders"))
    }
}

/// Arguments of `get-order-by-id`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetOrderByIdInput {
    /// Numeric order id or `gid://shopify/Order/<id>`.
    order_id: String,
    /// Number of line items to include (1-250, default 50).
    #[serde(default)]
    line_items_first: Option<u32>,
}

/// Fetches one order with line items and fulfillments.
#[derive(Clone, Copy, Debug, Default)]
pub struct GetOrderById;

#[async_trait]
impl ShopifyTool for GetOrderById {
    fn name(&self) -> &'static str {
        "get-order-by-id"
    }

    fn description(&self) -> &'static str {
        "Get a single order by id, including customer, shipping address, line items, \
         totals and fulfillments."
    }

    fn input_schema(&self) -> JsonObject {
        schema_of::<GetOrderByIdInput>()
    }

    async fn call(&self, client: &GraphqlClient, arguments: Value) -> Result<Value, ToolError> {
        let input: GetOrderByIdInput = parse_input(arguments)?;
        let id = to_gid("Order", &input.order_id)?;
        let variables = json!({
            "id": id,
            "lineItemsFirst": page_size("lineItemsFirst", input.line_items_first, 50)?,
        });

        let data = fetch(client, GET_ORDER_BY_ID_QUERY, variables, "Failed to fetch order").await?;
        node_result(data, "order", "Order", id, "Failed to fetch order")
    }
}
