//! Relay-style cursor pagination.
//!
//! Every list tool accepts the same paging arguments and returns the same
//! `pageInfo` shape, so both halves live here:
//!
//! - [`PageArgs`]: validated `first`/`last`/`after`/`before` input
//! - [`PageInfo`] and [`Page`]: a connection unwrapped into plain items
//! - [`flatten_connections`]: strips `edges`/`node` wrappers from nested data
//!
//! # Direction
//!
//! Supplying `before` or `last` pages backwards (`last` + `before`);
//! anything else pages forwards (`first` + `after`). Page sizes default to
//! [`DEFAULT_PAGE_SIZE`] and must lie within `1..=`[`MAX_PAGE_SIZE`].
//!
//! # Example
//!
//! ```rust
//! use shopify_mcp::pagination::PageArgs;
//! use serde_json::json;
//!
//! let args: PageArgs = serde_json::from_value(json!({"limit": 5, "after": "abc"})).unwrap();
//! assert_eq!(
//!     args.variables().unwrap(),
//!     json!({"first": 5, "after": "abc", "last": null, "before": null})
//! );
//!
//! let backwards: PageArgs = serde_json::from_value(json!({"before": "xyz"})).unwrap();
//! assert_eq!(
//!     backwards.variables().unwrap(),
//!     json!({"first": null, "after": null, "last": 10, "before": "xyz"})
//! );
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Page size used when neither `first` nor `last` is given.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Largest page size Shopify accepts for a connection.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Errors raised by invalid paging input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// Two arguments that select different directions were combined.
    #[error("'{first}' cannot be combined with '{second}'")]
    Conflict {
        /// The first argument of the conflicting pair.
        first: &'static str,
        /// The second argument of the conflicting pair.
        second: &'static str,
    },

    /// A size argument was outside `1..=250`.
    #[error("'{name}' must be between 1 and {MAX_PAGE_SIZE}, got {value}")]
    SizeOutOfRange {
        /// The argument name.
        name: &'static str,
        /// The rejected value.
        value: u32,
    },

    /// A cursor argument was an empty string.
    #[error("'{name}' must be a non-empty cursor")]
    EmptyCursor {
        /// The argument name.
        name: &'static str,
    },
}

/// Paging arguments shared by every list tool.
///
/// Tool inputs embed this with `#[serde(flatten)]`, so the four keys (and
/// the `limit` alias) sit at the top level of the tool arguments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageArgs {
    /// Number of items to return from the start of the window (1-250, default 10).
    #[serde(default)]
    pub first: Option<u32>,
    /// Alias of `first`.
    #[serde(default)]
    pub limit: Option<u32>,
    /// Number of items to return from the end of the window (1-250). Pages backwards.
    #[serde(default)]
    pub last: Option<u32>,
    /// Cursor to continue after (the previous page's `endCursor`).
    #[serde(default)]
    pub after: Option<String>,
    /// Cursor to continue before (the previous page's `startCursor`). Pages backwards.
    #[serde(default)]
    pub before: Option<String>,
}

/// A validated paging window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Window {
    /// `first` items after an optional cursor.
    Forward {
        /// Page size.
        first: u32,
        /// Start cursor (exclusive).
        after: Option<String>,
    },
    /// `last` items before an optional cursor.
    Backward {
        /// Page size.
        last: u32,
        /// End cursor (exclusive).
        before: Option<String>,
    },
}

impl PageArgs {
    /// Forward paging from the start with `first` items.
    #[must_use]
    pub const fn forward(first: u32) -> Self {
        Self {
            first: Some(first),
            limit: None,
            last: None,
            after: None,
            before: None,
        }
    }

    /// Validates the arguments and resolves the paging direction.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when arguments for both directions are
    /// mixed, a size is out of range, or a cursor is empty.
    pub fn window(&self) -> Result<Window, PaginationError> {
        let first = match (self.first, self.limit) {
            (Some(_), Some(_)) => {
                return Err(PaginationError::Conflict {
                    first: "first",
                    second: "limit",
                })
            }
            (first, limit) => first.or(limit),
        };

        let conflicts = [
            (first.is_some(), self.last.is_some(), "first", "last"),
            (first.is_some(), self.before.is_some(), "first", "before"),
            (self.last.is_some(), self.after.is_some(), "last", "after"),
            (self.after.is_some(), self.before.is_some(), "after", "before"),
        ];
        if let Some(&(_, _, a, b)) = conflicts.iter().find(|(x, y, _, _)| *x && *y) {
            return Err(PaginationError::Conflict {
                first: a,
                second: b,
            });
        }

        let after = non_empty_cursor("after", self.after.as_deref())?;
        let before = non_empty_cursor("before", self.before.as_deref())?;

        if self.last.is_some() || before.is_some() {
            Ok(Window::Backward {
                last: page_size("last", self.last, DEFAULT_PAGE_SIZE)?,
                before,
            })
        } else {
            Ok(Window::Forward {
                first: page_size("first", first, DEFAULT_PAGE_SIZE)?,
                after,
            })
        }
    }

    /// Returns the GraphQL variables for this window.
    ///
    /// All four keys are always present; the ones for the unused direction
    /// are `null`, which the fixed query documents accept.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] if the arguments are invalid.
    pub fn variables(&self) -> Result<Value, PaginationError> {
        Ok(match self.window()? {
            Window::Forward { first, after } => json!({
                "first": first,
                "after": after,
                "last": null,
                "before": null,
            }),
            Window::Backward { last, before } => json!({
                "first": null,
                "after": null,
                "last": last,
                "before": before,
            }),
        })
    }
}

/// Validates a page size, falling back to `default` when absent.
///
/// Also used for nested sub-connection sizes such as `variantsFirst`.
///
/// # Errors
///
/// Returns [`PaginationError::SizeOutOfRange`] for `0` or anything above
/// [`MAX_PAGE_SIZE`].
pub fn page_size(
    name: &'static str,
    value: Option<u32>,
    default: u32,
) -> Result<u32, PaginationError> {
    match value {
        None => Ok(default),
        Some(value) if (1..=MAX_PAGE_SIZE).contains(&value) => Ok(value),
        Some(value) => Err(PaginationError::SizeOutOfRange { name, value }),
    }
}

fn non_empty_cursor(
    name: &'static str,
    cursor: Option<&str>,
) -> Result<Option<String>, PaginationError> {
    match cursor {
        Some(cursor) if cursor.trim().is_empty() => Err(PaginationError::EmptyCursor { name }),
        cursor => Ok(cursor.map(String::from)),
    }
}

/// The `pageInfo` object of a connection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Whether more items follow this page.
    #[serde(default)]
    pub has_next_page: bool,
    /// Whether items precede this page.
    #[serde(default)]
    pub has_previous_page: bool,
    /// Cursor of the first item on this page.
    #[serde(default)]
    pub start_cursor: Option<String>,
    /// Cursor of the last item on this page.
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// One page of a connection with its wrappers removed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// The nodes, each with its own nested connections flattened.
    pub items: Vec<Value>,
    /// Paging state for requesting the neighbouring pages.
    pub page_info: PageInfo,
}

impl Page {
    /// Builds a page from a connection object.
    ///
    /// Accepts either `edges[].node` or `nodes[]`. A `null` or missing
    /// connection yields an empty page.
    #[must_use]
    pub fn from_connection(connection: Value) -> Self {
        let Value::Object(mut connection) = connection else {
            return Self::default();
        };

        let page_info = connection
            .remove("pageInfo")
            .and_then(|info| serde_json::from_value(info).ok())
            .unwrap_or_default();

        let items = connection_nodes(&mut connection)
            .unwrap_or_default()
            .into_iter()
            .map(flatten_connections)
            .collect();

        Self { items, page_info }
    }

    /// Renders the page as `{ "<key>": [...], "pageInfo": {...} }`.
    #[must_use]
    pub fn into_json(self, key: &str) -> Value {
        let mut object = serde_json::Map::new();
        object.insert(key.to_string(), Value::Array(self.items));
        object.insert("pageInfo".to_string(), json!(self.page_info));
        Value::Object(object)
    }
}

/// Recursively replaces connection objects with arrays of their nodes.
///
/// An object counts as a connection when it has an `edges` array of
/// `{node}` objects or a `nodes` array, and no keys besides `edges`,
/// `nodes`, `pageInfo` and `totalCount`. Nested `pageInfo` is dropped.
///
/// ```rust
/// use shopify_mcp::pagination::flatten_connections;
/// use serde_json::json;
///
/// let product = json!({
///     "title": "Hat",
///     "variants": {"edges": [{"node": {"sku": "HAT-1"}}]},
/// });
/// assert_eq!(
///     flatten_connections(product),
///     json!({"title": "Hat", "variants": [{"sku": "HAT-1"}]})
/// );
/// ```
#[must_use]
pub fn flatten_connections(value: Value) -> Value {
    match value {
        Value::Object(mut object) => {
            if is_connection(&object) {
                if let Some(nodes) = connection_nodes(&mut object) {
                    return Value::Array(nodes.into_iter().map(flatten_connections).collect());
                }
            }
            Value::Object(
                object
                    .into_iter()
                    .map(|(key, value)| (key, flatten_connections(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(flatten_connections).collect()),
        other => other,
    }
}

fn is_connection(object: &serde_json::Map<String, Value>) -> bool {
    let only_connection_keys = object
        .keys()
        .all(|key| matches!(key.as_str(), "edges" | "nodes" | "pageInfo" | "totalCount"));
    if !only_connection_keys {
        return false;
    }

    match (object.get("edges"), object.get("nodes")) {
        (Some(Value::Array(edges)), _) => edges
            .iter()
            .all(|edge| edge.as_object().is_some_and(|edge| edge.contains_key("node"))),
        (None, Some(Value::Array(_))) => true,
        _ => false,
    }
}

fn connection_nodes(object: &mut serde_json::Map<String, Value>) -> Option<Vec<Value>> {
    if let Some(Value::Array(edges)) = object.remove("edges") {
        return Some(
            edges
                .into_iter()
                .filter_map(|mut edge| edge.get_mut("node").map(Value::take))
                .collect(),
        );
    }
    match object.remove("nodes") {
        Some(Value::Array(nodes)) => Some(nodes),
        _ => None,
    }
}
