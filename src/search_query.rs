//! Shopify search syntax builder.
//!
//! List queries accept a `query` argument written in Shopify's search
//! syntax (`title:hat AND vendor:"Acme Co"`). [`SearchQuery`] assembles that
//! string from typed tool filters so values are quoted consistently, and
//! the result is passed as a GraphQL variable, never spliced into a query
//! document.
//!
//! # Example
//!
//! ```rust
//! use shopify_mcp::search_query::{Comparison, SearchQuery};
//!
//! let query = SearchQuery::new()
//!     .raw(Some("summer"))
//!     .term("vendor", Some("Acme Co"))
//!     .compare("created_at", Comparison::GreaterOrEqual, Some("2025-01-01"))
//!     .build();
//!
//! assert_eq!(
//!     query.as_deref(),
//!     Some(r#"summer AND vendor:"Acme Co" AND created_at:>=2025-01-01"#)
//! );
//! assert_eq!(SearchQuery::new().term("title", None::<&str>).build(), None);
//! ```

use std::fmt;

/// Comparison operators for range filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
}

impl Comparison {
    /// Returns the operator as written in search syntax.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for a Shopify search query string.
///
/// Absent or blank values are skipped, so optional tool filters can be fed
/// in directly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<String>,
}

impl SearchQuery {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds free text exactly as given.
    ///
    /// A fragment containing `OR` is parenthesised so it does not absorb
    /// neighbouring terms.
    #[must_use]
    pub fn raw(mut self, fragment: Option<impl AsRef<str>>) -> Self {
        if let Some(fragment) = present(fragment.as_ref().map(AsRef::as_ref)) {
            if fragment.contains(" OR ") {
                self.terms.push(format!("({fragment})"));
            } else {
                self.terms.push(fragment.to_string());
            }
        }
        self
    }

    /// Adds a `field:value` term.
    #[must_use]
    pub fn term(mut self, field: &str, value: Option<impl AsRef<str>>) -> Self {
        if let Some(value) = present(value.as_ref().map(AsRef::as_ref)) {
            self.terms.push(format!("{field}:{}", quote(value)));
        }
        self
    }

    /// Adds a `field:value*` prefix term.
    ///
    /// Values that need quoting are matched as a phrase instead, since
    /// Shopify does not apply wildcards inside quotes.
    #[must_use]
    pub fn prefix(mut self, field: &str, value: Option<impl AsRef<str>>) -> Self {
        if let Some(value) = present(value.as_ref().map(AsRef::as_ref)) {
            if needs_quotes(value) {
                self.terms.push(format!("{field}:{}", quote(value)));
            } else {
                self.terms.push(format!("{field}:{value}*"));
            }
        }
        self
    }

    /// Adds a `field:<op>value` range term.
    #[must_use]
    pub fn compare(
        mut self,
        field: &str,
        comparison: Comparison,
        value: Option<impl AsRef<str>>,
    ) -> Self {
        if let Some(value) = present(value.as_ref().map(AsRef::as_ref)) {
            self.terms.push(format!("{field}:{comparison}{}", quote(value)));
        }
        self
    }

    /// Returns `true` if no terms were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Joins the terms with `AND`, or returns `None` if there are none.
    #[must_use]
    pub fn build(self) -> Option<String> {
        if self.terms.is_empty() {
            None
        } else {
            Some(self.terms.join(" AND "))
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn needs_quotes(value: &str) -> bool {
    value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, ':' | '"' | '\'' | '(' | ')' | '\\' | '*'))
}

fn quote(value: &str) -> String {
    if !needs_quotes(value) {
        return value.to_string();
    }
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}
