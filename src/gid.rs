//! Shopify global ID (GID) handling.
//!
//! The Admin GraphQL API identifies every object as
//! `gid://shopify/{Resource}/{id}`. Tools accept either that form or the
//! bare numeric id shown in the Shopify admin.

use thiserror::Error;

const GID_PREFIX: &str = "gid://shopify/";

/// Errors raised while normalizing an id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The id was empty.
    #[error("{resource} id cannot be empty")]
    Empty {
        /// The resource the id was meant for.
        resource: &'static str,
    },

    /// The id was neither numeric nor a Shopify GID.
    #[error("Invalid {resource} id '{id}'. Expected a numeric id or 'gid://shopify/{resource}/<id>'")]
    Malformed {
        /// The resource the id was meant for.
        resource: &'static str,
        /// The rejected input.
        id: String,
    },

    /// The GID named another resource type.
    #[error("Expected a {expected} id, got a {found} id")]
    WrongResource {
        /// The resource the id was meant for.
        expected: &'static str,
        /// The resource the GID actually named.
        found: String,
    },
}

/// Normalizes `id` into a GID for `resource`.
///
/// # Errors
///
/// Returns [`GidError`] if `id` is empty, malformed, or names a different
/// resource.
///
/// # Example
///
/// ```rust
/// use shopify_mcp::gid::to_gid;
///
/// assert_eq!(to_gid("Product", "123").unwrap(), "gid://shopify/Product/123");
/// assert_eq!(
///     to_gid("Product", "gid://shopify/Product/123").unwrap(),
///     "gid://shopify/Product/123"
/// );
/// assert!(to_gid("Product", "gid://shopify/Order/123").is_err());
/// ```
pub fn to_gid(resource: &'static str, id: &str) -> Result<String, GidError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(GidError::Empty { resource });
    }

    if is_numeric(id) {
        return Ok(format!("{GID_PREFIX}{resource}/{id}"));
    }

    let malformed = || GidError::Malformed {
        resource,
        id: id.to_string(),
    };

    let rest = id.strip_prefix(GID_PREFIX).ok_or_else(malformed)?;
    let (found, numeric) = rest.split_once('/').ok_or_else(malformed)?;
    // Some GIDs carry a query suffix, e.g. `?inventory_item_id=...`
    let numeric = numeric.split_once('?').map_or(numeric, |(head, _)| head);

    if found.is_empty() || !is_numeric(numeric) {
        return Err(malformed());
    }
    if found != resource {
        return Err(GidError::WrongResource {
            expected: resource,
            found: found.to_string(),
        });
    }

    Ok(id.to_string())
}

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
