//! HTTP client types for Shopify API communication.
//!
//! This module provides the HTTP layer the tools sit on. It handles
//! request validation, authentication headers and Shopify-specific header
//! parsing.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`QueryCost`]: Cost report attached to GraphQL responses
//! - [`graphql::GraphqlClient`]: Higher-level GraphQL API client (Admin API)
//! - [`graphql::GraphqlError`]: GraphQL-specific error types
//!
//! # Retry Behavior
//!
//! There is none. Each request is sent once and a 429 or 5xx status is
//! returned to the caller as [`HttpError::Response`].

mod errors;
pub mod graphql;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{HttpError, HttpResponseError, InvalidHttpRequestError};
pub use http_client::{HttpClient, SERVER_VERSION};
pub use http_request::HttpRequest;
pub use http_response::{HttpResponse, QueryCost, ThrottleStatus};

// Re-export GraphQL client types at the clients module level
pub use graphql::{GraphqlClient, GraphqlError};
