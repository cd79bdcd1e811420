//! Command-line arguments of the `shopify-mcp-server` binary.
//!
//! Every flag has an environment variable fallback, and `.env` files are
//! loaded before parsing, so the server can be launched by an MCP host with
//! no arguments at all.

use std::time::Duration;

use clap::Parser;

use crate::config::{AccessToken, ApiVersion, HostUrl, ShopDomain, ShopifyConfig};
use crate::error::ConfigError;

/// Shopify MCP server.
#[derive(Debug, Parser)]
#[command(name = "shopify-mcp-server")]
#[command(author, version, about = "MCP server exposing read-only Shopify Admin API tools")]
pub struct ServerArgs {
    /// Store domain (`my-store` or `my-store.myshopify.com`).
    #[arg(long, env = "MYSHOPIFY_DOMAIN")]
    pub domain: String,

    /// Admin API access token.
    #[arg(long, env = "SHOPIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Admin API version, e.g. `2025-10` or `unstable`.
    #[arg(long, env = "SHOPIFY_API_VERSION")]
    pub api_version: Option<String>,

    /// Send requests to this host instead of the store domain.
    #[arg(long, env = "SHOPIFY_API_HOST")]
    pub api_host: Option<String>,

    /// Prefix for the `User-Agent` header.
    #[arg(long, env = "SHOPIFY_USER_AGENT_PREFIX")]
    pub user_agent_prefix: Option<String>,

    /// Seconds a single Admin API request may take.
    #[arg(long, env = "SHOPIFY_REQUEST_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: Option<u64>,
}

impl ServerArgs {
    /// Validates the arguments into a [`ShopifyConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an empty token, a malformed domain or
    /// host, or an unknown API version.
    pub fn into_config(self) -> Result<ShopifyConfig, ConfigError> {
        let mut builder = ShopifyConfig::builder()
            .shop(self.domain.parse::<ShopDomain>()?)
            .access_token(self.access_token.parse::<AccessToken>()?);

        if let Some(version) = self.api_version.as_deref() {
            builder = builder.api_version(version.parse::<ApiVersion>()?);
        }
        if let Some(host) = self.api_host.as_deref() {
            builder = builder.api_host(host.parse::<HostUrl>()?);
        }
        if let Some(prefix) = self.user_agent_prefix {
            builder = builder.user_agent_prefix(prefix);
        }
        if let Some(secs) = self.request_timeout_secs {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> ServerArgs {
        let mut argv = vec![
            "shopify-mcp-server",
            "--domain",
            "test-shop",
            "--access-token",
            "shpat_test",
        ];
        argv.extend_from_slice(extra);
        ServerArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_build_a_config() {
        let config = parse(&["--api-version", "2025-07"]).into_config().unwrap();
        assert_eq!(config.shop().as_ref(), "test-shop.myshopify.com");
        assert_eq!(config.access_token().as_ref(), "shpat_test");
        assert_eq!(config.api_version(), &ApiVersion::V2025_07);
    }

    #[test]
    fn test_api_host_and_prefix_are_optional() {
        let config = parse(&[
            "--api-host",
            "http://127.0.0.1:9000",
            "--user-agent-prefix",
            "Agent",
        ])
        .into_config()
        .unwrap();
        assert_eq!(config.api_host().map(HostUrl::origin), Some("http://127.0.0.1:9000"));
        assert_eq!(config.user_agent_prefix(), Some("Agent"));
    }

    #[test]
    fn test_request_timeout_flag() {
        let config = parse(&["--request-timeout-secs", "5"]).into_config().unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(5));

        let argv = [
            "shopify-mcp-server",
            "--domain",
            "test-shop",
            "--access-token",
            "shpat_test",
            "--request-timeout-secs",
            "0",
        ];
        assert!(ServerArgs::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_bad_version_is_a_config_error() {
        let error = parse(&["--api-version", "latest"]).into_config().unwrap_err();
        assert!(matches!(error, ConfigError::InvalidApiVersion { .. }));
    }

    #[test]
    fn test_bad_domain_is_a_config_error() {
        let mut args = parse(&[]);
        args.domain = "not a domain!".to_string();
        assert!(matches!(
            args.into_config(),
            Err(ConfigError::InvalidShopDomain { .. })
        ));
    }
}
