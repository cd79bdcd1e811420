//! Shopify MCP server binary.
//!
//! Speaks MCP over stdin/stdout. Logs go to stderr, filtered by `RUST_LOG`.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shopify_mcp::cli::ServerArgs;
use shopify_mcp::server;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = ServerArgs::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(args).await;
    if let Err(e) = result {
        tracing::error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn run(args: ServerArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.into_config()?;
    tracing::info!(
        shop = %config.shop(),
        api_version = %config.api_version(),
        "Starting {}",
        server::SERVER_NAME
    );
    server::run_stdio(config).await?;
    Ok(())
}
