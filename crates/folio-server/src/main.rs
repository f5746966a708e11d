//! Relay binary entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use folio_gateway::HttpGenerationClient;
use folio_server::{router, AppState, RelayConfig};

/// Folio Relay - persona chat relay for a portfolio site.
#[derive(Parser, Debug)]
#[command(name = "folio-relay", version, about)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    /// Override the configured listen host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let env_filter =
        EnvFilter::try_from_env("FOLIO_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut config = RelayConfig::load(&args.config).context("loading configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // No key, no relay: fail at startup rather than on the first request.
    let api_key =
        std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY not found in environment")?;

    let gateway = HttpGenerationClient::new(
        &config.gateway.api_base,
        &config.gateway.model,
        &api_key,
        Duration::from_secs(config.gateway.timeout_secs),
    );

    let listen = format!("{}:{}", config.server.host, config.server.port);
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen address '{listen}': {e}"))?;

    tracing::info!(
        listen = %addr,
        model = %config.gateway.model,
        rate_limit = config.rate_limit.enabled,
        "folio-relay starting"
    );

    let app = router(AppState::new(Arc::new(gateway), config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")
}
