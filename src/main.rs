use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use script_gateway::build_router;
use script_gateway::cache::{self, FingerprintCache};
use script_gateway::config::Args;
use script_gateway::generation::AnthropicClient;
use script_gateway::service::ContentService;
use script_gateway::state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // parse cli arguments, exits when the API key is missing
    let args = Args::parse();

    let client = AnthropicClient::new(args.anthropic()).context("failed to build Anthropic client")?;
    let model = client.model().to_string();

    let cache = Arc::new(FingerprintCache::new(args.cache_ttl()));
    tokio::spawn(cache::sweeper(cache.clone()));

    let service = ContentService::new(cache, Arc::new(client)).with_single_flight(args.single_flight);
    let state = Arc::new(AppState {
        service: Arc::new(service),
    });

    let app = build_router(state, args.enable_metrics);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(port = args.port, "server listening");
    info!(
        model = %model,
        max_tokens = args.max_tokens,
        cache_ttl_secs = args.cache_ttl,
        single_flight = args.single_flight,
        metrics = args.enable_metrics,
        "configuration loaded"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
