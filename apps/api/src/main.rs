mod assessment;
mod config;
mod errors;
mod generation;
mod llm_client;
mod release;
mod render;
mod report;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::scoring::LikertTraitScorer;
use crate::config::Config;
use crate::generation::LlmReportWriter;
use crate::release::GithubReleaseStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Report API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (fatal on failure)
    let llm = llm_client::setup(&config).context("Failed to initialize Gemini API client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize release store
    let store = GithubReleaseStore::from_config(&config)?;
    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN is not set; submissions will fail at upload");
    }
    info!("Release store initialized for {}", config.github_repository);

    // Build app state
    let state = AppState {
        scorer: Arc::new(LikertTraitScorer),
        writer: Arc::new(LlmReportWriter(llm)),
        store: Arc::new(store),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
