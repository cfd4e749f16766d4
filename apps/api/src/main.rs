mod analysis;
mod config;
mod errors;
mod ingest;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::pipeline::{AnalysisSettings, Analyzer};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the model gateway
    let llm = LlmClient::new(
        config.llm_api_key.clone(),
        &config.llm_base_url,
        config.max_concurrent_model_calls,
    )?;
    info!(
        "LLM client initialized (endpoint: {}, extraction: {}, matching: {}, max concurrent calls: {})",
        llm.endpoint(),
        config.extraction_model,
        config.matching_model,
        config.max_concurrent_model_calls
    );

    let analyzer = Analyzer::new(Arc::new(llm), AnalysisSettings::from_config(&config));
    info!("Uploads spooled under {}", config.upload_dir.display());

    // Build app state
    let state = AppState {
        analyzer,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
