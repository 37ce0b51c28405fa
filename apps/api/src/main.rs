mod builder;
mod compile;
mod config;
mod errors;
mod layout;
mod llm_client;
mod patch;
mod routes;
mod state;
mod template;
mod tracker;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::compile::backend::default_chain;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::patch::generator::{HeuristicPatchGenerator, PatchStrategy, RemotePatchGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tracker::store::JobStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first; malformed values abort startup
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // Pick the patch strategy: remote when a key is configured
    let patch_strategy: Arc<dyn PatchStrategy> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.llm_model.clone())?;
            info!("Patch strategy: remote (model: {})", llm.model());
            Arc::new(RemotePatchGenerator::new(llm))
        }
        None => {
            info!("Patch strategy: heuristic (ANTHROPIC_API_KEY not set)");
            Arc::new(HeuristicPatchGenerator)
        }
    };

    let compilers = default_chain(
        config.primary_compile_timeout,
        config.secondary_compile_timeout,
    );
    info!(
        "Compiler chain: {}",
        compilers.iter().map(|c| c.name()).collect::<Vec<_>>().join(" -> ")
    );

    let job_store = Arc::new(JobStore::new(&config.data_dir));
    info!("Job store at {}", job_store.path().display());

    // Build app state
    let state = AppState {
        config: config.clone(),
        patch_strategy,
        compilers: compilers.into(),
        job_store,
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
