use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use error::AppError;
use tts::{PiperEngine, TtsService};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = Config::from_env()?;

    tracing::info!("Piper Voice API v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", config.addr);
    tracing::info!("Models directory: {}", config.models_dir.display());
    tracing::info!("Output directory: {}", config.output_dir.display());
    tracing::info!("Static directory: {} (served at /static)", config.static_dir.display());
    tracing::info!("Piper binary: {}", config.piper_bin.display());

    // Create TTS service
    let engine = Arc::new(PiperEngine::new(config.piper_bin.clone()));
    let tts = TtsService::new(config.models_dir.clone(), config.output_dir.clone(), engine);

    // Create app state
    let state = Arc::new(AppState { tts });

    // Create router
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
