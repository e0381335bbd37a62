use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use logo_generator::diffusion::{DiffusionClient, ImageGenerator, PlaceholderGenerator};
use logo_generator::routes::{app, AppState};
use logo_generator::store::ArtifactStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Init tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let output_dir = std::env::var("OUTPUT_DIR").unwrap_or_else(|_| "generated".into());
    let store = ArtifactStore::new(&output_dir).await?;
    tracing::info!(%output_dir, "Artifact store ready");

    // The generator client is built once and shared across submissions
    // instead of being re-created per request.
    let generator: Arc<dyn ImageGenerator> = match std::env::var("DIFFUSION_API_BASE") {
        Ok(base_url) => {
            let model = std::env::var("DIFFUSION_MODEL")
                .unwrap_or_else(|_| "stable-diffusion-v1-4".into());
            let api_key = std::env::var("DIFFUSION_API_KEY").ok();
            Arc::new(DiffusionClient::new(base_url, model, api_key))
        }
        Err(_) => {
            tracing::warn!("DIFFUSION_API_BASE not set, falling back to placeholder generator");
            Arc::new(PlaceholderGenerator)
        }
    };

    let state = AppState {
        submissions: Arc::default(),
        generator,
        store: Arc::new(store),
    };

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("Shutdown signal received");
}
