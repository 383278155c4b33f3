// Crop Server Binary Entry Point
//
// Purpose: Start the Axum server with the crop recommendation form
// Usage: cargo run --bin crop_server
//        MODEL_PATH=/path/to/RandomForest.json PORT=8080 cargo run --bin crop_server

use crop_advisor::{create_router, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (structured logging)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    // Default log level: info for our crate, warn for others
                    "crop_advisor=info,tower_http=debug,axum=debug,warn".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting crop server...");

    let config = ServerConfig::from_env();

    tracing::info!("Configuration:");
    tracing::info!("  MODEL_PATH: {:?}", config.model_path);
    tracing::info!("  HOST: {}", config.host);
    tracing::info!("  PORT: {}", config.port);

    // A missing or invalid model leaves the form up and predictions returning 500
    let state = AppState::load(&config);
    if !state.recommender.is_ready() {
        tracing::warn!("Serving without a model; /predict will fail until the artifact is fixed");
    }

    let app = create_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await?;

    Ok(())
}
