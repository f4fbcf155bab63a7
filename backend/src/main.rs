//! Microgreen Grower Portal - Backend Server
//!
//! Inventory ledger, order engine, and demand forecasting for a small
//! microgreen farm.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use microgreen_portal_backend::{create_app, seed, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "microgreen_portal_backend=debug,portal_server=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Microgreen Grower Portal Server");
    tracing::info!("Environment: {}", config.environment);

    let state = AppState::from_config(config);

    // Populate sample data in development
    if state.config.environment == "development" {
        tracing::info!("Seeding sample data...");
        seed::seed_sample_data(&state).await?;
        tracing::info!("Sample data ready");
    }

    // Build application
    let app = create_app(state.clone());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
