//! services/api/src/bin/api.rs

use api_lib::{
    adapters::build_repository,
    config::{Config, Environment},
    error::{self, ApiError},
    web::{build_app, AppState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    error::expose_internal_details(config.environment == Environment::Development);
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect the Profile Repository ---
    let repo = build_repository(&config).await?;

    // --- 3. Build the Shared AppState and Router ---
    let app_state = Arc::new(AppState::new(repo));
    let app = build_app(app_state, &config)?;

    // --- 4. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
