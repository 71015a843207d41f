//! services/api/src/adapters/mod.rs
//!
//! Storage backends for the profile document.

pub mod db;
pub mod memory;

pub use db::DbAdapter;
pub use memory::InMemoryAdapter;

use crate::config::{Config, ConfigError, StoreBackend};
use crate::error::ApiError;
use portfolio_core::ports::ProfileRepository;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the repository selected by `STORE_BACKEND`, connecting to and
/// migrating the database when one is used.
pub async fn build_repository(config: &Config) -> Result<Arc<dyn ProfileRepository>, ApiError> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using the in-memory store; data is lost on restart.");
            Ok(Arc::new(InMemoryAdapter::new()))
        }
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;

            info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await?;
            let db_adapter = DbAdapter::new(pool);
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            Ok(Arc::new(db_adapter))
        }
    }
}
