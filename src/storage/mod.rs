//! Reel storage
//!
//! `ReelStore` is the uniform {list, get, create} API used by the handlers.
//! Two backends implement it:
//! - `memory`: in-process map, lost on restart.
//! - `database`: PostgreSQL table reached through the shared `ConnectionProvider`.
//!
//! The backend is chosen once at start-up by `init_store`.

pub mod database;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::db::ConnectionProvider;
use crate::models::{NewReel, Reel};

pub use database::DatabaseStorage;
pub use memory::MemStorage;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait ReelStore: Send + Sync {
    /// All reels, oldest first.
    async fn list(&self) -> Result<Vec<Reel>, StoreError>;

    /// `Ok(None)` when no reel has this id.
    async fn get(&self, id: i32) -> Result<Option<Reel>, StoreError>;

    /// Stores the reel under a fresh id and returns it as stored.
    async fn create(&self, reel: NewReel) -> Result<Reel, StoreError>;
}

/// Picks the backend for this process.
#[tracing::instrument(name = "init_store", skip_all)]
pub async fn init_store(config: &Config, provider: Arc<ConnectionProvider>) -> Arc<dyn ReelStore> {
    if !provider.is_configured() {
        tracing::warn!("DATABASE_URL not set. Using in-memory storage.");
        return Arc::new(MemStorage::new());
    }

    let store = DatabaseStorage::new(provider);

    if config.run_migrations {
        match store.migrate().await {
            Ok(()) => tracing::info!("Database migrations applied"),
            Err(e) => tracing::error!(error = %e, "Failed to run database migrations"),
        }
    }

    tracing::info!("Using PostgreSQL storage");
    Arc::new(store)
}
