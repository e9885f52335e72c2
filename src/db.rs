//! Process-wide PostgreSQL handle.
//!
//! The pool is built on first use and memoized for the lifetime of the
//! process. It is capped at a single connection and connects lazily, so
//! building it never touches the network.

use std::time::Duration;

use once_cell::sync::OnceCell;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::Config;
use crate::storage::StoreError;

const MAX_CONNECTIONS: u32 = 1;

pub struct ConnectionProvider {
    database_url: Option<String>,
    idle_timeout: Duration,
    connect_timeout: Duration,
    pool: OnceCell<PgPool>,
}

impl ConnectionProvider {
    pub fn new(
        database_url: Option<String>,
        idle_timeout: Duration,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            database_url,
            idle_timeout,
            connect_timeout,
            pool: OnceCell::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.database_url.clone(),
            config.db_idle_timeout,
            config.db_connect_timeout,
        )
    }

    pub fn is_configured(&self) -> bool {
        self.database_url.is_some()
    }

    /// Returns the shared pool, creating it on the first call.
    ///
    /// `Ok(None)` means no connection string is configured, which callers
    /// treat as "durable storage unavailable" rather than a retryable failure.
    pub fn get_handle(&self) -> Result<Option<&PgPool>, StoreError> {
        let Some(database_url) = self.database_url.as_deref() else {
            return Ok(None);
        };

        self.pool
            .get_or_try_init(|| self.build_pool(database_url))
            .map(Some)
    }

    fn build_pool(&self, database_url: &str) -> Result<PgPool, StoreError> {
        let options: PgConnectOptions = database_url.parse().map_err(|e| {
            tracing::error!("Invalid DATABASE_URL format: {}", e);
            StoreError::Unavailable("DATABASE_URL is not a valid connection string".to_string())
        })?;

        let host = options.get_host().to_string();

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .idle_timeout(self.idle_timeout)
            .acquire_timeout(self.connect_timeout)
            .connect_lazy_with(options);

        tracing::info!(host = %host, "Created database connection pool");
        Ok(pool)
    }
}
