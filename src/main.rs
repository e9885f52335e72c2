mod api;
mod config;
mod db;
mod errors;
mod models;
mod seed;
mod storage;
mod system;

use std::error::Error;
use std::sync::Arc;

use axum::routing::get;
use axum_prometheus::PrometheusMetricLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::api::create_app;
use crate::config::Config;
use crate::db::ConnectionProvider;
use crate::seed::seed_reels;
use crate::storage::{init_store, ReelStore};

#[derive(Clone)]
pub struct InnerState {
    pub store: Arc<dyn ReelStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showreel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);
    tracing::debug!(config = ?config, "Loaded configuration");

    let provider = Arc::new(ConnectionProvider::from_config(&config));
    let store = init_store(&config, provider).await;

    if config.seed_on_startup {
        match seed_reels(store.as_ref()).await {
            Ok(outcome) if outcome.was_seeded() => {
                tracing::info!(count = outcome.count, "Seeded default reels on startup")
            }
            Ok(outcome) => tracing::debug!(count = outcome.count, "Skipped startup seeding"),
            Err(e) => tracing::error!(error = %e, "Startup seeding failed"),
        }
    }

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app_state = InnerState {
        store,
        config: config.clone(),
    };

    let app = create_app(app_state)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
