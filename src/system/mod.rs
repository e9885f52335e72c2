//! System-level routes

pub mod health_check;

use axum::{routing::get, Router};

use crate::InnerState;

pub fn create_system_router() -> Router<InnerState> {
    Router::new().route("/health", get(health_check::health_check))
}
