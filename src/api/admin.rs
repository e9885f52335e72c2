use axum::{extract::State, Json};

use crate::{
    errors::AppError,
    seed::{seed_reels, SeedOutcome},
    InnerState,
};

/// Fills an empty store with the default reels. Safe to call repeatedly.
#[tracing::instrument(name = "Admin seed", skip(inner))]
pub async fn seed(State(inner): State<InnerState>) -> Result<Json<SeedOutcome>, AppError> {
    let outcome = seed_reels(inner.store.as_ref()).await?;
    Ok(Json(outcome))
}
