use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    errors::AppError,
    models::{CreateReelRequest, Reel},
    InnerState,
};

#[tracing::instrument(name = "Get all reels", skip(inner))]
pub async fn list_reels(State(inner): State<InnerState>) -> Result<Json<Vec<Reel>>, AppError> {
    let reels = inner.store.list().await?;
    Ok(Json(reels))
}

#[tracing::instrument(name = "Get reel by id", skip(inner))]
pub async fn get_reel(
    State(inner): State<InnerState>,
    Path(id): Path<String>,
) -> Result<Json<Reel>, AppError> {
    let id: i32 = id
        .trim()
        .parse()
        .map_err(|_| AppError::Validation("Reel ID must be a number".to_string()))?;

    inner
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Reel not found".to_string()))
}

#[tracing::instrument(name = "Create reel", skip(inner, payload))]
pub async fn create_reel(
    State(inner): State<InnerState>,
    payload: Result<Json<CreateReelRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Reel>), AppError> {
    let Json(payload) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let new_reel = payload.validate()?;

    let reel = inner.store.create(new_reel).await?;
    tracing::info!(id = reel.id, title = %reel.title, "Reel created");

    Ok((StatusCode::CREATED, Json(reel)))
}
