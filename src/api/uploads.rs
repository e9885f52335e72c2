//! Multipart reel upload.
//!
//! Files land in the configured upload directory under a generated name and
//! are served back from `/uploads/<name>`.

use std::path::Path;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, Json};
use axum_typed_multipart::{FieldData, TryFromMultipart, TypedMultipart, TypedMultipartError};
use bytes::Bytes;
use chrono::Utc;
use rand::Rng;

use crate::{
    errors::AppError,
    models::{placeholder_poster_url, NewReel, Reel},
    InnerState,
};

pub const UPLOADS_ROUTE: &str = "/uploads";

#[derive(TryFromMultipart)]
pub struct UploadReelForm {
    pub title: Option<String>,
    pub description: Option<String>,
    #[form_data(field_name = "isFeatured")]
    pub is_featured: Option<String>,
    #[form_data(limit = "unlimited")]
    pub video: Option<FieldData<Bytes>>,
    #[form_data(limit = "unlimited")]
    pub poster: Option<FieldData<Bytes>>,
}

#[tracing::instrument(name = "Upload reel", skip(inner, form))]
pub async fn upload_reel(
    State(inner): State<InnerState>,
    form: Result<TypedMultipart<UploadReelForm>, TypedMultipartError>,
) -> Result<(StatusCode, Json<Reel>), AppError> {
    let TypedMultipart(form) = form.map_err(|e| AppError::Validation(e.to_string()))?;

    let video = form
        .video
        .ok_or_else(|| AppError::Validation("Video file is required".to_string()))?;

    let upload_dir = inner.config.upload_dir.as_path();
    let video_url = save_upload(upload_dir, video).await?;
    let poster_url = match form.poster {
        Some(poster) => save_upload(upload_dir, poster).await?,
        None => placeholder_poster_url("No Cover"),
    };

    let title = form
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| "Untitled Reel".to_string());

    let new_reel = NewReel::new(title, video_url)
        .description(form.description.unwrap_or_default())
        .poster_url(poster_url)
        .featured(form.is_featured.as_deref() == Some("true"));

    let reel = inner.store.create(new_reel).await?;
    tracing::info!(id = reel.id, video_url = %reel.video_url, "Uploaded reel created");

    Ok((StatusCode::CREATED, Json(reel)))
}

async fn save_upload(dir: &Path, field: FieldData<Bytes>) -> Result<String, AppError> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", dir.display()))
        .map_err(AppError::Upload)?;

    let filename = upload_filename(field.metadata.file_name.as_deref());
    let target = dir.join(&filename);

    tokio::fs::write(&target, &field.contents)
        .await
        .with_context(|| format!("Failed to write {}", target.display()))
        .map_err(AppError::Upload)?;

    tracing::debug!(file = %target.display(), bytes = field.contents.len(), "Stored upload");
    Ok(format!("{}/{}", UPLOADS_ROUTE, filename))
}

/// `<unix millis>-<random>` plus the original extension when it is plain alphanumeric.
fn upload_filename(original: Option<&str>) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let extension = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!("{}-{}{}", Utc::now().timestamp_millis(), suffix, extension)
}
