use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use url::form_urlencoded;

use crate::errors::AppError;

const PLACEHOLDER_POSTER_BASE: &str = "https://placehold.co/1080x1920/1a1a1a/ffffff";

/// A short video with the metadata shown in the showreel grid.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reel {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub poster_url: String,
    pub is_featured: bool,
}

/// Fields of a reel that has not been stored yet. Defaults are already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReel {
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub poster_url: String,
    pub is_featured: bool,
}

impl NewReel {
    pub fn new(title: impl Into<String>, video_url: impl Into<String>) -> Self {
        let title = title.into();
        let poster_url = placeholder_poster_url(&title);
        Self {
            title,
            description: String::new(),
            video_url: video_url.into(),
            poster_url,
            is_featured: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn poster_url(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = poster_url.into();
        self
    }

    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = is_featured;
        self
    }

    pub(crate) fn into_reel(self, id: i32) -> Reel {
        Reel {
            id,
            title: self.title,
            description: self.description,
            video_url: self.video_url,
            poster_url: self.poster_url,
            is_featured: self.is_featured,
        }
    }
}

/// Body of `POST /api/reels`.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateReelRequest {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub description: Option<String>,
    pub poster_url: Option<String>,
    pub is_featured: Option<bool>,
}

impl CreateReelRequest {
    pub fn validate(self) -> Result<NewReel, AppError> {
        let title = non_empty(self.title);
        let video_url = non_empty(self.video_url);

        let (title, video_url) = match (title, video_url) {
            (Some(title), Some(video_url)) => (title, video_url),
            _ => {
                return Err(AppError::Validation(
                    "Title and videoUrl are required".to_string(),
                ))
            }
        };

        let mut reel = NewReel::new(title, video_url)
            .description(self.description.unwrap_or_default())
            .featured(self.is_featured.unwrap_or(false));

        if let Some(poster_url) = non_empty(self.poster_url) {
            reel = reel.poster_url(poster_url);
        }

        Ok(reel)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Placeholder poster carrying the given text, e.g. `...?text=Event+Edit`.
pub fn placeholder_poster_url(text: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(text.as_bytes()).collect();
    format!("{}?text={}", PLACEHOLDER_POSTER_BASE, encoded)
}
