use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::storage::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("Upload error: {0}")]
    Upload(#[source] anyhow::Error),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StorageUnavailable(_)
            | AppError::Storage(_)
            | AppError::Upload(_)
            | AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::StorageUnavailable(msg) => format!("Storage unavailable: {}", msg),
            AppError::Storage(e) => format!("Storage error: {}", e),
            AppError::Upload(e) => format!("Upload failed: {}", e),
            AppError::Unexpected(e) => format!("An unexpected error occurred: {}", e),
        };

        tracing::error!(
            error_type = %self,
            error_message = %error_message,
            status_code = %status,
            "Request error"
        );

        let source = match &self {
            AppError::Storage(e) | AppError::Upload(e) | AppError::Unexpected(e) => Some(e),
            _ => None,
        };
        if let Some(e) = source {
            let mut source_chain = String::new();
            for cause in e.chain().skip(1) {
                source_chain.push_str(&format!("\n  Caused by: {}", cause));
            }
            if !source_chain.is_empty() {
                tracing::error!("Error source chain:{}", source_chain);
            }
        }

        let body = Json(json!({
            "message": error_message,
            "status": status.as_u16()
        }));
        (status, body).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AppError::StorageUnavailable(msg),
            other => AppError::Storage(anyhow::Error::new(other).context("Reel store operation failed")),
        }
    }
}
