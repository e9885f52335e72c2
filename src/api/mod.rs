//! Reel API
//!
//! JSON endpoints under `/api`, the multipart upload route, and static
//! serving of uploaded files.

pub mod admin;
pub mod common;
pub mod reels;
pub mod uploads;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::system::create_system_router;
use crate::InnerState;

use self::common::tracing::{make_custom_span, on_custom_failure, on_custom_request, on_custom_response};

/// Creates the reel API router
pub fn create_api_router(state: &InnerState) -> Router<InnerState> {
    tracing::info!("Creating reel API router");

    Router::new()
        .route("/api/reels", get(reels::list_reels).post(reels::create_reel))
        .route(
            "/api/reels/upload",
            post(uploads::upload_reel)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route("/api/reels/:id", get(reels::get_reel))
        .route("/api/admin/seed", post(admin::seed))
        .nest_service(
            uploads::UPLOADS_ROUTE,
            ServeDir::new(&state.config.upload_dir),
        )
}

/// Full application: API, system routes, CORS and request tracing.
pub fn create_app(state: InnerState) -> Router {
    Router::new()
        .merge(create_api_router(&state))
        .merge(create_system_router())
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_custom_span)
                .on_request(on_custom_request)
                .on_response(on_custom_response)
                .on_failure(on_custom_failure),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::storage::{MemStorage, ReelStore};

    const BOUNDARY: &str = "reel-upload-boundary";

    fn test_app() -> (Router, TempDir) {
        let upload_dir = tempfile::tempdir().unwrap();
        let config = Config {
            upload_dir: upload_dir.path().to_path_buf(),
            ..Config::default()
        };
        let store: Arc<dyn ReelStore> = Arc::new(MemStorage::new());
        let app = create_app(InnerState {
            store,
            config: Arc::new(config),
        });
        (app, upload_dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_multipart(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, filename, contents) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match filename {
                Some(filename) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    name, filename
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(contents);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        Request::builder()
            .method("POST")
            .uri("/api/reels/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (app, _dir) = test_app();
        let response = send(&app, get("/health")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn list_starts_empty() {
        let (app, _dir) = test_app();
        let response = send(&app, get("/api/reels")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn create_applies_defaults_and_can_be_fetched() {
        let (app, _dir) = test_app();

        let response = send(
            &app,
            post_json("/api/reels", json!({ "title": "A", "videoUrl": "/x.mp4" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = body_json(response).await;
        assert_eq!(created["id"], 1);
        assert_eq!(created["isFeatured"], false);
        assert_eq!(created["description"], "");
        assert!(created["posterUrl"].as_str().unwrap().contains("text=A"));

        let response = send(&app, get("/api/reels/1")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);

        let response = send(&app, get("/api/reels")).await;
        assert_eq!(body_json(response).await, json!([created]));
    }

    #[tokio::test]
    async fn create_without_title_is_400() {
        let (app, _dir) = test_app();
        let response = send(&app, post_json("/api/reels", json!({ "videoUrl": "/x.mp4" }))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["message"],
            "Title and videoUrl are required"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let (app, _dir) = test_app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/reels")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_numeric_id_is_400() {
        let (app, _dir) = test_app();
        let response = send(&app, get("/api/reels/abc")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Reel ID must be a number");
    }

    #[tokio::test]
    async fn unknown_id_is_404() {
        let (app, _dir) = test_app();
        let response = send(&app, get("/api/reels/42")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["message"], "Reel not found");
    }

    #[tokio::test]
    async fn seed_endpoint_is_idempotent() {
        let (app, _dir) = test_app();

        let response = send(&app, post_json("/api/admin/seed", json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let first = body_json(response).await;
        assert_eq!(first["count"], 5);
        assert_eq!(first["message"], "Database seeded successfully");
        assert_eq!(first["reels"].as_array().unwrap().len(), 5);

        let response = send(&app, post_json("/api/admin/seed", json!({}))).await;
        let second = body_json(response).await;
        assert_eq!(second["count"], 5);
        assert_eq!(second["message"], "Database already seeded");
        assert!(second.get("reels").is_none());

        let response = send(&app, get("/api/reels")).await;
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn upload_stores_video_and_creates_reel() {
        let (app, dir) = test_app();

        let response = send(
            &app,
            post_multipart(&[
                ("title", None, "Studio Cut"),
                ("isFeatured", None, "true"),
                ("video", Some("studio.mp4"), "fake-video-bytes"),
            ]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let reel = body_json(response).await;
        assert_eq!(reel["title"], "Studio Cut");
        assert_eq!(reel["isFeatured"], true);
        assert!(reel["posterUrl"].as_str().unwrap().contains("text=No+Cover"));

        let video_url = reel["videoUrl"].as_str().unwrap();
        assert!(video_url.starts_with("/uploads/"));
        assert!(video_url.ends_with(".mp4"));

        let filename = video_url.trim_start_matches("/uploads/");
        let stored = std::fs::read(dir.path().join(filename)).unwrap();
        assert_eq!(stored, b"fake-video-bytes");

        let response = send(&app, get(video_url)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let served = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&served[..], b"fake-video-bytes");
    }

    #[tokio::test]
    async fn upload_defaults_title_and_keeps_poster() {
        let (app, _dir) = test_app();

        let response = send(
            &app,
            post_multipart(&[
                ("video", Some("clip.mov"), "video"),
                ("poster", Some("cover.jpg"), "poster"),
            ]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let reel = body_json(response).await;
        assert_eq!(reel["title"], "Untitled Reel");
        assert_eq!(reel["description"], "");
        assert_eq!(reel["isFeatured"], false);
        let poster_url = reel["posterUrl"].as_str().unwrap();
        assert!(poster_url.starts_with("/uploads/"));
        assert!(poster_url.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn upload_without_video_is_400() {
        let (app, _dir) = test_app();

        let response = send(&app, post_multipart(&[("title", None, "No file")])).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Video file is required");
    }
}
