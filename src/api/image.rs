//! Equipment illustration
//!
//! POST /api/image

use anyhow::anyhow;
use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::validated;
use crate::error::ApiError;
use crate::schemas::api::{ImageRequest, ImageResponse};
use crate::server::state::AppState;
use crate::services::image_prompt;

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<ImageRequest>, JsonRejection>,
) -> Result<Json<ImageResponse>, ApiError> {
    let request = validated(payload)?;

    let prompt = image_prompt(&request.kind, request.manufacturer.as_deref(), &request.model);
    let candidates = state.catalog.image();

    tracing::info!(
        kind = %request.kind,
        model = %request.model,
        candidates = candidates.len(),
        "Processing image request"
    );

    let resolution = state.resolver.resolve(&prompt, &candidates).await.into_result()?;
    let image = resolution
        .payload
        .to_data_url()
        .ok_or_else(|| anyhow!("image candidate produced a text payload"))?;

    Ok(Json(ImageResponse {
        image,
        model: resolution.label,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{post_json, router, settings};
    use crate::config::Credentials;
    use crate::services::fallback::IMAGE_FALLBACK_LABEL;
    use axum::http::StatusCode;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_failed_models_fall_back_to_public_endpoint() {
        let server = MockServer::start_async().await;
        // every model outlives the client timeout
        let models = server
            .mock_async(|when, then| {
                when.method(POST).path_includes("/hf-inference/models/");
                then.status(200).delay(std::time::Duration::from_secs(5));
            })
            .await;
        let fallback = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path_includes("/pollinations/prompt/")
                    .path_includes("pump")
                    .path_includes("X100")
                    .query_param("nologo", "true");
                then.status(200)
                    .header("content-type", "image/jpeg")
                    .body([0xFFu8, 0xD8, 0xFF, 0xE0].as_slice());
            })
            .await;

        let dir = TempDir::new().unwrap();
        let mut settings = settings(
            &server.base_url(),
            Credentials::default().with_huggingface("hf_test_key_0001"),
            &dir.path().join("stats.json"),
        );
        settings.providers.request_timeout_seconds = 1;
        let app = router(settings);

        let (status, body) =
            post_json(app, "/api/image", json!({"type": "pump", "model": "X100"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], IMAGE_FALLBACK_LABEL);
        assert_eq!(body["image"], "data:image/jpeg;base64,/9j/4A==");
        models.assert_calls_async(3).await;
        fallback.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_keyless_goes_straight_to_fallback() {
        let server = MockServer::start_async().await;
        let fallback = server
            .mock_async(|when, then| {
                when.method(GET).path_includes("/pollinations/prompt/");
                then.status(200)
                    .header("content-type", "image/png")
                    .body([0x89u8, 0x50, 0x4E, 0x47].as_slice());
            })
            .await;

        let dir = TempDir::new().unwrap();
        let app = router(settings(
            &server.base_url(),
            Credentials::default(),
            &dir.path().join("stats.json"),
        ));

        let (status, body) = post_json(
            app,
            "/api/image",
            json!({"type": "compressor", "model": "K-250", "manufacturer": "Atlas"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["image"].as_str().unwrap().starts_with("data:image/png;base64,"));
        fallback.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn test_type_is_required() {
        let dir = TempDir::new().unwrap();
        let app = router(settings(
            "http://127.0.0.1:9",
            Credentials::default(),
            &dir.path().join("stats.json"),
        ));

        let (status, _) = post_json(app, "/api/image", json!({"model": "X100"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
