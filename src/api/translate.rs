//! News article processing
//!
//! POST /api/translate

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::{resolve_text, validated};
use crate::error::ApiError;
use crate::schemas::api::{TranslateRequest, TranslateResponse};
use crate::server::state::AppState;
use crate::services::NewsAction;

/// Unknown or missing actions fall back to the analytics report.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let request = validated(payload)?;

    let action = match request.action.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        None => NewsAction::default(),
        Some(tag) => tag.parse().unwrap_or_else(|_| {
            tracing::debug!(action = %tag, "Unknown news action, using analytics");
            NewsAction::default()
        }),
    };

    tracing::info!(action = %action, title = ?request.title, "Processing news request");

    let prompt = action.render(
        &request.content,
        request.title.as_deref(),
        &state.settings.response_language,
    );
    let answer = resolve_text(&state, action.profile(), &prompt).await?;

    Ok(Json(TranslateResponse {
        translation: answer.text,
        model: answer.label,
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{post_json, router, settings};
    use crate::config::Credentials;
    use axum::http::StatusCode;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_google_answers_before_openrouter() {
        let server = MockServer::start_async().await;
        let google = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/google/v1beta/models/gemini-2.0-flash:generateContent")
                    .query_param("key", "google-test-key-01")
                    .body_includes("expert analyst");
                then.status(200).json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "Report"}]}}]
                }));
            })
            .await;
        let openrouter = server
            .mock_async(|when, then| {
                when.method(POST).path("/openrouter/api/v1/chat/completions");
                then.status(200)
                    .json_body(json!({"choices": [{"message": {"content": "unused"}}]}));
            })
            .await;

        let dir = TempDir::new().unwrap();
        let app = router(settings(
            &server.base_url(),
            Credentials::default()
                .with_google("google-test-key-01")
                .with_openrouter_keys(["sk-or-test-000001"]),
            &dir.path().join("stats.json"),
        ));

        let (status, body) = post_json(
            app,
            "/api/translate",
            json!({"content": "Article body", "action": "no-such-action"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["translation"], "Report");
        assert_eq!(body["model"], "Google Direct (gemini-2.0-flash)");
        google.assert_calls_async(1).await;
        openrouter.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn test_missing_content() {
        let dir = TempDir::new().unwrap();
        let app = router(settings(
            "http://127.0.0.1:9",
            Credentials::default(),
            &dir.path().join("stats.json"),
        ));

        let (status, body) = post_json(app, "/api/translate", json!({"title": "t"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Content is required");
    }
}
