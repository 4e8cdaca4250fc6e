//! Request statistics
//!
//! GET /api/stats and POST /api/stats

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::error::ApiError;
use crate::schemas::api::StatsUpdate;
use crate::server::state::AppState;
use crate::services::Stats;

pub async fn show(State(state): State<AppState>) -> Json<Stats> {
    Json(state.stats.load().await)
}

pub async fn record(
    State(state): State<AppState>,
    payload: Result<Json<StatsUpdate>, JsonRejection>,
) -> Result<Json<Stats>, ApiError> {
    let Json(update) = payload?;
    let kind = update.kind.as_deref().map(str::trim).unwrap_or_default();

    let stats = state
        .stats
        .record(kind, update.entry)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, post_json, router, settings};
    use crate::config::Credentials;
    use axum::http::StatusCode;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_record_then_read() {
        let dir = TempDir::new().unwrap();
        let app = router(settings(
            "http://127.0.0.1:9",
            Credentials::default(),
            &dir.path().join("stats.json"),
        ));

        let (status, body) = get(app.clone(), "/api/stats").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_requests"], 0);

        let (status, body) = post_json(
            app.clone(),
            "/api/stats",
            json!({"type": "telegram", "entry": {"title": "Pump overhaul"}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["telegram_posts"], 1);

        let (_, body) = get(app, "/api/stats").await;
        assert_eq!(body["total_requests"], 1);
        assert_eq!(body["history"][0]["title"], "Pump overhaul");
    }
}
