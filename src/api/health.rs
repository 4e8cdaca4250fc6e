//! Health check endpoints
//!
//! Probes for monitoring and container orchestration.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::state::{AppState, ProviderStatus};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: u64,
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadinessChecks {
    pub config_loaded: bool,
    pub providers: ProviderStatus,
}

#[derive(Serialize)]
pub struct LivenessResponse {
    pub alive: bool,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.settings.app_version.clone(),
        environment: state.settings.environment.to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// GET /ready
///
/// Always 200 once the router is serving; missing provider keys are reported
/// in `checks` but do not make the service unready.
pub async fn readiness(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let checks = ReadinessChecks {
        config_loaded: true,
        providers: state.provider_status(),
    };

    if !checks.providers.has_text_provider() {
        tracing::debug!(checks = ?checks, "No text provider configured");
    }

    Json(ReadinessResponse { ready: true, checks })
}

/// GET /liveness
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { alive: true })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get, router, settings};
    use crate::config::Credentials;
    use axum::http::StatusCode;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_probes() {
        let dir = TempDir::new().unwrap();
        let app = router(settings(
            "http://127.0.0.1:9",
            Credentials::default().with_openrouter_keys(["sk-or-a-000001", "sk-or-b-000002"]),
            &dir.path().join("stats.json"),
        ));

        let (status, body) = get(app.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = get(app.clone(), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
        assert_eq!(body["checks"]["providers"]["openrouter_keys"], 2);
        assert_eq!(body["checks"]["providers"]["google"], false);

        let (_, body) = get(app, "/liveness").await;
        assert_eq!(body["alive"], true);
    }

    #[tokio::test]
    async fn test_ready_without_any_provider_key() {
        let dir = TempDir::new().unwrap();
        let app = router(settings(
            "http://127.0.0.1:9",
            Credentials::default(),
            &dir.path().join("stats.json"),
        ));

        let (status, body) = get(app, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
        assert_eq!(body["checks"]["providers"]["openrouter_keys"], 0);
    }
}
