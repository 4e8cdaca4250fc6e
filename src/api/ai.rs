//! Free-form and news desk text completion
//!
//! POST /api/ai

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::{resolve_text, validated};
use crate::error::ApiError;
use crate::schemas::api::{AiRequest, AiResponse};
use crate::server::state::AppState;
use crate::services::AiAction;

/// Without an action the prompt goes out verbatim under the engineering
/// profile; a news action wraps it in that action's template.
pub async fn complete(
    State(state): State<AppState>,
    payload: Result<Json<AiRequest>, JsonRejection>,
) -> Result<Json<AiResponse>, ApiError> {
    let request = validated(payload)?;

    let action = AiAction::parse(request.action.as_deref())
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let prompt = match action {
        AiAction::Engineering => request.prompt,
        AiAction::News(news) => news.render(
            &request.prompt,
            request.title.as_deref(),
            &state.settings.response_language,
        ),
    };

    tracing::info!(action = ?action, "Processing AI request");

    let answer = resolve_text(&state, action.profile(), &prompt).await?;

    Ok(Json(AiResponse {
        result: answer.text,
        model: answer.label,
    }))
}
