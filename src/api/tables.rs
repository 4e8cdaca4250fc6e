//! Equipment reliability workflow
//!
//! POST /api/tables

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::{resolve_text, validated};
use crate::error::ApiError;
use crate::schemas::api::{TableRequest, TableResponse};
use crate::server::state::AppState;
use crate::services::{build_table, Stage, TextProfile};

/// Table stages answer with parsed rows, `validate` and `plan` with text.
/// A table answer that does not parse is a 502 carrying the raw text.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<TableRequest>, JsonRejection>,
) -> Result<Json<TableResponse>, ApiError> {
    let request = validated(payload)?;

    let stage: Stage = request
        .stage
        .parse()
        .map_err(|_| ApiError::InvalidRequest(format!("Unknown stage: {}", request.stage.trim())))?;

    tracing::info!(
        stage = stage.as_str(),
        equipment = %request.equipment.display_name(),
        "Processing equipment stage"
    );

    let prompt = stage.render(&request.equipment, &state.settings.response_language);
    let answer = resolve_text(&state, TextProfile::Engineering, &prompt).await?;

    if !stage.is_table() {
        return Ok(Json(TableResponse {
            stage: stage.as_str().to_string(),
            rows: None,
            text: Some(answer.text),
            model: answer.label,
        }));
    }

    let rows = build_table(stage, &answer.text).map_err(|e| {
        tracing::warn!(stage = stage.as_str(), model = %answer.label, error = %e, "Unusable table output");
        ApiError::MalformedOutput {
            message: format!("Failed to parse {} table: {}", stage.as_str(), e),
            raw: answer.text.clone(),
        }
    })?;

    Ok(Json(TableResponse {
        stage: stage.as_str().to_string(),
        rows: Some(rows),
        text: None,
        model: answer.label,
    }))
}
