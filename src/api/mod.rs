//! API endpoint handlers module
//!
//! Contains all HTTP endpoint handler implementations plus the two steps
//! most of them share: body validation and a text resolution.

pub mod ai;
pub mod headlines;
pub mod health;
pub mod image;
pub mod stats;
pub mod tables;
pub mod translate;

use anyhow::anyhow;
use axum::{extract::rejection::JsonRejection, Json};
use validator::Validate;

use crate::error::ApiError;
use crate::schemas::api::first_validation_message;
use crate::server::state::AppState;
use crate::services::TextProfile;

/// Unwrap a JSON body and run its validation rules
pub(crate) fn validated<T: Validate>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(request) = payload?;
    request
        .validate()
        .map_err(|errors| ApiError::InvalidRequest(first_validation_message(&errors)))?;
    Ok(request)
}

/// A text answer and the label of whoever produced it
pub(crate) struct TextAnswer {
    pub text: String,
    pub label: String,
}

/// Run `prompt` through the candidates of `profile`
pub(crate) async fn resolve_text(
    state: &AppState,
    profile: TextProfile,
    prompt: &str,
) -> Result<TextAnswer, ApiError> {
    let candidates = state.catalog.text(profile);

    tracing::debug!(
        profile = ?profile,
        candidates = candidates.len(),
        prompt_chars = prompt.chars().count(),
        "Resolving text request"
    );

    let resolution = state.resolver.resolve(prompt, &candidates).await.into_result()?;
    let label = resolution.label;
    let text = resolution
        .payload
        .into_text()
        .ok_or_else(|| anyhow!("text candidate produced a binary payload"))?;

    Ok(TextAnswer { text, label })
}
