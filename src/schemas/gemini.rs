//! Google Gemini `generateContent` schema
//!
//! Only the subset used by the gateway: one user turn in, first candidate
//! text out.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Gemini API request body for generateContent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GeminiRequest {
    pub fn user_prompt(prompt: impl Into<String>, temperature: Option<f32>) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![Part {
                    text: Some(prompt.into()),
                }],
            }],
            generation_config: temperature.map(|temperature| GenerationConfig {
                temperature: Some(temperature),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: GeminiContent,
}

impl GeminiResponse {
    /// `candidates[0].content.parts[0].text`
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .and_then(|part| part.text.as_deref())
    }
}
