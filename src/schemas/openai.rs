//! OpenAI-compatible chat-completions schema
//!
//! Both the Hugging Face router and OpenRouter speak this dialect. Only the
//! fields the gateway sends or reads are modelled.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request Types
// ============================================================================

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionRequest {
    /// Single-turn user prompt
    pub fn user_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.into()),
                reasoning_content: None,
                reasoning: None,
            }],
            temperature: None,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A message; responses from reasoning models may leave `content` empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning_content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

// ============================================================================
// Response Types
// ============================================================================

/// Chat completion response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    /// Model actually used; providers may echo an equivalent identifier
    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: ChatMessage,
}

impl ChatCompletionResponse {
    /// `choices[0].message`, if any
    pub fn first_message(&self) -> Option<&ChatMessage> {
        self.choices.first().map(|choice| &choice.message)
    }

    /// Echoed model identifier, ignoring blanks
    pub fn echoed_model(&self) -> Option<&str> {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|model| !model.is_empty())
    }
}
