//! Candidate descriptors
//!
//! A candidate is one concrete (provider, credential, model) combination that
//! is eligible for exactly one attempt. Everything provider-specific that the
//! resolver needs (endpoint, request shaping, extraction rule, label) lives
//! here as data.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::config::ApiKey;

/// Upstream provider identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Hugging Face router, OpenAI-compatible chat completions
    HuggingFaceRouter,
    /// Google Gemini REST `generateContent`
    GoogleGemini,
    /// OpenRouter, OpenAI-compatible chat completions
    OpenRouter,
    /// Hugging Face inference API returning image bytes
    HuggingFaceInference,
    /// Keyless public image endpoint
    PublicImage,
}

/// Request dialect spoken by a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wire {
    OpenAiChat,
    GeminiGenerate,
    InferenceImage,
    KeylessImage,
}

impl ProviderKind {
    pub fn wire(&self) -> Wire {
        match self {
            ProviderKind::HuggingFaceRouter | ProviderKind::OpenRouter => Wire::OpenAiChat,
            ProviderKind::GoogleGemini => Wire::GeminiGenerate,
            ProviderKind::HuggingFaceInference => Wire::InferenceImage,
            ProviderKind::PublicImage => Wire::KeylessImage,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::HuggingFaceRouter => "huggingface_router",
            ProviderKind::GoogleGemini => "google_gemini",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::HuggingFaceInference => "huggingface_inference",
            ProviderKind::PublicImage => "public_image",
        };
        f.write_str(name)
    }
}

/// Where the result lives in a provider response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionRule {
    /// `choices[0].message.content`
    MessageContent,
    /// `choices[0].message.content`, then `reasoning_content`, then `reasoning`
    MessageContentOrReasoning,
    /// `candidates[0].content.parts[0].text`
    GeminiText,
    /// Raw response body as an image
    ImageBytes,
}

/// How a successful candidate is named back to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelStyle {
    /// Literal label
    Fixed(String),
    /// "<provider> (<short model>)"
    Named(String),
    /// "<provider> Key #<index> (<model>)"
    Keyed(String),
}

impl LabelStyle {
    pub fn render(&self, key_index: usize, model: &str) -> String {
        match self {
            LabelStyle::Fixed(label) => label.clone(),
            LabelStyle::Named(provider) => format!("{} ({})", provider, short_model_name(model)),
            LabelStyle::Keyed(provider) => format!("{} Key #{} ({})", provider, key_index, model),
        }
    }
}

/// "zai-org/GLM-4.5-Air:zai-org" -> "GLM-4.5-Air"
pub fn short_model_name(model: &str) -> &str {
    let name = model.rsplit('/').next().unwrap_or(model);
    name.split(':').next().unwrap_or(name)
}

/// One attempt-able provider/credential/model combination
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Priority group, 1 is tried first
    pub tier: u8,
    pub provider: ProviderKind,
    pub endpoint: String,
    pub credential: Option<ApiKey>,
    /// 1-based position of the credential among its provider's keys
    pub key_index: usize,
    pub model: String,
    pub temperature: Option<f32>,
    /// Deadline for send plus body read; `None` uses the client default
    pub timeout: Option<Duration>,
    pub extraction: ExtractionRule,
    pub label: LabelStyle,
    pub headers: Vec<(String, String)>,
}

impl Candidate {
    pub fn new(
        tier: u8,
        provider: ProviderKind,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        extraction: ExtractionRule,
    ) -> Self {
        Self {
            tier,
            provider,
            endpoint: endpoint.into(),
            credential: None,
            key_index: 1,
            model: model.into(),
            temperature: None,
            timeout: None,
            extraction,
            label: LabelStyle::Named(provider.to_string()),
            headers: Vec::new(),
        }
    }

    pub fn with_credential(mut self, key: ApiKey, key_index: usize) -> Self {
        self.credential = Some(key);
        self.key_index = key_index;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_label(mut self, label: LabelStyle) -> Self {
        self.label = label;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Label for a success, preferring the model the provider echoed back
    pub fn label_for(&self, echoed_model: Option<&str>) -> String {
        self.label
            .render(self.key_index, echoed_model.unwrap_or(&self.model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_model_name() {
        assert_eq!(short_model_name("zai-org/GLM-4.5-Air:zai-org"), "GLM-4.5-Air");
        assert_eq!(short_model_name("gemini-2.0-flash"), "gemini-2.0-flash");
        assert_eq!(
            short_model_name("black-forest-labs/FLUX.1-schnell"),
            "FLUX.1-schnell"
        );
    }

    #[test]
    fn test_keyed_label_prefers_echoed_model() {
        let candidate = Candidate::new(
            3,
            ProviderKind::OpenRouter,
            "http://x",
            "google/gemini-2.0-flash-exp:free",
            ExtractionRule::MessageContent,
        )
        .with_credential(ApiKey::new("key-two-xxxxxx").unwrap(), 2)
        .with_label(LabelStyle::Keyed("OpenRouter".into()));

        assert_eq!(
            candidate.label_for(None),
            "OpenRouter Key #2 (google/gemini-2.0-flash-exp:free)"
        );
        assert_eq!(
            candidate.label_for(Some("google/gemini-2.0-flash-exp")),
            "OpenRouter Key #2 (google/gemini-2.0-flash-exp)"
        );
    }

    #[test]
    fn test_fixed_label_ignores_model() {
        let candidate = Candidate::new(
            2,
            ProviderKind::PublicImage,
            "http://x",
            "flux",
            ExtractionRule::ImageBytes,
        )
        .with_label(LabelStyle::Fixed("Pollinations (public fallback)".into()));
        assert_eq!(candidate.label_for(Some("other")), "Pollinations (public fallback)");
    }

    #[test]
    fn test_debug_masks_credential() {
        let candidate = Candidate::new(
            1,
            ProviderKind::HuggingFaceRouter,
            "http://x",
            "m",
            ExtractionRule::MessageContent,
        )
        .with_credential(ApiKey::new("hf_supersecretvalue123").unwrap(), 1);
        let printed = format!("{:?}", candidate);
        assert!(!printed.contains("supersecretvalue"));
    }

    #[test]
    fn test_wire_mapping() {
        assert_eq!(ProviderKind::OpenRouter.wire(), Wire::OpenAiChat);
        assert_eq!(ProviderKind::HuggingFaceRouter.wire(), Wire::OpenAiChat);
        assert_eq!(ProviderKind::GoogleGemini.wire(), Wire::GeminiGenerate);
        assert_eq!(ProviderKind::PublicImage.wire(), Wire::KeylessImage);
    }
}
